//! Typed SDK configuration.
//!
//! Each section mirrors one backing service. All fields have documented
//! defaults; `ReelConfig::validate` runs at construction time so a bad
//! config never reaches a contract call.

use serde::{Deserialize, Serialize};

use crate::types::Address;
use crate::{Error, Result};

/// The account operations are signed with.
///
/// Key management itself lives in the injected chain collaborator; the
/// SDK only needs to know which address it acts as.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AccountConfig {
    pub address: Option<Address>,
    pub private_key: Option<String>,
}

/// Ethereum connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EthConfig {
    /// Node endpoint, default `ws://localhost:8546`
    pub provider: String,
    /// Address of the contract-name registry, if already deployed
    pub registry_address: Option<Address>,
    pub is_test_net: bool,
}

impl Default for EthConfig {
    fn default() -> Self {
        Self {
            provider: "ws://localhost:8546".to_string(),
            registry_address: None,
            is_test_net: false,
        }
    }
}

/// IPFS API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct IpfsConfig {
    /// HTTP API endpoint, default `http://127.0.0.1:5001`
    pub api_url: String,
    /// Chunk size in bytes, default 128 KiB
    pub chunk_size: u64,
    /// Upper bound on a single stored blob, default 300 MiB
    pub max_file_size: u64,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5001".to_string(),
            chunk_size: 128 * 1024,
            max_file_size: 300 * 1024 * 1024,
        }
    }
}

/// Index database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DbConfig {
    /// REST endpoint, default `https://index.reel.video/api/v1/`
    pub provider: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            provider: "https://index.reel.video/api/v1/".to_string(),
        }
    }
}

/// Complete SDK configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ReelConfig {
    pub account: AccountConfig,
    pub eth: EthConfig,
    pub ipfs: IpfsConfig,
    pub db: DbConfig,
}

impl ReelConfig {
    /// Check every section; fails fast on the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.eth.provider.trim().is_empty() {
            return Err(Error::InvalidConfig {
                field: "eth.provider",
                reason: "must not be empty".to_string(),
            });
        }
        if self.ipfs.api_url.trim().is_empty() {
            return Err(Error::InvalidConfig {
                field: "ipfs.api_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.ipfs.max_file_size == 0 {
            return Err(Error::InvalidConfig {
                field: "ipfs.max_file_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.ipfs.chunk_size == 0 || self.ipfs.chunk_size > self.ipfs.max_file_size {
            return Err(Error::InvalidConfig {
                field: "ipfs.chunk_size",
                reason: "must be nonzero and no larger than max_file_size".to_string(),
            });
        }
        if self.db.provider.trim().is_empty() {
            return Err(Error::InvalidConfig {
                field: "db.provider",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(addr) = &self.eth.registry_address {
            if addr.is_zero() {
                return Err(Error::InvalidConfig {
                    field: "eth.registry_address",
                    reason: "the zero address is not a deployed registry".to_string(),
                });
            }
        }
        Ok(())
    }
}
