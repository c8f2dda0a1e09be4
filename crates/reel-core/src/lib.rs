//! Shared primitives for the Reel SDK.
//!
//! Every other crate in the workspace builds on the two value types here
//! (`Address`, `TokenAmount`) and on the typed configuration in [`config`].

pub mod config;
pub mod types;

pub use config::{AccountConfig, DbConfig, EthConfig, IpfsConfig, ReelConfig};
pub use types::{Address, TokenAmount, DECIMALS, SYMBOL};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from primitive parsing and configuration validation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid address {0:?}: expected 0x-prefixed 20-byte hex")]
    InvalidAddress(String),

    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}
