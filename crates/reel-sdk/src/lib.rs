//! The Reel SDK facade.
//!
//! One object wiring the three backing services together: the
//! token-curated registry on Ethereum, content-addressed metadata on
//! IPFS, and the queryable index database. The chain and token
//! collaborators are injected: the SDK shapes calls and enforces
//! protocol preconditions, it never signs or transports transactions
//! itself.
//!
//! ```no_run
//! use std::sync::Arc;
//! use reel_sdk::{Reel, ReelConfig};
//! # use reel_eth::testing::MockChain;
//!
//! # fn demo() -> reel_sdk::Result<()> {
//! let chain = Arc::new(MockChain::new());
//! let reel = Reel::new(ReelConfig::default(), chain.clone(), chain, None)?;
//! # let _ = reel.tcr.params;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use reel_db::DbClient;
use reel_eth::{ChainClient, TokenClient};
use reel_ipfs::ContentStore;
use reel_store::{HashStore, KvStore};
use reel_tcr::Tcr;

pub use reel_core::{
    AccountConfig, Address, DbConfig, EthConfig, IpfsConfig, ReelConfig, TokenAmount,
};
pub use reel_db::VideoRecord;
pub use reel_store::MemoryStore;
pub use reel_tcr::{Challenge, Listing, Poll, VoteChoice};

/// Result type for SDK construction
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] reel_core::Error),

    #[error(transparent)]
    Ipfs(#[from] reel_ipfs::Error),
}

/// The assembled SDK
pub struct Reel {
    pub config: ReelConfig,
    pub tcr: Tcr,
    pub ipfs: ContentStore,
    pub db: DbClient,
}

impl std::fmt::Debug for Reel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reel")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Reel {
    /// Validate `config` and assemble the SDK around the injected
    /// collaborators. Passing no key-value store still works; hash
    /// reverse lookups and stored salts are then unavailable and each
    /// degraded access logs a warning.
    pub fn new(
        config: ReelConfig,
        chain: Arc<dyn ChainClient>,
        token: Arc<dyn TokenClient>,
        kv: Option<Arc<dyn KvStore>>,
    ) -> Result<Self> {
        config.validate()?;

        let store = match kv {
            Some(kv) => HashStore::new(kv),
            None => HashStore::detached(),
        };
        let tcr = Tcr::new(chain, token, store);
        let ipfs = ContentStore::new(&config.ipfs.api_url)?;
        let db = DbClient::new(&config.db.provider);

        Ok(Self {
            config,
            tcr,
            ipfs,
            db,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_eth::testing::MockChain;

    #[test]
    fn test_construction_with_defaults() {
        let chain = Arc::new(MockChain::new());
        let reel = Reel::new(ReelConfig::default(), chain.clone(), chain, None).unwrap();
        assert_eq!(reel.config.eth.provider, "ws://localhost:8546");
        assert_eq!(reel.db.provider(), "https://index.reel.video/api/v1/");
    }

    #[test]
    fn test_construction_rejects_bad_config() {
        let chain = Arc::new(MockChain::new());
        let mut config = ReelConfig::default();
        config.ipfs.max_file_size = 0;

        let err = Reel::new(config, chain.clone(), chain, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_store_is_wired_through() {
        let chain = Arc::new(MockChain::new());
        let kv: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let reel = Reel::new(ReelConfig::default(), chain.clone(), chain, Some(kv)).unwrap();

        let hash = reel.tcr.store().get_and_store_hash("vid-1");
        assert_eq!(reel.tcr.store().hash_to_id(&hash), Some("vid-1".to_string()));
    }
}
