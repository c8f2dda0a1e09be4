//! Token-curated registry client.
//!
//! Listings apply with a stake, anyone can challenge them, and
//! challenges resolve through commit-reveal voting; winners split the
//! loser's deposit. This crate drives that protocol through the
//! injected chain collaborators: it reads current state, enforces every
//! precondition locally before submitting a transaction, and decodes
//! receipts for the values the contracts committed.
//!
//! Precondition reads and the following write are not atomic: two
//! concurrent operations on the same video id can both pass their local
//! checks, and only the contract's own rules decide which transaction
//! lands. This client does not try to serialize such calls; the
//! contract is the source of truth.

pub mod error;
pub mod params;
pub mod registry;
pub mod types;
pub mod voting;

pub use error::{Error, Result};
pub use params::ParamReader;
pub use registry::Registry;
pub use types::{Challenge, Listing, Poll, VoteChoice};
pub use voting::Voting;

use std::sync::Arc;

use reel_eth::{ChainClient, TokenClient};
use reel_store::HashStore;

/// Contract names resolved through the chain's name registry
pub const REGISTRY_CONTRACT: &str = "TcrRegistry";
pub const PARAMETERIZER_CONTRACT: &str = "TcrParameterizer";
pub const VOTING_CONTRACT: &str = "TcrPLCRVoting";

/// The TCR module: parameters, listing lifecycle and voting over one
/// shared set of collaborators.
#[derive(Clone)]
pub struct Tcr {
    pub params: ParamReader,
    pub registry: Registry,
    pub voting: Voting,
}

impl Tcr {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        token: Arc<dyn TokenClient>,
        store: HashStore,
    ) -> Self {
        Self {
            params: ParamReader::new(chain.clone()),
            registry: Registry::new(chain.clone(), token.clone(), store.clone()),
            voting: Voting::new(chain, token, store),
        }
    }

    /// The hash/salt store shared by the lifecycle and voting sides.
    pub fn store(&self) -> &HashStore {
        self.registry.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::TokenAmount;
    use reel_eth::testing::MockChain;
    use reel_eth::EthValue;
    use reel_store::MemoryStore;

    #[tokio::test]
    async fn test_components_share_one_store() {
        let mock = Arc::new(MockChain::new());
        let store = HashStore::new(Arc::new(MemoryStore::new()));
        let tcr = Tcr::new(mock.clone(), mock.clone(), store);

        // a hash cached by the lifecycle side is visible on the shared handle
        tcr.registry.update_status("vid-1").await.unwrap();

        let hash = tcr.store().hash_of("vid-1");
        assert_eq!(tcr.store().hash_to_id(&hash), Some("vid-1".to_string()));
    }

    #[tokio::test]
    async fn test_params_reachable_through_facade() {
        let mock = Arc::new(MockChain::new());
        let tcr = Tcr::new(
            mock.clone(),
            mock.clone(),
            HashStore::new(Arc::new(MemoryStore::new())),
        );
        mock.stub_read(PARAMETERIZER_CONTRACT, "get", EthValue::Uint(1_000_000));

        assert_eq!(
            tcr.params.min_deposit().await.unwrap(),
            TokenAmount(1_000_000)
        );
    }
}
