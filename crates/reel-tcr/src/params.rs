//! Read-only access to registry and Parameterizer configuration.
//!
//! Parameters govern deposits, stage lengths and vote thresholds. They
//! can be reparameterized between operations, so every accessor re-reads
//! the contract; nothing is cached.

use std::sync::Arc;

use reel_core::TokenAmount;
use reel_eth::{ChainClient, EthValue};

use crate::error::{Error, Result};
use crate::types::uint_to_u64;
use crate::PARAMETERIZER_CONTRACT;

#[derive(Clone)]
pub struct ParamReader {
    chain: Arc<dyn ChainClient>,
}

impl ParamReader {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    /// Raw value of a named parameter.
    pub async fn get(&self, name: &str) -> Result<u128> {
        let address = self.chain.contract_address(PARAMETERIZER_CONTRACT).await?;
        if address.is_zero() {
            return Err(Error::ContractUnavailable {
                name: PARAMETERIZER_CONTRACT,
            });
        }
        let value = self
            .chain
            .call(
                PARAMETERIZER_CONTRACT,
                "get",
                vec![EthValue::Str(name.to_string())],
            )
            .await?;
        Ok(value.as_uint()?)
    }

    async fn get_u64(&self, name: &str) -> Result<u64> {
        uint_to_u64(self.get(name).await?)
    }

    /// Minimum stake required to apply for a listing
    pub async fn min_deposit(&self) -> Result<TokenAmount> {
        Ok(TokenAmount(self.get("minDeposit").await?))
    }

    /// Seconds an application waits before it can be whitelisted
    pub async fn apply_stage_len(&self) -> Result<u64> {
        self.get_u64("applyStageLen").await
    }

    /// Percentage of the losing side's deposit paid to the winner
    pub async fn dispensation_pct(&self) -> Result<u64> {
        self.get_u64("dispensationPct").await
    }

    /// Seconds the vote commit period lasts
    pub async fn commit_stage_len(&self) -> Result<u64> {
        self.get_u64("commitStageLen").await
    }

    /// Seconds the vote reveal period lasts
    pub async fn reveal_stage_len(&self) -> Result<u64> {
        self.get_u64("revealStageLen").await
    }

    /// Majority out of 100 needed for a vote to pass
    pub async fn vote_quorum(&self) -> Result<u64> {
        self.get_u64("voteQuorum").await
    }

    // Parameterizer counterparts, governing reparameterization proposals

    pub async fn p_min_deposit(&self) -> Result<TokenAmount> {
        Ok(TokenAmount(self.get("pMinDeposit").await?))
    }

    pub async fn p_apply_stage_len(&self) -> Result<u64> {
        self.get_u64("pApplyStageLen").await
    }

    pub async fn p_dispensation_pct(&self) -> Result<u64> {
        self.get_u64("pDispensationPct").await
    }

    pub async fn p_commit_stage_len(&self) -> Result<u64> {
        self.get_u64("pCommitStageLen").await
    }

    pub async fn p_reveal_stage_len(&self) -> Result<u64> {
        self.get_u64("pRevealStageLen").await
    }

    pub async fn p_vote_quorum(&self) -> Result<u64> {
        self.get_u64("pVoteQuorum").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::Address;
    use reel_eth::testing::MockChain;

    #[tokio::test]
    async fn test_min_deposit_reads_parameterizer() {
        let mock = Arc::new(MockChain::new());
        mock.stub_read(PARAMETERIZER_CONTRACT, "get", EthValue::Uint(1_000_000));

        let params = ParamReader::new(mock);
        assert_eq!(params.min_deposit().await.unwrap(), TokenAmount(1_000_000));
    }

    #[tokio::test]
    async fn test_stage_len_accessor() {
        let mock = Arc::new(MockChain::new());
        mock.stub_read(PARAMETERIZER_CONTRACT, "get", EthValue::Uint(600));

        let params = ParamReader::new(mock);
        assert_eq!(params.apply_stage_len().await.unwrap(), 600);
        assert_eq!(params.p_vote_quorum().await.unwrap(), 600);
    }

    #[tokio::test]
    async fn test_undeployed_parameterizer() {
        let mock = Arc::new(MockChain::new());
        mock.set_contract_address(PARAMETERIZER_CONTRACT, Address::zero());

        let params = ParamReader::new(mock);
        let err = params.min_deposit().await.unwrap_err();
        assert!(matches!(err, Error::ContractUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_values_are_reread_every_call() {
        let mock = Arc::new(MockChain::new());
        mock.stub_read(PARAMETERIZER_CONTRACT, "get", EthValue::Uint(2_000_000));
        mock.stub_read_once(PARAMETERIZER_CONTRACT, "get", EthValue::Uint(1_000_000));

        let params = ParamReader::new(mock);
        assert_eq!(params.min_deposit().await.unwrap(), TokenAmount(1_000_000));
        assert_eq!(params.min_deposit().await.unwrap(), TokenAmount(2_000_000));
    }
}
