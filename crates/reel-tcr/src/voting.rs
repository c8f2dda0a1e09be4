//! Commit-reveal voting against open challenges.
//!
//! A vote is committed as `keccak256(vote, salt)` with the salt kept in
//! the local store; nothing that reveals the choice goes on-chain until
//! the reveal phase. The voting contract keeps each voter's commitments
//! in a sorted linked list, so committing needs the current tail as an
//! insertion hint (`get_last_node`).

use std::sync::Arc;

use reel_core::{Address, TokenAmount};
use reel_eth::{ChainClient, EthValue, TokenClient, TxReceipt};
use reel_store::{commit_hash, HashStore};

use crate::error::{Error, Result};
use crate::types::{uint_to_u64, Listing, Poll, VoteChoice};
use crate::{REGISTRY_CONTRACT, VOTING_CONTRACT};

#[derive(Clone)]
pub struct Voting {
    chain: Arc<dyn ChainClient>,
    token: Arc<dyn TokenClient>,
    store: HashStore,
}

impl Voting {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        token: Arc<dyn TokenClient>,
        store: HashStore,
    ) -> Self {
        Self {
            chain,
            token,
            store,
        }
    }

    /// Resolve the voting contract, failing if it is not deployed.
    async fn voting_address(&self) -> Result<Address> {
        let address = self.chain.contract_address(VOTING_CONTRACT).await?;
        if address.is_zero() {
            return Err(Error::ContractUnavailable {
                name: VOTING_CONTRACT,
            });
        }
        Ok(address)
    }

    async fn listing(&self, video_id: &str) -> Result<Listing> {
        let hash = self.store.hash_of(video_id);
        let value = self
            .chain
            .call(
                REGISTRY_CONTRACT,
                "listings",
                vec![EthValue::Bytes(hash.as_bytes().to_vec())],
            )
            .await?;
        let listing = Listing::decode(&value)?;
        if listing.owner.is_zero() {
            return Err(Error::ListingNotFound {
                video_id: video_id.to_string(),
            });
        }
        Ok(listing)
    }

    /// Commit a hidden vote on the challenge against `video_id`.
    ///
    /// Generates and persists a fresh salt only after every precondition
    /// has passed, so a rejected call leaves no salt behind.
    pub async fn commit_vote(
        &self,
        video_id: &str,
        choice: VoteChoice,
        amount: TokenAmount,
    ) -> Result<TxReceipt> {
        let voting = self.voting_address().await?;
        let listing = self.listing(video_id).await?;
        let poll_id = listing.challenge_id;
        if poll_id == 0 {
            return Err(Error::NoActiveChallenge {
                video_id: video_id.to_string(),
            });
        }

        let account = self.chain.account();
        let balance = self.token.balance_of(&account).await?;
        if !balance.sufficient_for(amount) {
            return Err(Error::InsufficientBalance {
                balance,
                required: amount,
            });
        }
        let allowance = self.token.allowance(&account, &voting).await?;
        if !allowance.sufficient_for(amount) {
            return Err(Error::InsufficientAllowance {
                allowance,
                required: amount,
            });
        }

        let salt = self.store.generate_salt(32);
        self.store.store_salt(video_id, &salt);
        let secret_hash = commit_hash(choice.as_u8(), &salt)?;

        let prev_node = self.get_last_node(None).await?;
        tracing::debug!(video_id, poll_id, "committing vote");
        Ok(self
            .chain
            .send(
                VOTING_CONTRACT,
                "commitVote",
                vec![
                    EthValue::Uint(poll_id as u128),
                    EthValue::Bytes(secret_hash.to_vec()),
                    EthValue::from(amount),
                    EthValue::Uint(prev_node as u128),
                ],
            )
            .await?)
    }

    /// Convert `amount` tokens into voting rights.
    pub async fn request_voting_rights(&self, amount: TokenAmount) -> Result<TxReceipt> {
        let voting = self.voting_address().await?;
        let account = self.chain.account();
        let balance = self.token.balance_of(&account).await?;
        if !balance.sufficient_for(amount) {
            return Err(Error::InsufficientBalance {
                balance,
                required: amount,
            });
        }
        let allowance = self.token.allowance(&account, &voting).await?;
        if !allowance.sufficient_for(amount) {
            return Err(Error::InsufficientAllowance {
                allowance,
                required: amount,
            });
        }

        Ok(self
            .chain
            .send(
                VOTING_CONTRACT,
                "requestVotingRights",
                vec![EthValue::from(amount)],
            )
            .await?)
    }

    /// Convert voting rights back into tokens. Tokens committed to
    /// unresolved polls stay locked and cannot be withdrawn.
    pub async fn withdraw_voting_rights(&self, amount: TokenAmount) -> Result<TxReceipt> {
        self.voting_address().await?;
        let account = self.chain.account();
        let voting_balance = self
            .chain
            .call(
                VOTING_CONTRACT,
                "voteTokenBalance",
                vec![EthValue::Address(account.clone())],
            )
            .await?
            .as_amount()?;
        let locked = self.locked_tokens(Some(&account)).await?;
        let unlocked = voting_balance.sub(locked);
        if !unlocked.sufficient_for(amount) {
            return Err(Error::InsufficientUnlockedBalance { unlocked, amount });
        }

        Ok(self
            .chain
            .send(
                VOTING_CONTRACT,
                "withdrawVotingRights",
                vec![EthValue::from(amount)],
            )
            .await?)
    }

    /// Recover tokens locked in a poll the voter never revealed for.
    /// Only possible once the poll's reveal deadline has passed.
    pub async fn rescue_tokens(&self, poll_id: u64) -> Result<TxReceipt> {
        self.voting_address().await?;
        let poll = self.poll(poll_id).await?;
        if !self.is_expired(poll.reveal_end_date).await? {
            return Err(Error::PollNotExpired { poll_id });
        }

        Ok(self
            .chain
            .send(
                VOTING_CONTRACT,
                "rescueTokens",
                vec![EthValue::Uint(poll_id as u128)],
            )
            .await?)
    }

    // ------------------------------------------------------------------
    // read-only helpers
    // ------------------------------------------------------------------

    pub async fn poll(&self, poll_id: u64) -> Result<Poll> {
        self.voting_address().await?;
        let value = self
            .chain
            .call(
                VOTING_CONTRACT,
                "pollMap",
                vec![EthValue::Uint(poll_id as u128)],
            )
            .await?;
        Poll::decode(&value)
    }

    /// Whether `deadline` is in the past, by the contract's clock.
    pub async fn is_expired(&self, deadline: u64) -> Result<bool> {
        self.voting_address().await?;
        let value = self
            .chain
            .call(
                VOTING_CONTRACT,
                "isExpired",
                vec![EthValue::Uint(deadline as u128)],
            )
            .await?;
        Ok(value.as_bool()?)
    }

    /// Tokens the voter has committed to unresolved polls.
    pub async fn locked_tokens(&self, voter: Option<&Address>) -> Result<TokenAmount> {
        self.voting_address().await?;
        let voter = voter.cloned().unwrap_or_else(|| self.chain.account());
        let value = self
            .chain
            .call(
                VOTING_CONTRACT,
                "getLockedTokens",
                vec![EthValue::Address(voter)],
            )
            .await?;
        Ok(value.as_amount()?)
    }

    pub async fn commit_period_active(&self, poll_id: u64) -> Result<bool> {
        self.voting_address().await?;
        let value = self
            .chain
            .call(
                VOTING_CONTRACT,
                "commitPeriodActive",
                vec![EthValue::Uint(poll_id as u128)],
            )
            .await?;
        Ok(value.as_bool()?)
    }

    /// Tail of the voter's sorted commitment list, used as the insertion
    /// hint for `commit_vote`. The ordering itself is enforced on-chain.
    pub async fn get_last_node(&self, voter: Option<&Address>) -> Result<u64> {
        self.voting_address().await?;
        let voter = voter.cloned().unwrap_or_else(|| self.chain.account());
        let value = self
            .chain
            .call(
                VOTING_CONTRACT,
                "getLastNode",
                vec![EthValue::Address(voter)],
            )
            .await?;
        uint_to_u64(value.as_uint()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_eth::testing::MockChain;
    use reel_store::MemoryStore;

    fn setup() -> (Arc<MockChain>, Voting) {
        let mock = Arc::new(MockChain::new());
        let store = HashStore::new(Arc::new(MemoryStore::new()));
        let voting = Voting::new(mock.clone(), mock.clone(), store);
        (mock, voting)
    }

    fn listing_tuple(owner: &Address, challenge_id: u64) -> EthValue {
        EthValue::Tuple(vec![
            EthValue::Uint(1_700_000_000),
            EthValue::Bool(false),
            EthValue::Address(owner.clone()),
            EthValue::Uint(2_000_000),
            EthValue::Uint(challenge_id as u128),
        ])
    }

    fn poll_tuple(reveal_end_date: u64) -> EthValue {
        EthValue::Tuple(vec![
            EthValue::Uint(100),
            EthValue::Uint(reveal_end_date as u128),
            EthValue::Uint(50),
            EthValue::Uint(0),
            EthValue::Uint(0),
        ])
    }

    fn owner() -> Address {
        Address::parse("0x00000000000000000000000000000000000000bb").unwrap()
    }

    fn voting_addr() -> Address {
        Address::parse("0x0000000000000000000000000000000000000003").unwrap()
    }

    fn fund_voter(mock: &MockChain, amount: u128) {
        mock.set_balance(&mock.account(), TokenAmount(amount));
        mock.set_allowance(&mock.account(), &voting_addr(), TokenAmount(amount));
    }

    #[tokio::test]
    async fn test_commit_vote_happy_path() {
        let (mock, voting) = setup();
        fund_voter(&mock, 50_000);
        mock.stub_read(REGISTRY_CONTRACT, "listings", listing_tuple(&owner(), 7));
        mock.stub_read(VOTING_CONTRACT, "getLastNode", EthValue::Uint(3));

        voting
            .commit_vote("vid-2", VoteChoice::Support, TokenAmount(10_000))
            .await
            .unwrap();

        let sent = mock.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, "commitVote");
        // poll id, then the 32-byte secret, amount, insertion hint
        assert_eq!(sent[0].args[0], EthValue::Uint(7));
        assert!(matches!(&sent[0].args[1], EthValue::Bytes(b) if b.len() == 32));
        assert_eq!(sent[0].args[2], EthValue::Uint(10_000));
        assert_eq!(sent[0].args[3], EthValue::Uint(3));

        // the salt was persisted for the reveal phase
        let salt = voting.store.salt("vid-2").unwrap();
        let expected = commit_hash(1, &salt).unwrap();
        assert_eq!(sent[0].args[1], EthValue::Bytes(expected.to_vec()));
    }

    #[tokio::test]
    async fn test_commit_vote_without_challenge() {
        let (mock, voting) = setup();
        fund_voter(&mock, 50_000);
        mock.stub_read(REGISTRY_CONTRACT, "listings", listing_tuple(&owner(), 0));

        let err = voting
            .commit_vote("vid-2", VoteChoice::Support, TokenAmount(10_000))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoActiveChallenge { .. }));
        assert_eq!(mock.sent_count(), 0);
        // no salt was generated for the rejected commit
        assert_eq!(voting.store.salt("vid-2"), None);
    }

    #[tokio::test]
    async fn test_commit_vote_requires_balance_and_allowance() {
        let (mock, voting) = setup();
        mock.stub_read(REGISTRY_CONTRACT, "listings", listing_tuple(&owner(), 7));

        let err = voting
            .commit_vote("vid-2", VoteChoice::Oppose, TokenAmount(10_000))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientBalance { .. }));

        mock.set_balance(&mock.account(), TokenAmount(50_000));
        let err = voting
            .commit_vote("vid-2", VoteChoice::Oppose, TokenAmount(10_000))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientAllowance { .. }));
        assert_eq!(mock.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_request_voting_rights() {
        let (mock, voting) = setup();
        fund_voter(&mock, 50_000);

        voting
            .request_voting_rights(TokenAmount(20_000))
            .await
            .unwrap();
        assert_eq!(mock.sent()[0].method, "requestVotingRights");
    }

    #[tokio::test]
    async fn test_withdraw_voting_rights_respects_locked_tokens() {
        let (mock, voting) = setup();
        mock.stub_read(VOTING_CONTRACT, "voteTokenBalance", EthValue::Uint(30_000));
        mock.stub_read(VOTING_CONTRACT, "getLockedTokens", EthValue::Uint(25_000));

        let err = voting
            .withdraw_voting_rights(TokenAmount(10_000))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientUnlockedBalance { .. }));
        assert_eq!(mock.sent_count(), 0);

        voting
            .withdraw_voting_rights(TokenAmount(5_000))
            .await
            .unwrap();
        assert_eq!(mock.sent()[0].method, "withdrawVotingRights");
    }

    #[tokio::test]
    async fn test_rescue_tokens_before_expiry() {
        let (mock, voting) = setup();
        mock.stub_read(VOTING_CONTRACT, "pollMap", poll_tuple(2_000));
        mock.stub_read(VOTING_CONTRACT, "isExpired", EthValue::Bool(false));

        let err = voting.rescue_tokens(7).await.unwrap_err();
        assert!(matches!(err, Error::PollNotExpired { poll_id: 7 }));
        assert_eq!(mock.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_rescue_tokens_after_expiry() {
        let (mock, voting) = setup();
        mock.stub_read(VOTING_CONTRACT, "pollMap", poll_tuple(2_000));
        mock.stub_read(VOTING_CONTRACT, "isExpired", EthValue::Bool(true));

        voting.rescue_tokens(7).await.unwrap();
        assert_eq!(mock.sent()[0].method, "rescueTokens");
        assert_eq!(mock.sent()[0].args[0], EthValue::Uint(7));
    }

    #[tokio::test]
    async fn test_commit_period_active_passthrough() {
        let (mock, voting) = setup();
        mock.stub_read(VOTING_CONTRACT, "commitPeriodActive", EthValue::Bool(true));
        assert!(voting.commit_period_active(7).await.unwrap());
    }

    #[tokio::test]
    async fn test_undeployed_voting_contract_fails_fast() {
        let (mock, voting) = setup();
        mock.set_contract_address(VOTING_CONTRACT, Address::zero());

        let err = voting.get_last_node(None).await.unwrap_err();
        assert!(matches!(err, Error::ContractUnavailable { .. }));
    }
}
