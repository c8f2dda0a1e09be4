//! Listing lifecycle operations.
//!
//! A listing moves through `unlisted -> applied -> whitelisted` (or is
//! knocked out by a challenge along the way). Every state-changing
//! operation here re-reads the current on-chain state, checks its
//! preconditions locally, and only then submits the transaction; once a
//! transaction is in flight the receipt's event log is the sole source
//! of truth for what happened.

use std::sync::Arc;

use reel_core::{Address, TokenAmount};
use reel_eth::{ChainClient, EthValue, EventField, TokenClient, TxReceipt};
use reel_store::HashStore;

use crate::error::{Error, Result};
use crate::params::ParamReader;
use crate::types::{uint_to_u64, Challenge, Listing};
use crate::REGISTRY_CONTRACT;

/// Where `apply` finds the hash the contract actually stored
const APPLICATION_LISTING_HASH: EventField = EventField {
    event: "_Application",
    field: "listingHash",
    occurrence: 1,
};

/// Where `start_challenge` finds the new poll id
const CHALLENGE_ID: EventField = EventField {
    event: "_Challenge",
    field: "challengeID",
    occurrence: 1,
};

#[derive(Clone)]
pub struct Registry {
    chain: Arc<dyn ChainClient>,
    token: Arc<dyn TokenClient>,
    store: HashStore,
    params: ParamReader,
}

impl Registry {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        token: Arc<dyn TokenClient>,
        store: HashStore,
    ) -> Self {
        let params = ParamReader::new(chain.clone());
        Self {
            chain,
            token,
            store,
            params,
        }
    }

    pub fn store(&self) -> &HashStore {
        &self.store
    }

    /// Resolve the registry contract, failing if it is not deployed.
    async fn registry_address(&self) -> Result<Address> {
        let address = self.chain.contract_address(REGISTRY_CONTRACT).await?;
        if address.is_zero() {
            return Err(Error::ContractUnavailable {
                name: REGISTRY_CONTRACT,
            });
        }
        Ok(address)
    }

    // ------------------------------------------------------------------
    // read-only queries
    // ------------------------------------------------------------------

    /// True only once the listing is actually whitelisted; an application
    /// in progress still reads `false` (see [`Registry::app_was_made`]).
    pub async fn is_whitelisted(&self, video_id: &str) -> Result<bool> {
        self.registry_address().await?;
        let hash = self.store.hash_of(video_id);
        let value = self
            .chain
            .call(
                REGISTRY_CONTRACT,
                "isWhitelisted",
                vec![EthValue::Bytes(hash.as_bytes().to_vec())],
            )
            .await?;
        Ok(value.as_bool()?)
    }

    /// Whether an unchallenged application is past its apply stage.
    pub async fn can_be_whitelisted(&self, video_id: &str) -> Result<bool> {
        self.registry_address().await?;
        let hash = self.store.hash_of(video_id);
        let value = self
            .chain
            .call(
                REGISTRY_CONTRACT,
                "canBeWhitelisted",
                vec![EthValue::Bytes(hash.as_bytes().to_vec())],
            )
            .await?;
        Ok(value.as_bool()?)
    }

    /// Whether the video has started the application process.
    pub async fn app_was_made(&self, video_id: &str) -> Result<bool> {
        self.registry_address().await?;
        let hash = self.store.hash_of(video_id);
        let value = self
            .chain
            .call(
                REGISTRY_CONTRACT,
                "appWasMade",
                vec![EthValue::Bytes(hash.as_bytes().to_vec())],
            )
            .await?;
        Ok(value.as_bool()?)
    }

    pub async fn get_listing(&self, video_id: &str) -> Result<Listing> {
        self.registry_address().await?;
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

    pub async fn get_challenge(&self, challenge_id: u64) -> Result<Challenge> {
        self.registry_address().await?;
        let value = self
            .chain
            .call(
                REGISTRY_CONTRACT,
                "challenges",
                vec![EthValue::Uint(challenge_id as u128)],
            )
            .await?;
        let challenge = Challenge::decode(&value)?;
        if challenge.challenger.is_zero() {
            return Err(Error::ChallengeNotFound { challenge_id });
        }
        Ok(challenge)
    }

    /// Whether `voter` has already claimed their share of a resolved
    /// challenge's reward pool.
    pub async fn token_claimed(&self, challenge_id: u64, voter: &Address) -> Result<bool> {
        self.registry_address().await?;
        let value = self
            .chain
            .call(
                REGISTRY_CONTRACT,
                "tokenClaims",
                vec![
                    EthValue::Uint(challenge_id as u128),
                    EthValue::Address(voter.clone()),
                ],
            )
            .await?;
        Ok(value.as_bool()?)
    }

    /// The voter's token reward for a resolved challenge.
    pub async fn voter_reward(
        &self,
        voter: &Address,
        challenge_id: u64,
        salt: &str,
    ) -> Result<TokenAmount> {
        self.registry_address().await?;
        let value = self
            .chain
            .call(
                REGISTRY_CONTRACT,
                "voterReward",
                vec![
                    EthValue::Address(voter.clone()),
                    EthValue::Uint(challenge_id as u128),
                    EthValue::Str(salt.to_string()),
                ],
            )
            .await?;
        Ok(value.as_amount()?)
    }

    // ------------------------------------------------------------------
    // state-changing operations
    // ------------------------------------------------------------------

    /// Apply to list `video_id`, staking `amount`.
    ///
    /// The caller must already have approved the registry to move the
    /// stake; [`Registry::check_eligibility_and_apply`] does both steps.
    /// Returns `true` iff the receipt carries an `_Application` event for
    /// the expected hash; a mined transaction without it is a soft
    /// failure, not an error.
    pub async fn apply(&self, video_id: &str, amount: TokenAmount, data: &str) -> Result<bool> {
        let min_deposit = self.params.min_deposit().await?;
        if self.is_whitelisted(video_id).await? {
            return Err(Error::AlreadyWhitelisted {
                video_id: video_id.to_string(),
            });
        }
        if self.app_was_made(video_id).await? {
            return Err(Error::ApplicationAlreadyExists {
                video_id: video_id.to_string(),
            });
        }
        if !amount.sufficient_for(min_deposit) {
            return Err(Error::InsufficientStake {
                amount,
                min_deposit,
            });
        }

        self.registry_address().await?;
        let hash = self.store.hash_of(video_id);
        tracing::debug!(video_id, %amount, "submitting application");
        let receipt = self
            .chain
            .send(
                REGISTRY_CONTRACT,
                "apply",
                vec![
                    EthValue::Bytes(hash.as_bytes().to_vec()),
                    EthValue::from(amount),
                    EthValue::Str(data.to_string()),
                ],
            )
            .await?;

        match receipt.extract(&APPLICATION_LISTING_HASH) {
            Some(EthValue::Bytes(stored)) if stored.as_slice() == hash.as_bytes() => Ok(true),
            _ => Ok(false),
        }
    }

    /// Approve the stake transfer, then apply.
    ///
    /// A post-approval allowance that differs from `amount` means
    /// something else touched the allowance concurrently; that is
    /// surfaced as a warning and the application proceeds.
    pub async fn check_eligibility_and_apply(
        &self,
        video_id: &str,
        amount: TokenAmount,
    ) -> Result<bool> {
        let min_deposit = self.params.min_deposit().await?;
        if !amount.sufficient_for(min_deposit) {
            return Err(Error::InsufficientStake {
                amount,
                min_deposit,
            });
        }
        if self.is_whitelisted(video_id).await? {
            return Err(Error::AlreadyWhitelisted {
                video_id: video_id.to_string(),
            });
        }
        if self.app_was_made(video_id).await? {
            return Err(Error::ApplicationAlreadyExists {
                video_id: video_id.to_string(),
            });
        }

        let registry = self.registry_address().await?;
        self.token.approve(&registry, amount).await?;
        let allowance = self
            .token
            .allowance(&self.chain.account(), &registry)
            .await?;
        if allowance != amount {
            tracing::warn!(%allowance, %amount, "allowance after approve does not match requested stake");
        }

        self.apply(video_id, amount, "").await
    }

    /// Increase the unstaked deposit of a listing the caller owns.
    pub async fn deposit(&self, video_id: &str, amount: TokenAmount) -> Result<TxReceipt> {
        let hash = self.store.get_and_store_hash(video_id);
        let listing = self.get_listing(video_id).await?;
        let account = self.chain.account();
        if listing.owner != account {
            return Err(Error::NotOwner {
                video_id: video_id.to_string(),
                account,
            });
        }

        let registry = self.registry_address().await?;
        let allowance = self.token.allowance(&account, &registry).await?;
        if !allowance.sufficient_for(amount) {
            return Err(Error::InsufficientAllowance {
                allowance,
                required: amount,
            });
        }

        Ok(self
            .chain
            .send(
                REGISTRY_CONTRACT,
                "deposit",
                vec![
                    EthValue::Bytes(hash.as_bytes().to_vec()),
                    EthValue::from(amount),
                ],
            )
            .await?)
    }

    /// Decrease the unstaked deposit. The remainder has to stay at or
    /// above the minimum deposit.
    pub async fn withdraw(&self, video_id: &str, amount: TokenAmount) -> Result<TxReceipt> {
        self.registry_address().await?;
        let hash = self.store.get_and_store_hash(video_id);
        let listing = self.get_listing(video_id).await?;
        let account = self.chain.account();
        if listing.owner != account {
            return Err(Error::NotOwner {
                video_id: video_id.to_string(),
                account,
            });
        }
        if !listing.unstaked_deposit.sufficient_for(amount) {
            return Err(Error::InsufficientBalance {
                balance: listing.unstaked_deposit,
                required: amount,
            });
        }
        let min_deposit = self.params.min_deposit().await?;
        let remaining = listing.unstaked_deposit.sub(amount);
        if !remaining.sufficient_for(min_deposit) {
            return Err(Error::BelowMinDeposit {
                remaining,
                min_deposit,
            });
        }

        Ok(self
            .chain
            .send(
                REGISTRY_CONTRACT,
                "withdraw",
                vec![
                    EthValue::Bytes(hash.as_bytes().to_vec()),
                    EthValue::from(amount),
                ],
            )
            .await?)
    }

    /// Remove a whitelisted listing and return the stake. Blocked while
    /// a challenge is unresolved.
    pub async fn exit(&self, video_id: &str) -> Result<TxReceipt> {
        if !self.is_whitelisted(video_id).await? {
            return Err(Error::NotWhitelisted {
                video_id: video_id.to_string(),
            });
        }
        let listing = self.get_listing(video_id).await?;
        let account = self.chain.account();
        if listing.owner != account {
            return Err(Error::NotOwner {
                video_id: video_id.to_string(),
                account,
            });
        }
        if listing.has_open_challenge() {
            let challenge = self.get_challenge(listing.challenge_id).await?;
            if !challenge.resolved {
                return Err(Error::ChallengeInProgress {
                    video_id: video_id.to_string(),
                });
            }
        }

        self.registry_address().await?;
        let hash = self.store.hash_of(video_id);
        Ok(self
            .chain
            .send(
                REGISTRY_CONTRACT,
                "exit",
                vec![EthValue::Bytes(hash.as_bytes().to_vec())],
            )
            .await?)
    }

    /// Open a challenge against an applied or whitelisted video.
    /// Returns the new challenge (poll) id from the `_Challenge` event.
    pub async fn start_challenge(&self, video_id: &str, data: &str) -> Result<u64> {
        let registry = self.registry_address().await?;
        let hash = self.store.get_and_store_hash(video_id);

        let min_deposit = self.params.min_deposit().await?;
        let account = self.chain.account();
        let balance = self.token.balance_of(&account).await?;
        let allowance = self.token.allowance(&account, &registry).await?;
        if !allowance.sufficient_for(min_deposit) {
            return Err(Error::InsufficientAllowance {
                allowance,
                required: min_deposit,
            });
        }
        if !balance.sufficient_for(min_deposit) {
            return Err(Error::InsufficientBalance {
                balance,
                required: min_deposit,
            });
        }

        let app_was_made = self.app_was_made(video_id).await?;
        let is_whitelisted = self.is_whitelisted(video_id).await?;
        if !app_was_made && !is_whitelisted {
            return Err(Error::NothingToChallenge {
                video_id: video_id.to_string(),
            });
        }
        let listing = self.get_listing(video_id).await?;
        if listing.has_open_challenge() {
            return Err(Error::ChallengeAlreadyExists {
                video_id: video_id.to_string(),
                challenge_id: listing.challenge_id,
            });
        }

        tracing::debug!(video_id, "submitting challenge");
        let receipt = self
            .chain
            .send(
                REGISTRY_CONTRACT,
                "challenge",
                vec![
                    EthValue::Bytes(hash.as_bytes().to_vec()),
                    EthValue::Str(data.to_string()),
                ],
            )
            .await?;

        match receipt.extract(&CHALLENGE_ID) {
            Some(value) => Ok(uint_to_u64(value.as_uint()?)?),
            None => Err(Error::ChallengeStartFailed {
                video_id: video_id.to_string(),
            }),
        }
    }

    /// Advance an application to the whitelist or finalize a resolved
    /// challenge. Required before rewards can be claimed.
    pub async fn update_status(&self, video_id: &str) -> Result<TxReceipt> {
        let hash = self.store.get_and_store_hash(video_id);
        self.registry_address().await?;
        Ok(self
            .chain
            .send(
                REGISTRY_CONTRACT,
                "updateStatus",
                vec![EthValue::Bytes(hash.as_bytes().to_vec())],
            )
            .await?)
    }

    /// Claim the caller's voter reward for the listing's challenge,
    /// using the salt of the vote being rewarded.
    pub async fn claim_reward(&self, video_id: &str, salt: &str) -> Result<TxReceipt> {
        self.registry_address().await?;
        let listing = self.get_listing(video_id).await?;
        let challenge_id = listing.challenge_id;
        let challenge = self.get_challenge(challenge_id).await?;

        let account = self.chain.account();
        if self.token_claimed(challenge_id, &account).await? {
            return Err(Error::AlreadyClaimed {
                challenge_id,
                account,
            });
        }
        if !challenge.resolved {
            return Err(Error::ChallengeUnresolved { challenge_id });
        }

        Ok(self
            .chain
            .send(
                REGISTRY_CONTRACT,
                "claimReward",
                vec![
                    EthValue::Uint(challenge_id as u128),
                    EthValue::Str(salt.to_string()),
                ],
            )
            .await?)
    }
}
