//! TCR error taxonomy.
//!
//! Every precondition violation gets its own variant and is raised
//! before any transaction is submitted; failures from the chain
//! collaborator pass through transparently so callers keep the
//! underlying cause.

use reel_core::{Address, TokenAmount};

/// Result type for TCR operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("contract `{name}` is not deployed in this registry")]
    ContractUnavailable { name: &'static str },

    #[error("video {video_id} is already whitelisted")]
    AlreadyWhitelisted { video_id: String },

    #[error("video {video_id} already applied and is awaiting a decision")]
    ApplicationAlreadyExists { video_id: String },

    #[error("amount to stake {amount} is less than the minimum deposit {min_deposit}")]
    InsufficientStake {
        amount: TokenAmount,
        min_deposit: TokenAmount,
    },

    #[error("balance {balance} is less than the required {required}")]
    InsufficientBalance {
        balance: TokenAmount,
        required: TokenAmount,
    },

    #[error("allowance {allowance} is less than the required {required}")]
    InsufficientAllowance {
        allowance: TokenAmount,
        required: TokenAmount,
    },

    #[error("unlocked voting balance {unlocked} is less than the requested {amount}")]
    InsufficientUnlockedBalance {
        unlocked: TokenAmount,
        amount: TokenAmount,
    },

    #[error("withdrawing would leave {remaining}, under the minimum deposit {min_deposit}")]
    BelowMinDeposit {
        remaining: TokenAmount,
        min_deposit: TokenAmount,
    },

    #[error("no listing exists for video {video_id}")]
    ListingNotFound { video_id: String },

    #[error("no challenge exists with id {challenge_id}")]
    ChallengeNotFound { challenge_id: u64 },

    #[error("video {video_id} is not currently being challenged")]
    NoActiveChallenge { video_id: String },

    #[error("a challenge for video {video_id} already exists (id {challenge_id})")]
    ChallengeAlreadyExists {
        video_id: String,
        challenge_id: u64,
    },

    #[error("video {video_id} cannot exit during an open challenge")]
    ChallengeInProgress { video_id: String },

    #[error("video {video_id} must be whitelisted for this operation")]
    NotWhitelisted { video_id: String },

    #[error("video {video_id} has no open application and is not whitelisted")]
    NothingToChallenge { video_id: String },

    #[error("account {account} is not the owner of listing {video_id}")]
    NotOwner { video_id: String, account: Address },

    #[error("account {account} has already claimed the reward for challenge {challenge_id}")]
    AlreadyClaimed { challenge_id: u64, account: Address },

    #[error("challenge {challenge_id} has not been resolved yet")]
    ChallengeUnresolved { challenge_id: u64 },

    #[error("poll {poll_id} has not expired yet")]
    PollNotExpired { poll_id: u64 },

    #[error("challenge for video {video_id} was submitted but no challenge id was emitted")]
    ChallengeStartFailed { video_id: String },

    #[error(transparent)]
    Chain(#[from] reel_eth::Error),

    #[error(transparent)]
    Store(#[from] reel_store::Error),
}
