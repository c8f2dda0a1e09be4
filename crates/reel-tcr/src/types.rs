//! Decoded on-chain records.
//!
//! The contracts return flat tuples; the decoders here pin the field
//! order once so the rest of the crate works with named fields.

use reel_core::{Address, TokenAmount};
use reel_eth::EthValue;

use crate::error::Result;

pub(crate) fn uint_to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        reel_eth::Error::Decode {
            expected: "u64",
            got: format!("Uint({value})"),
        }
        .into()
    })
}

/// A candidate or accepted registry entry, keyed on-chain by the hash of
/// its video id.
///
/// `whitelisted` and an open application are independent states: an
/// applied-but-undecided listing has `whitelisted == false` while its
/// application exists on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Timestamp after which an unchallenged application can be finalized
    pub application_expiry: u64,
    pub whitelisted: bool,
    pub owner: Address,
    /// Stake not locked in an active challenge
    pub unstaked_deposit: TokenAmount,
    /// 0 when no open challenge exists
    pub challenge_id: u64,
}

impl Listing {
    /// Decode the `listings(hash)` tuple:
    /// `(applicationExpiry, whitelisted, owner, unstakedDeposit, challengeID)`.
    pub fn decode(value: &EthValue) -> Result<Self> {
        let fields = value.as_tuple()?;
        let expected = || reel_eth::Error::Decode {
            expected: "Tuple(len 5)",
            got: format!("Tuple(len {})", fields.len()),
        };
        if fields.len() != 5 {
            return Err(expected().into());
        }
        Ok(Self {
            application_expiry: uint_to_u64(fields[0].as_uint()?)?,
            whitelisted: fields[1].as_bool()?,
            owner: fields[2].as_address()?,
            unstaked_deposit: fields[3].as_amount()?,
            challenge_id: uint_to_u64(fields[4].as_uint()?)?,
        })
    }

    pub fn has_open_challenge(&self) -> bool {
        self.challenge_id != 0
    }
}

/// A dispute over a listing. A zero `challenger` address means the
/// challenge does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Pool paid out to winning voters
    pub reward_pool: TokenAmount,
    pub challenger: Address,
    pub resolved: bool,
    pub stake: TokenAmount,
    /// Tokens of all winning voters, the denominator for reward shares
    pub total_tokens: TokenAmount,
}

impl Challenge {
    /// Decode the `challenges(id)` tuple:
    /// `(rewardPool, challenger, resolved, stake, totalTokens)`.
    pub fn decode(value: &EthValue) -> Result<Self> {
        let fields = value.as_tuple()?;
        if fields.len() != 5 {
            return Err(reel_eth::Error::Decode {
                expected: "Tuple(len 5)",
                got: format!("Tuple(len {})", fields.len()),
            }
            .into());
        }
        Ok(Self {
            reward_pool: fields[0].as_amount()?,
            challenger: fields[1].as_address()?,
            resolved: fields[2].as_bool()?,
            stake: fields[3].as_amount()?,
            total_tokens: fields[4].as_amount()?,
        })
    }
}

/// A commit-reveal voting contest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub commit_end_date: u64,
    pub reveal_end_date: u64,
    pub vote_quorum: u64,
    pub votes_for: TokenAmount,
    pub votes_against: TokenAmount,
}

impl Poll {
    /// Decode the `pollMap(id)` tuple:
    /// `(commitEndDate, revealEndDate, voteQuorum, votesFor, votesAgainst)`.
    pub fn decode(value: &EthValue) -> Result<Self> {
        let fields = value.as_tuple()?;
        if fields.len() != 5 {
            return Err(reel_eth::Error::Decode {
                expected: "Tuple(len 5)",
                got: format!("Tuple(len {})", fields.len()),
            }
            .into());
        }
        Ok(Self {
            commit_end_date: uint_to_u64(fields[0].as_uint()?)?,
            reveal_end_date: uint_to_u64(fields[1].as_uint()?)?,
            vote_quorum: uint_to_u64(fields[2].as_uint()?)?,
            votes_for: fields[3].as_amount()?,
            votes_against: fields[4].as_amount()?,
        })
    }
}

/// The two sides of a challenge vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChoice {
    /// Vote to reject the listing
    Oppose,
    /// Vote to keep the listing
    Support,
}

impl VoteChoice {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Oppose => 0,
            Self::Support => 1,
        }
    }
}
