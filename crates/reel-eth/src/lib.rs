//! Contract invocation layer for the Reel SDK.
//!
//! The SDK never talks to a node directly: every chain interaction goes
//! through the [`ChainClient`] and [`TokenClient`] traits, which a host
//! application implements on top of its own web3-style binding. This
//! crate defines those seams, the decoded value model ([`EthValue`]),
//! transaction receipts with declared event schemas, and an in-memory
//! [`testing::MockChain`] used throughout the workspace tests.

pub mod client;
pub mod receipt;
pub mod testing;
pub mod value;

pub use client::{ChainClient, TokenClient};
pub use receipt::{EventField, EventLog, TxReceipt};
pub use value::EthValue;

/// Result type for chain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the contract invocation layer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The name registry has no entry for this contract at all.
    #[error("unknown contract `{0}`")]
    UnknownContract(String),

    /// The node rejected or reverted a submitted transaction. Raised by
    /// the collaborator, passed through to callers unmodified.
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    #[error("decode error: expected {expected}, got {got}")]
    Decode { expected: &'static str, got: String },
}
