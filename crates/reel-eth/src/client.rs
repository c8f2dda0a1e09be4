//! Collaborator traits implemented by the host application.

use async_trait::async_trait;
use reel_core::{Address, TokenAmount};

use crate::receipt::TxReceipt;
use crate::value::EthValue;
use crate::Result;

/// Access to named contracts on the chain.
///
/// `contract_address` resolves through the on-chain name registry: an
/// unknown name is an error, while a known-but-undeployed contract
/// resolves to the zero address (callers decide what that means for
/// them). `call` never costs gas or mutates state; `send` submits a
/// signed transaction and suspends until the receipt is available.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn contract_address(&self, name: &str) -> Result<Address>;

    async fn call(&self, contract: &str, method: &str, args: Vec<EthValue>) -> Result<EthValue>;

    async fn send(&self, contract: &str, method: &str, args: Vec<EthValue>) -> Result<TxReceipt>;

    /// The account transactions are signed with.
    fn account(&self) -> Address;
}

/// ERC20-style operations on the staking token
#[async_trait]
pub trait TokenClient: Send + Sync {
    async fn balance_of(&self, owner: &Address) -> Result<TokenAmount>;

    async fn allowance(&self, owner: &Address, spender: &Address) -> Result<TokenAmount>;

    async fn approve(&self, spender: &Address, amount: TokenAmount) -> Result<TxReceipt>;
}
