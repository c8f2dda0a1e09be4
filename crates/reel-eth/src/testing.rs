//! In-memory chain double for workspace tests.
//!
//! `MockChain` implements both collaborator traits over mutex-guarded
//! maps: reads are stubbed per `(contract, method)`, every `send` is
//! recorded so tests can assert exactly which transactions were (or were
//! not) submitted. An unstubbed read panics with the missing key, which
//! is what a test wants to hear.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reel_core::{Address, TokenAmount};

use crate::client::{ChainClient, TokenClient};
use crate::receipt::{EventLog, TxReceipt};
use crate::value::EthValue;
use crate::{Error, Result};

/// A transaction recorded by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTx {
    pub contract: String,
    pub method: String,
    pub args: Vec<EthValue>,
}

#[derive(Default)]
struct MockState {
    reads: HashMap<(String, String), EthValue>,
    read_queues: HashMap<(String, String), Vec<EthValue>>,
    receipts: HashMap<(String, String), Vec<TxReceipt>>,
    sent: Vec<SentTx>,
    balances: HashMap<Address, TokenAmount>,
    allowances: HashMap<(Address, Address), TokenAmount>,
    fail_next_send: Option<String>,
}

pub struct MockChain {
    account: Address,
    contracts: Mutex<HashMap<String, Address>>,
    state: Mutex<MockState>,
}

impl MockChain {
    /// A mock with the standard contract set deployed at distinct
    /// nonzero addresses.
    pub fn new() -> Self {
        let account = Address::parse("0x00000000000000000000000000000000000000aa").unwrap();
        let contracts = [
            ("TcrRegistry", "0x0000000000000000000000000000000000000001"),
            ("TcrParameterizer", "0x0000000000000000000000000000000000000002"),
            ("TcrPLCRVoting", "0x0000000000000000000000000000000000000003"),
            ("ReelToken", "0x0000000000000000000000000000000000000004"),
        ]
        .into_iter()
        .map(|(name, addr)| (name.to_string(), Address::parse(addr).unwrap()))
        .collect();

        Self {
            account,
            contracts: Mutex::new(contracts),
            state: Mutex::new(MockState::default()),
        }
    }

    /// Override (or undeploy, with the zero address) a named contract.
    pub fn set_contract_address(&self, name: &str, addr: Address) {
        self.contracts
            .lock()
            .unwrap()
            .insert(name.to_string(), addr);
    }

    /// Sticky stub: every read of `contract.method` returns `value`.
    pub fn stub_read(&self, contract: &str, method: &str, value: EthValue) {
        self.state
            .lock()
            .unwrap()
            .reads
            .insert((contract.to_string(), method.to_string()), value);
    }

    /// One-shot stub, consumed before any sticky value.
    pub fn stub_read_once(&self, contract: &str, method: &str, value: EthValue) {
        self.state
            .lock()
            .unwrap()
            .read_queues
            .entry((contract.to_string(), method.to_string()))
            .or_default()
            .push(value);
    }

    /// Queue the receipt returned by the next `send` to `contract.method`.
    pub fn stub_receipt(&self, contract: &str, method: &str, receipt: TxReceipt) {
        self.state
            .lock()
            .unwrap()
            .receipts
            .entry((contract.to_string(), method.to_string()))
            .or_default()
            .push(receipt);
    }

    /// Make the next `send` fail with `TransactionFailed`.
    pub fn fail_next_send(&self, reason: &str) {
        self.state.lock().unwrap().fail_next_send = Some(reason.to_string());
    }

    pub fn set_balance(&self, owner: &Address, amount: TokenAmount) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert(owner.clone(), amount);
    }

    pub fn set_allowance(&self, owner: &Address, spender: &Address, amount: TokenAmount) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((owner.clone(), spender.clone()), amount);
    }

    /// Every transaction submitted so far, in order.
    pub fn sent(&self) -> Vec<SentTx> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.state.lock().unwrap().sent.len()
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn contract_address(&self, name: &str) -> Result<Address> {
        self.contracts
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownContract(name.to_string()))
    }

    async fn call(&self, contract: &str, method: &str, _args: Vec<EthValue>) -> Result<EthValue> {
        let mut state = self.state.lock().unwrap();
        let key = (contract.to_string(), method.to_string());
        if let Some(queue) = state.read_queues.get_mut(&key) {
            if !queue.is_empty() {
                return Ok(queue.remove(0));
            }
        }
        match state.reads.get(&key) {
            Some(value) => Ok(value.clone()),
            None => panic!("MockChain: no stub for read {contract}.{method}"),
        }
    }

    async fn send(&self, contract: &str, method: &str, args: Vec<EthValue>) -> Result<TxReceipt> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = state.fail_next_send.take() {
            return Err(Error::TransactionFailed(reason));
        }
        state.sent.push(SentTx {
            contract: contract.to_string(),
            method: method.to_string(),
            args,
        });
        let key = (contract.to_string(), method.to_string());
        let receipt = match state.receipts.get_mut(&key) {
            Some(queue) if !queue.is_empty() => queue.remove(0),
            _ => TxReceipt {
                tx_hash: format!("0xmock{}", state.sent.len()),
                events: Vec::new(),
            },
        };
        Ok(receipt)
    }

    fn account(&self) -> Address {
        self.account.clone()
    }
}

#[async_trait]
impl TokenClient for MockChain {
    async fn balance_of(&self, owner: &Address) -> Result<TokenAmount> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .balances
            .get(owner)
            .copied()
            .unwrap_or(TokenAmount::ZERO))
    }

    async fn allowance(&self, owner: &Address, spender: &Address) -> Result<TokenAmount> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(TokenAmount::ZERO))
    }

    async fn approve(&self, spender: &Address, amount: TokenAmount) -> Result<TxReceipt> {
        let mut state = self.state.lock().unwrap();
        state
            .allowances
            .insert((self.account.clone(), spender.clone()), amount);
        state.sent.push(SentTx {
            contract: "ReelToken".to_string(),
            method: "approve".to_string(),
            args: vec![EthValue::Address(spender.clone()), EthValue::from(amount)],
        });
        Ok(TxReceipt {
            tx_hash: format!("0xapprove{}", state.sent.len()),
            events: Vec::new(),
        })
    }
}

/// Build a one-event receipt, the common case in tests.
pub fn receipt_with_event(event: &str, fields: Vec<(&str, EthValue)>) -> TxReceipt {
    TxReceipt {
        tx_hash: "0xreceipt".to_string(),
        events: vec![EventLog {
            name: event.to_string(),
            fields: fields
                .into_iter()
                .map(|(n, v)| (n.to_string(), v))
                .collect(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stubbed_reads_and_recorded_sends() {
        let mock = MockChain::new();
        mock.stub_read("TcrRegistry", "isWhitelisted", EthValue::Bool(true));

        let value = mock
            .call("TcrRegistry", "isWhitelisted", vec![])
            .await
            .unwrap();
        assert_eq!(value, EthValue::Bool(true));

        mock.send("TcrRegistry", "exit", vec![]).await.unwrap();
        assert_eq!(mock.sent_count(), 1);
        assert_eq!(mock.sent()[0].method, "exit");
    }

    #[tokio::test]
    async fn test_one_shot_stub_precedes_sticky() {
        let mock = MockChain::new();
        mock.stub_read("TcrRegistry", "appWasMade", EthValue::Bool(true));
        mock.stub_read_once("TcrRegistry", "appWasMade", EthValue::Bool(false));

        let first = mock.call("TcrRegistry", "appWasMade", vec![]).await.unwrap();
        let second = mock.call("TcrRegistry", "appWasMade", vec![]).await.unwrap();
        assert_eq!(first, EthValue::Bool(false));
        assert_eq!(second, EthValue::Bool(true));
    }

    #[tokio::test]
    async fn test_approve_updates_allowance() {
        let mock = MockChain::new();
        let spender = Address::parse("0x0000000000000000000000000000000000000001").unwrap();
        mock.approve(&spender, TokenAmount(500)).await.unwrap();

        let allowance = mock.allowance(&mock.account(), &spender).await.unwrap();
        assert_eq!(allowance, TokenAmount(500));
    }

    #[tokio::test]
    async fn test_fail_next_send() {
        let mock = MockChain::new();
        mock.fail_next_send("reverted");
        let err = mock.send("TcrRegistry", "exit", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::TransactionFailed(_)));
        assert_eq!(mock.sent_count(), 0);
    }
}
