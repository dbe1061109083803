//! Common transaction types

use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionReceipt, U256};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Transaction is pending
    Pending,
    /// Transaction is confirmed
    Confirmed,
    /// Transaction was mined but reverted
    Failed,
}

/// Transaction request signed by the sending account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Recipient address, parsed when the transaction is built
    pub to: String,
    /// Value in wei
    pub value: U256,
    /// Calldata (for contract calls)
    pub data: Option<Bytes>,
}

impl TransferRequest {
    /// Plain value transfer
    pub fn transfer(to: impl Into<String>, value: U256) -> Self {
        Self {
            to: to.into(),
            value,
            data: None,
        }
    }

    /// Contract call carrying an opaque payload
    pub fn contract_call(to: impl Into<String>, value: U256, data: Bytes) -> Self {
        Self {
            to: to.into(),
            value,
            data: Some(data),
        }
    }
}

/// Transaction receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash
    pub hash: String,
    /// Status
    pub status: TransactionStatus,
    /// Block number
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: Option<String>,
    /// Fee paid in wei
    pub fee: Option<String>,
}

impl From<&TransactionReceipt> for TxReceipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        let status = match receipt.status.map(|s| s.as_u64()) {
            Some(0) => TransactionStatus::Failed,
            _ if receipt.block_number.is_none() => TransactionStatus::Pending,
            _ => TransactionStatus::Confirmed,
        };

        // Calculate fee
        let fee = match (receipt.gas_used, receipt.effective_gas_price) {
            (Some(gas_used), Some(gas_price)) => Some((gas_used * gas_price).to_string()),
            _ => None,
        };

        Self {
            hash: format!("{:?}", receipt.transaction_hash),
            status,
            block_number: receipt.block_number.map(|n| n.as_u64()),
            gas_used: receipt.gas_used.map(|g| g.to_string()),
            fee,
        }
    }
}

/// Execution-layer client used by the staking flow
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address transactions are sent from
    fn address(&self) -> Address;

    /// Current balance in wei
    async fn get_balance(&self, address: Address) -> Result<U256>;

    /// Sign, broadcast and wait until the transaction is mined
    async fn send_transaction(&self, request: TransferRequest) -> Result<TxReceipt>;
}
