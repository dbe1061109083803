//! Staking API request and response types

use async_trait::async_trait;
use ethers::types::{Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::Network;
use crate::error::{Error, Result};
use super::error::StakingApiError;

/// Deposit amount of a single validator, in gwei
pub const VALIDATOR_DEPOSIT_GWEI: u64 = 32_000_000_000;

/// One validator deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    /// Amount in gwei, as a decimal string
    pub amount: String,
    /// Address that receives withdrawals
    pub withdrawal_address: String,
}

/// Body of a create stake intent call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeIntentRequest {
    /// Validator deposits, in order
    pub stakes: Vec<Stake>,
}

impl StakeIntentRequest {
    /// Request a single validator deposit
    pub fn single(amount_gwei: U256, withdrawal_address: impl Into<String>) -> Self {
        Self {
            stakes: vec![Stake {
                amount: amount_gwei.to_string(),
                withdrawal_address: withdrawal_address.into(),
            }],
        }
    }

    /// Sum of all stake amounts, in gwei
    pub fn total_gwei(&self) -> Result<U256> {
        self.stakes.iter().try_fold(U256::zero(), |total, stake| {
            let amount = U256::from_dec_str(&stake.amount)
                .map_err(|e| Error::InvalidInput(format!("Invalid stake amount {}: {}", stake.amount, e)))?;
            total
                .checked_add(amount)
                .ok_or_else(|| Error::InvalidInput("Stake amounts overflow".to_string()))
        })
    }
}

/// Ethereum part of a stake intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthereumStakeIntent {
    /// Hex encoded calldata to sign and broadcast
    pub unsigned_transaction: String,
    /// Contract the calldata targets
    pub contract_address: String,
    /// Fields this client does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EthereumStakeIntent {
    /// Decode the unsigned transaction payload
    pub fn unsigned_transaction_bytes(&self) -> Result<Bytes> {
        let payload = self.unsigned_transaction.trim();
        let payload = payload.strip_prefix("0x").unwrap_or(payload);

        hex::decode(payload)
            .map(Bytes::from)
            .map_err(|e| Error::InvalidInput(format!("Invalid unsigned transaction: {}", e)))
    }
}

/// Response of a create stake intent call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeIntentResponse {
    /// Intent identifier, when the service returns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stake_intent_id: Option<String>,
    /// Ethereum deposit data
    pub ethereum: EthereumStakeIntent,
    /// Fields this client does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The staking API operations the flow depends on
#[async_trait]
pub trait StakingApi: Send + Sync {
    /// Attach the API key used by every subsequent call
    fn authenticate(&mut self, api_key: &str);

    /// Reserve validators and get the unsigned deposit transaction
    async fn create_stake_intent(
        &self,
        network: Network,
        request: &StakeIntentRequest,
    ) -> std::result::Result<StakeIntentResponse, StakingApiError>;
}
