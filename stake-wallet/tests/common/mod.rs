//! Shared test doubles

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ethers::types::{Address, U256};
use serde_json::json;

use stake_wallet::account::derive_account;
use stake_wallet::config::*;
use stake_wallet::flow::Confirm;
use stake_wallet::staking::{StakeIntentRequest, StakeIntentResponse, StakingApi, StakingApiError};
use stake_wallet::transaction::{ChainClient, TransactionStatus, TransferRequest, TxReceipt};
use stake_wallet::{Error, Result};

pub const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const RECEIVER: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
pub const UNSIGNED_TX: &str = "0x22895118000000000000000000000000000000000000000000000000000000000000";

/// Ordered record of every call made to the doubles
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn test_env(network: &str) -> HashMap<String, String> {
    [
        (NETWORK_VAR, network),
        (EXECUTION_API_KEY_VAR, "exec-key"),
        (STAKING_API_KEY_VAR, "stake-key"),
        (PRIVATE_KEY_VAR, TEST_KEY),
        (RECEIVER_ADDRESS_VAR, RECEIVER),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn test_config(network: &str) -> Config {
    let vars = test_env(network);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn intent_response(network: Network) -> StakeIntentResponse {
    serde_json::from_value(json!({
        "stake_intent_id": "stake_intent_1",
        "ethereum": {
            "unsigned_transaction": UNSIGNED_TX,
            "contract_address": network.contract_address(),
        }
    }))
    .unwrap()
}

/// In-memory chain client
pub struct MockChain {
    pub address: Address,
    pub balance: U256,
    pub fail_balance: bool,
    pub events: EventLog,
    pub sent: Mutex<Vec<TransferRequest>>,
}

impl MockChain {
    pub fn new(events: EventLog, balance: U256) -> Self {
        let account = derive_account(TEST_KEY, Network::Holesky).unwrap();
        Self {
            address: account.address(),
            balance,
            fail_balance: false,
            events,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<TransferRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    fn address(&self) -> Address {
        self.address
    }

    async fn get_balance(&self, address: Address) -> Result<U256> {
        self.events.lock().unwrap().push("get_balance".to_string());
        assert_eq!(address, self.address);

        if self.fail_balance {
            return Err(Error::Provider("connection refused".to_string()));
        }
        Ok(self.balance)
    }

    async fn send_transaction(&self, request: TransferRequest) -> Result<TxReceipt> {
        self.events
            .lock()
            .unwrap()
            .push(format!("send_transaction:{}", request.to));

        let mut sent = self.sent.lock().unwrap();
        sent.push(request);

        Ok(TxReceipt {
            hash: format!("0x{:064x}", sent.len()),
            status: TransactionStatus::Confirmed,
            block_number: Some(100 + sent.len() as u64),
            gas_used: Some("21000".to_string()),
            fee: Some("21000000000000".to_string()),
        })
    }
}

/// In-memory staking API
pub struct MockStaking {
    pub api_key: Option<String>,
    pub response: std::result::Result<StakeIntentResponse, StakingApiError>,
    pub events: EventLog,
    pub requests: Mutex<Vec<(Network, StakeIntentRequest)>>,
}

impl MockStaking {
    pub fn new(events: EventLog, response: std::result::Result<StakeIntentResponse, StakingApiError>) -> Self {
        Self {
            api_key: None,
            response,
            events,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(Network, StakeIntentRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StakingApi for MockStaking {
    fn authenticate(&mut self, api_key: &str) {
        self.events.lock().unwrap().push("authenticate".to_string());
        self.api_key = Some(api_key.to_string());
    }

    async fn create_stake_intent(
        &self,
        network: Network,
        request: &StakeIntentRequest,
    ) -> std::result::Result<StakeIntentResponse, StakingApiError> {
        self.events
            .lock()
            .unwrap()
            .push("create_stake_intent".to_string());

        if self.api_key.is_none() {
            return Err(StakingApiError::Unauthorized("missing api key".to_string()));
        }

        self.requests.lock().unwrap().push((network, request.clone()));
        self.response.clone()
    }
}

/// Prompt answering from a fixed script
pub struct ScriptedPrompt {
    answers: VecDeque<bool>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirm for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| Error::Prompt(format!("No scripted answer for: {}", question)))
    }
}
