//! Credential validation flow
//!
//! The flow walks a fixed sequence of states:
//!
//! ```text
//! ResolveConfig -> QueryBalance -> ConfirmTestTransfer -> [SendTestTransfer]
//!   -> Authenticate -> ConfirmCreateIntent -> CreateIntent
//!   -> ConfirmSignAndSend -> SignAndBroadcast -> Done
//! ```
//!
//! Declining either of the last two confirmations ends the run. Any error
//! aborts it; there is no retry or resumption.

mod prompt;

pub use prompt::*;

use std::io::Write;

use ethers::types::{Address, U256};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::account::format_address;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::staking::{StakeIntentRequest, StakeIntentResponse, StakingApi, VALIDATOR_DEPOSIT_GWEI};
use crate::transaction::{ChainClient, TransferRequest, TxReceipt};
use crate::units::{display_units, gwei_to_wei, Denomination};

/// Flow states, in the order they are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    ResolveConfig,
    QueryBalance,
    ConfirmTestTransfer,
    SendTestTransfer,
    Authenticate,
    ConfirmCreateIntent,
    CreateIntent,
    ConfirmSignAndSend,
    SignAndBroadcast,
    Done,
    /// Operator declined to continue
    Terminated,
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Deposit broadcast and mined
    Completed,
    /// Operator declined stake intent creation
    DeclinedIntent,
    /// Operator declined signing the deposit
    DeclinedBroadcast,
}

/// Everything the run produced
#[derive(Debug, Clone)]
pub struct FlowReport {
    /// Sender address
    pub sender: Address,
    /// Sender balance in wei
    pub balance: U256,
    /// Receipt of the optional test transfer
    pub test_transfer: Option<TxReceipt>,
    /// Stake intent request sent to the staking API
    pub request: Option<StakeIntentRequest>,
    /// Stake intent returned by the staking API
    pub intent: Option<StakeIntentResponse>,
    /// Receipt of the deposit transaction
    pub deposit: Option<TxReceipt>,
    /// Visited states
    pub states: Vec<FlowState>,
    /// How the run ended
    pub outcome: FlowOutcome,
}

/// One run of the validation flow
pub struct StakeFlow<'a, C, S, P, W> {
    config: &'a Config,
    chain: &'a C,
    staking: &'a mut S,
    prompt: &'a mut P,
    out: &'a mut W,

    states: Vec<FlowState>,
    sender: Address,
    balance: U256,
    test_transfer: Option<TxReceipt>,
    request: Option<StakeIntentRequest>,
    intent: Option<StakeIntentResponse>,
    deposit_value: U256,
    /// Contract named by the stake intent when it differs from the table
    contract_mismatch: Option<String>,
    deposit: Option<TxReceipt>,
    outcome: Option<FlowOutcome>,
}

impl<'a, C, S, P, W> StakeFlow<'a, C, S, P, W>
where
    C: ChainClient,
    S: StakingApi,
    P: Confirm,
    W: Write,
{
    /// Create a new flow over injected clients, prompt and output
    pub fn new(config: &'a Config, chain: &'a C, staking: &'a mut S, prompt: &'a mut P, out: &'a mut W) -> Self {
        Self {
            config,
            chain,
            staking,
            prompt,
            out,
            states: Vec::new(),
            sender: chain.address(),
            balance: U256::zero(),
            test_transfer: None,
            request: None,
            intent: None,
            deposit_value: U256::zero(),
            contract_mismatch: None,
            deposit: None,
            outcome: None,
        }
    }

    /// Walk every state until the run completes or is declined
    pub async fn run(mut self) -> Result<FlowReport> {
        let mut state = FlowState::ResolveConfig;

        loop {
            debug!(?state, "Entering flow state");
            self.states.push(state);

            match self.step(state).await? {
                Some(next) => state = next,
                None => break,
            }
        }

        let outcome = self
            .outcome
            .ok_or_else(|| Error::InvalidInput("Flow stopped without an outcome".to_string()))?;

        Ok(FlowReport {
            sender: self.sender,
            balance: self.balance,
            test_transfer: self.test_transfer,
            request: self.request,
            intent: self.intent,
            deposit: self.deposit,
            states: self.states,
            outcome,
        })
    }

    async fn step(&mut self, state: FlowState) -> Result<Option<FlowState>> {
        let next = match state {
            FlowState::ResolveConfig => {
                info!(network = %self.config.network, "Using resolved configuration");
                writeln!(self.out, "Network: {}", self.config.network)?;
                FlowState::QueryBalance
            }
            FlowState::QueryBalance => {
                writeln!(self.out, "Sender address: {}", format_address(&self.sender))?;

                self.balance = self.chain.get_balance(self.sender).await?;
                writeln!(
                    self.out,
                    "Balance: {} {}",
                    display_units(self.balance, Denomination::Ether)?,
                    Denomination::Ether
                )?;
                FlowState::ConfirmTestTransfer
            }
            FlowState::ConfirmTestTransfer => {
                let question = format!(
                    "Send a test transfer of {} {} to {}?",
                    display_units(self.config.test_transfer_wei, Denomination::Ether)?,
                    Denomination::Ether,
                    self.config.receiver_address
                );

                if self.prompt.confirm(&question)? {
                    FlowState::SendTestTransfer
                } else {
                    writeln!(self.out, "Skipping test transfer")?;
                    FlowState::Authenticate
                }
            }
            FlowState::SendTestTransfer => {
                let request = TransferRequest::transfer(
                    self.config.receiver_address.clone(),
                    self.config.test_transfer_wei,
                );
                let receipt = self.chain.send_transaction(request).await?;

                info!(hash = %receipt.hash, "Test transfer mined");
                writeln!(self.out, "Test transfer receipt: {}", to_json(&receipt)?)?;
                self.test_transfer = Some(receipt);
                FlowState::Authenticate
            }
            FlowState::Authenticate => {
                self.staking.authenticate(&self.config.staking_api_key);
                FlowState::ConfirmCreateIntent
            }
            FlowState::ConfirmCreateIntent => {
                let question = format!(
                    "Create a stake intent for one validator on {}?",
                    self.config.network
                );

                if self.prompt.confirm(&question)? {
                    FlowState::CreateIntent
                } else {
                    writeln!(self.out, "Stake intent creation declined, exiting")?;
                    self.outcome = Some(FlowOutcome::DeclinedIntent);
                    FlowState::Terminated
                }
            }
            FlowState::CreateIntent => {
                let request = StakeIntentRequest::single(
                    U256::from(VALIDATOR_DEPOSIT_GWEI),
                    format_address(&self.sender),
                );
                self.deposit_value = gwei_to_wei(request.total_gwei()?)?;

                let intent = self
                    .staking
                    .create_stake_intent(self.config.network, &request)
                    .await?;

                writeln!(self.out, "Stake intent created: {}", to_json(&intent)?)?;
                self.check_intent(&intent)?;

                self.request = Some(request);
                self.intent = Some(intent);
                FlowState::ConfirmSignAndSend
            }
            FlowState::ConfirmSignAndSend => {
                let mut question = format!(
                    "Sign and broadcast the deposit of {} {} to {}",
                    display_units(self.deposit_value, Denomination::Ether)?,
                    Denomination::Ether,
                    self.config.network.contract_address()
                );
                if let Some(returned) = &self.contract_mismatch {
                    question.push_str(&format!(" (stake intent names {})", returned));
                }
                question.push('?');

                if self.prompt.confirm(&question)? {
                    FlowState::SignAndBroadcast
                } else {
                    writeln!(self.out, "Deposit declined, exiting")?;
                    self.outcome = Some(FlowOutcome::DeclinedBroadcast);
                    FlowState::Terminated
                }
            }
            FlowState::SignAndBroadcast => {
                let intent = self
                    .intent
                    .as_ref()
                    .ok_or_else(|| Error::InvalidInput("No stake intent to sign".to_string()))?;
                let data = intent.ethereum.unsigned_transaction_bytes()?;

                let request = TransferRequest::contract_call(
                    self.config.network.contract_address(),
                    self.deposit_value,
                    data,
                );
                let receipt = self.chain.send_transaction(request).await?;

                info!(hash = %receipt.hash, "Deposit transaction mined");
                writeln!(self.out, "Deposit transaction receipt: {}", to_json(&receipt)?)?;
                self.deposit = Some(receipt);
                FlowState::Done
            }
            FlowState::Done => {
                self.outcome = Some(FlowOutcome::Completed);
                return Ok(None);
            }
            FlowState::Terminated => return Ok(None),
        };

        Ok(Some(next))
    }

    /// Warnings only; the operator decides at the next prompt
    fn check_intent(&mut self, intent: &StakeIntentResponse) -> Result<()> {
        let expected = self.config.network.contract_address();
        let returned = &intent.ethereum.contract_address;
        if !returned.eq_ignore_ascii_case(expected) {
            warn!(
                expected,
                %returned,
                "Stake intent targets a different contract than the network table"
            );
            writeln!(
                self.out,
                "Warning: stake intent names contract {}, deposit goes to {}",
                returned, expected
            )?;
            self.contract_mismatch = Some(returned.clone());
        }

        if self.balance < self.deposit_value {
            warn!(
                balance = %self.balance,
                required = %self.deposit_value,
                "Balance does not cover the deposit"
            );
        }

        Ok(())
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::InvalidInput(format!("Failed to serialize: {}", e)))
}
