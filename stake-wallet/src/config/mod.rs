//! Configuration resolution
//!
//! The whole run is driven by one immutable [`Config`] value. It is resolved
//! once at process start from a key lookup (normally the process
//! environment) and passed explicitly to every component.

mod network;

pub use network::*;

use std::fmt;

use ethers::types::U256;

use crate::error::{Error, Result};
use crate::units::{parse_units, Denomination};

/// Network identifier, e.g. `holesky`
pub const NETWORK_VAR: &str = "NETWORK";
/// API key for the execution JSON-RPC endpoint
pub const EXECUTION_API_KEY_VAR: &str = "EXECUTION_API_KEY";
/// API key for the staking API
pub const STAKING_API_KEY_VAR: &str = "STAKING_API_KEY";
/// Hex encoded sender private key
pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
/// Recipient of the test transfer
pub const RECEIVER_ADDRESS_VAR: &str = "RECEIVER_ADDRESS";
/// Optional override of the execution API host
pub const EXECUTION_API_BASE_URL_VAR: &str = "EXECUTION_API_BASE_URL";
/// Optional override of the staking API host
pub const STAKING_API_BASE_URL_VAR: &str = "STAKING_API_BASE_URL";
/// Optional test transfer amount in ether
pub const TEST_TRANSFER_ETHER_VAR: &str = "TEST_TRANSFER_ETHER";

/// Default execution API host
pub const DEFAULT_EXECUTION_API_BASE_URL: &str = "https://svc.blockdaemon.com";
/// Default staking API host
pub const DEFAULT_STAKING_API_BASE_URL: &str = "https://svc.blockdaemon.com/boss";
/// Default test transfer amount in ether
pub const DEFAULT_TEST_TRANSFER_ETHER: &str = "0.0001";

/// Resolved run configuration
#[derive(Clone)]
pub struct Config {
    /// Target network
    pub network: Network,
    /// Execution API key
    pub execution_api_key: String,
    /// Staking API key
    pub staking_api_key: String,
    /// Sender private key, hex encoded
    pub private_key: String,
    /// Test transfer recipient. Parsed only when the transfer is built.
    pub receiver_address: String,
    /// Execution API host
    pub execution_api_base_url: String,
    /// Staking API host
    pub staking_api_base_url: String,
    /// Test transfer amount in wei
    pub test_transfer_wei: U256,
}

impl Config {
    /// Resolve the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    ///
    /// The network is resolved before anything else so an unsupported
    /// identifier is reported even when other settings are missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            read(key).ok_or_else(|| Error::Config(format!("Missing environment variable {}", key)))
        };

        let network = Network::lookup(required(NETWORK_VAR)?.trim())?;

        let execution_api_key = required(EXECUTION_API_KEY_VAR)?;
        let staking_api_key = required(STAKING_API_KEY_VAR)?;
        let private_key = required(PRIVATE_KEY_VAR)?;
        let receiver_address = required(RECEIVER_ADDRESS_VAR)?;

        let execution_api_base_url = read(EXECUTION_API_BASE_URL_VAR)
            .unwrap_or_else(|| DEFAULT_EXECUTION_API_BASE_URL.to_string());
        let staking_api_base_url = read(STAKING_API_BASE_URL_VAR)
            .unwrap_or_else(|| DEFAULT_STAKING_API_BASE_URL.to_string());

        let test_transfer = read(TEST_TRANSFER_ETHER_VAR)
            .unwrap_or_else(|| DEFAULT_TEST_TRANSFER_ETHER.to_string());
        let test_transfer_wei = parse_units(&test_transfer, Denomination::Ether)
            .map_err(|e| Error::Config(format!("Invalid {}: {}", TEST_TRANSFER_ETHER_VAR, e)))?;

        Ok(Self {
            network,
            execution_api_key,
            staking_api_key,
            private_key,
            receiver_address,
            execution_api_base_url: trim_base_url(execution_api_base_url),
            staking_api_base_url: trim_base_url(staking_api_base_url),
            test_transfer_wei,
        })
    }

    /// JSON-RPC endpoint for the configured network
    pub fn execution_rpc_url(&self) -> String {
        format!(
            "{}/ethereum/{}/native?apiKey={}",
            self.execution_api_base_url, self.network, self.execution_api_key
        )
    }
}

fn trim_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("network", &self.network)
            .field("execution_api_key", &"<redacted>")
            .field("staking_api_key", &"<redacted>")
            .field("private_key", &"<redacted>")
            .field("receiver_address", &self.receiver_address)
            .field("execution_api_base_url", &self.execution_api_base_url)
            .field("staking_api_base_url", &self.staking_api_base_url)
            .field("test_transfer_wei", &self.test_transfer_wei)
            .finish()
    }
}
