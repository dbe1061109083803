//! Error types for the stake-wallet library

use thiserror::Error;

use crate::staking::StakingApiError;

/// Custom error type for stake-wallet operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required setting is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// The network identifier has no entry in the contract table
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Staking API call failed
    #[error("Staking API error: {0}")]
    Staking(#[from] StakingApiError),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type for stake-wallet operations
pub type Result<T> = std::result::Result<T, Error>;
