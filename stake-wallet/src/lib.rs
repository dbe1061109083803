//! Stake Wallet Core - credential validation and staking deposit flow
//!
//! This library checks that a set of execution-layer and staking API
//! credentials work together: it derives the sender account, reads its
//! balance, optionally sends a test transfer, asks the staking API for a
//! deposit transaction and finally signs and broadcasts it.

pub mod error;
pub mod config;
pub mod units;
pub mod account;
pub mod transaction;
pub mod staking;
pub mod flow;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use config::{Config, Network};
pub use flow::{FlowOutcome, FlowReport, StakeFlow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
