//! Staking API functionality
//!
//! This module provides the client for the staking intents HTTP API. Only
//! the stake intent endpoints are implemented; every call goes through one
//! generic request core that attaches the API key and maps error statuses.

mod types;
mod error;
mod client;

pub use types::*;
pub use error::*;
pub use client::*;
