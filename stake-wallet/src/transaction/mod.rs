//! Transaction functionality
//!
//! This module provides the chain client used by the staking flow: balance
//! queries plus signing and broadcasting of transfers and contract calls.

pub mod types;
mod ethereum;

pub use types::*;
pub use ethereum::*;
