//! Account management functionality
//!
//! This module derives the sending account from the configured private key.
//! The account is created once per run and is read-only afterwards.

mod signer;

pub use signer::*;
