//! Exact conversion between wei, gwei and ether
//!
//! All amounts are integers in the smallest unit. Display strings are
//! produced and parsed with decimal arithmetic only; nothing here goes
//! through floating point.

use std::fmt;

use ethers::types::U256;
use ethers::utils::{self, ParseUnits};

use crate::error::{Error, Result};

/// Denominations of the native token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denomination {
    /// Base unit
    Wei,
    /// 10^9 wei
    Gwei,
    /// 10^18 wei
    Ether,
}

impl Denomination {
    /// Number of decimals relative to wei
    pub fn decimals(&self) -> u32 {
        match self {
            Denomination::Wei => 0,
            Denomination::Gwei => 9,
            Denomination::Ether => 18,
        }
    }

    /// Display symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Denomination::Wei => "wei",
            Denomination::Gwei => "gwei",
            Denomination::Ether => "ETH",
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Render a wei amount in the given denomination, keeping every decimal
pub fn format_units(amount: U256, denomination: Denomination) -> Result<String> {
    // ethers renders zero decimals as "n.0"
    if denomination == Denomination::Wei {
        return Ok(amount.to_string());
    }

    utils::format_units(amount, denomination.decimals())
        .map_err(|e| Error::InvalidInput(format!("Failed to format amount: {}", e)))
}

/// Render a wei amount for humans: trailing fractional zeros are dropped
pub fn display_units(amount: U256, denomination: Denomination) -> Result<String> {
    let formatted = format_units(amount, denomination)?;
    if !formatted.contains('.') {
        return Ok(formatted);
    }

    let trimmed = formatted.trim_end_matches('0');
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    Ok(trimmed.to_string())
}

/// Parse a decimal amount in the given denomination into wei.
///
/// Negative values and values with more fractional digits than the
/// denomination can carry are rejected instead of truncated.
pub fn parse_units(amount: &str, denomination: Denomination) -> Result<U256> {
    let amount = amount.trim();
    if amount.starts_with('-') {
        return Err(Error::InvalidInput(format!("Negative amount: {}", amount)));
    }

    if let Some((_, fraction)) = amount.split_once('.') {
        if fraction.len() as u32 > denomination.decimals() {
            return Err(Error::InvalidInput(format!(
                "Amount {} has more decimal places than {} allows",
                amount, denomination
            )));
        }
    }

    match utils::parse_units(amount, denomination.decimals()) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(Error::InvalidInput(format!("Negative amount: {}", amount))),
        Err(e) => Err(Error::InvalidInput(format!("Invalid amount {}: {}", amount, e))),
    }
}

/// Rescale an integer amount from one denomination to another.
///
/// Fails if the result does not fit or if precision would be lost.
pub fn convert(amount: U256, from: Denomination, to: Denomination) -> Result<U256> {
    let (from_decimals, to_decimals) = (from.decimals(), to.decimals());

    if from_decimals >= to_decimals {
        let factor = U256::exp10((from_decimals - to_decimals) as usize);
        return amount
            .checked_mul(factor)
            .ok_or_else(|| Error::InvalidInput(format!("Amount {} {} overflows in {}", amount, from, to)));
    }

    let factor = U256::exp10((to_decimals - from_decimals) as usize);
    if !(amount % factor).is_zero() {
        return Err(Error::InvalidInput(format!(
            "Amount {} {} is not a whole number of {}",
            amount, from, to
        )));
    }
    Ok(amount / factor)
}

/// Convert whole gwei into wei
pub fn gwei_to_wei(gwei: U256) -> Result<U256> {
    convert(gwei, Denomination::Gwei, Denomination::Wei)
}
