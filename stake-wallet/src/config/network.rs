//! Supported networks and their staking contract table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A network with a known staking deposit contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum mainnet
    Mainnet,
    /// Holesky testnet
    Holesky,
}

impl Network {
    /// Every network in the contract table
    pub const ALL: [Network; 2] = [Network::Mainnet, Network::Holesky];

    /// Identifier used in environment variables and API paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Holesky => "holesky",
        }
    }

    /// EIP-155 chain ID
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Holesky => 17000,
        }
    }

    /// Staking deposit contract the signed deposit is sent to
    pub fn contract_address(&self) -> &'static str {
        match self {
            Network::Mainnet => "0x00000000219ab540356cBB839Cbe05303d7705Fa",
            Network::Holesky => "0x4242424242424242424242424242424242424242",
        }
    }

    /// Look up a network identifier in the contract table.
    ///
    /// The match is exact; anything outside the table is reported as
    /// [`Error::UnsupportedNetwork`].
    pub fn lookup(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|network| network.as_str() == id)
            .ok_or_else(|| Error::UnsupportedNetwork(id.to_string()))
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(s)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
