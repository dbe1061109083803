//! Private key backed account

use std::fmt;

use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use ethers::utils::to_checksum;

use crate::config::Network;
use crate::error::{Error, Result};

/// The sending account
#[derive(Clone)]
pub struct Account {
    /// Wallet bound to the network chain ID
    wallet: LocalWallet,
}

impl Account {
    /// Derive an account from a hex private key, with or without `0x`
    pub fn from_private_key(private_key: &str, network: Network) -> Result<Self> {
        let key = private_key.trim();
        let key = key
            .strip_prefix("0x")
            .or_else(|| key.strip_prefix("0X"))
            .unwrap_or(key);

        let wallet = key
            .parse::<LocalWallet>()
            .map_err(|e| Error::KeyDerivation(format!("Invalid private key: {}", e)))?
            .with_chain_id(network.chain_id());

        Ok(Self { wallet })
    }

    /// Sender address
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Chain ID signatures are bound to
    pub fn chain_id(&self) -> u64 {
        self.wallet.chain_id()
    }

    /// Underlying signer
    pub fn wallet(&self) -> &LocalWallet {
        &self.wallet
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .field("chain_id", &self.chain_id())
            .finish()
    }
}

/// Derive the sending account for a network
pub fn derive_account(private_key: &str, network: Network) -> Result<Account> {
    Account::from_private_key(private_key, network)
}

/// EIP-55 checksummed rendering of an address
pub fn format_address(address: &Address) -> String {
    to_checksum(address, None)
}
