//! Ethereum transaction functionality

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::prelude::{Address, TransactionRequest as EthersTransactionRequest, U256};
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::LocalWallet;
use tracing::{debug, info, instrument};

use crate::account::{derive_account, Account};
use crate::config::Config;
use crate::error::{Error, Result};
use super::types::{ChainClient, TransferRequest, TxReceipt};

/// Chain client backed by an ethers HTTP provider and the local account
pub struct EthereumChainClient {
    /// Sending account
    account: Account,
    /// Signing middleware
    client: Arc<SignerMiddleware<Provider<Http>, LocalWallet>>,
}

impl EthereumChainClient {
    /// Create a new client against a JSON-RPC endpoint
    pub fn new(rpc_url: &str, account: Account) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| Error::Provider(format!("Failed to create Ethereum provider: {}", e)))?;

        let client = SignerMiddleware::new(provider, account.wallet().clone());

        Ok(Self {
            account,
            client: Arc::new(client),
        })
    }

    /// Derive the account and connect to the configured network
    pub fn from_config(config: &Config) -> Result<Self> {
        let account = derive_account(&config.private_key, config.network)?;
        Self::new(&config.execution_rpc_url(), account)
    }

    /// Convert a transfer request to an ethers transaction request
    fn build_transaction(&self, request: &TransferRequest) -> Result<EthersTransactionRequest> {
        let to = Address::from_str(request.to.trim())
            .map_err(|e| Error::InvalidInput(format!("Invalid recipient address {}: {}", request.to, e)))?;

        let mut tx = EthersTransactionRequest::new()
            .from(self.account.address())
            .to(to)
            .value(request.value)
            .chain_id(self.account.chain_id());

        // Add data if provided
        if let Some(data) = &request.data {
            tx = tx.data(data.clone());
        }

        Ok(tx)
    }
}

#[async_trait]
impl ChainClient for EthereumChainClient {
    fn address(&self) -> Address {
        self.account.address()
    }

    #[instrument(skip(self))]
    async fn get_balance(&self, address: Address) -> Result<U256> {
        let balance = self
            .client
            .get_balance(address, None)
            .await
            .map_err(|e| Error::Provider(format!("Failed to get balance: {}", e)))?;

        debug!(%balance, "Fetched balance");
        Ok(balance)
    }

    #[instrument(skip(self, request), fields(to = %request.to, value = %request.value))]
    async fn send_transaction(&self, request: TransferRequest) -> Result<TxReceipt> {
        let tx = self.build_transaction(&request)?;

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| Error::Transaction(format!("Failed to send transaction: {}", e)))?;

        let tx_hash = pending.tx_hash();
        info!(hash = ?tx_hash, "Transaction submitted, waiting to be mined");

        let receipt = pending
            .await
            .map_err(|e| Error::Transaction(format!("Failed to get transaction receipt: {}", e)))?
            .ok_or_else(|| Error::Transaction(format!("Transaction {:?} was dropped", tx_hash)))?;

        Ok(TxReceipt::from(&receipt))
    }
}
