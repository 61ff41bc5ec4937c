//! Wallet Gateway
//!
//! Owns the slot where an injected wallet provider lives (if any) and
//! performs the account-access handshake.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::rpc::{HttpProvider, WalletProvider};
use crate::{VendingConfig, VendingError};

#[derive(Clone, Default)]
pub struct WalletGateway {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl WalletGateway {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self { provider }
    }

    /// Gateway for the configured wallet endpoint, if one is configured
    pub fn from_config(config: &VendingConfig) -> Self {
        let provider = config
            .rpc_url
            .as_ref()
            .map(|url| Arc::new(HttpProvider::new(url.clone())) as Arc<dyn WalletProvider>);
        Self { provider }
    }

    /// The injected provider, if present
    pub fn detect_provider(&self) -> Option<Arc<dyn WalletProvider>> {
        self.provider.clone()
    }

    /// Provider for contract and network calls
    pub fn provider(&self) -> Result<Arc<dyn WalletProvider>, VendingError> {
        self.detect_provider().ok_or(VendingError::ProviderMissing)
    }

    /// Request account access and return the first account verbatim
    ///
    /// This opens the wallet's permission prompt; the call suspends until the
    /// user answers it.
    pub async fn connect(&self) -> Result<String, VendingError> {
        let provider = self
            .detect_provider()
            .filter(|p| p.supports_requests())
            .ok_or(VendingError::ProviderMissing)?;

        let accounts = provider.request("eth_requestAccounts", json!([])).await?;
        let account = first_account(accounts)?.ok_or(VendingError::NoAccounts)?;

        log::info!("👛 Wallet connected: {}", account);
        Ok(account)
    }

    /// Resolve the account that signs transactions
    ///
    /// Uses the already-authorized accounts when there are any, otherwise
    /// asks the wallet for access.
    pub async fn signer(&self) -> Result<String, VendingError> {
        let provider = self.provider()?;

        let authorized = provider.request("eth_accounts", json!([])).await?;
        if let Some(account) = first_account(authorized)? {
            return Ok(account);
        }

        let requested = provider.request("eth_requestAccounts", json!([])).await?;
        first_account(requested)?.ok_or(VendingError::NoAccounts)
    }
}

fn first_account(accounts: Value) -> Result<Option<String>, VendingError> {
    let accounts: Option<Vec<String>> = serde_json::from_value(accounts)?;
    Ok(accounts.and_then(|list| list.into_iter().next()))
}
