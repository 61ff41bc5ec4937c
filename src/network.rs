//! Network Guard
//!
//! Writes are only sent when the wallet's active chain is the one the
//! contract is deployed on.

use alloy_primitives::U64;
use serde_json::json;

use crate::rpc::WalletProvider;
use crate::VendingError;

/// Read the wallet's active chain id
pub async fn chain_id(provider: &dyn WalletProvider) -> Result<u64, VendingError> {
    let raw = provider.request("eth_chainId", json!([])).await?;
    let chain_id: U64 = serde_json::from_value(raw)?;
    Ok(chain_id.to::<u64>())
}

/// Fail with `WrongNetwork` unless the wallet is on `expected`
pub async fn ensure_network(
    provider: &dyn WalletProvider,
    expected: u64,
) -> Result<(), VendingError> {
    let actual = chain_id(provider).await?;
    if actual != expected {
        log::warn!("🚫 Wallet on chain {}, expected {}", actual, expected);
        return Err(VendingError::WrongNetwork { expected, actual });
    }
    Ok(())
}
