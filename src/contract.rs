//! Contract Proxy
//!
//! Callable handle to the deployed vending machine contract. A handle is
//! either bound to the read-only provider (views only) or to the connected
//! account's signer (views and transactions). Handles are cheap and are
//! built fresh for every action.
//!
//! Errors from the chain are passed through as classified by
//! [`VendingError::from_rpc`]; nothing here retries or reinterprets them.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use alloy_sol_types::{sol, SolCall};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::rpc::WalletProvider;
use crate::wallet::WalletGateway;
use crate::{VendingConfig, VendingError};

sol! {
    /// Vending machine contract ABI
    interface VendingMachine {
        function buyItem(uint256 index) external payable;
        function addStock(uint256 index, uint256 amount) external;
        function withdrawBalance() external;
        function checkStock(uint256 index) external view returns (string memory name, uint256 stock);
    }
}

/// Transaction or call object in JSON-RPC form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    #[serde(default, alias = "input")]
    pub data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

/// Subset of the receipt fields this client looks at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    /// 1 on success, 0 when execution reverted
    #[serde(default)]
    pub status: Option<U64>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status != Some(U64::ZERO)
    }
}

/// Handle to the deployed contract
pub struct ContractHandle {
    provider: Arc<dyn WalletProvider>,
    address: Address,
    /// Signing account; `None` for read-only handles
    signer: Option<Address>,
    poll_interval: Duration,
    confirmation_attempts: u32,
}

impl ContractHandle {
    /// Build a handle to the configured contract
    ///
    /// With `signed` the active signer is resolved through the wallet first,
    /// and its failure is returned as-is.
    pub async fn connect(
        gateway: &WalletGateway,
        config: &VendingConfig,
        signed: bool,
    ) -> Result<Self, VendingError> {
        let provider = gateway.provider()?;

        let signer = if signed {
            let account = gateway.signer().await?;
            let address = account.parse::<Address>().map_err(|e| {
                VendingError::InvalidResponse(format!("Bad signer address {}: {}", account, e))
            })?;
            Some(address)
        } else {
            None
        };

        Ok(Self {
            provider,
            address: config.contract_address,
            signer,
            poll_interval: config.confirmation_poll_interval,
            confirmation_attempts: config.confirmation_attempts,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> Option<Address> {
        self.signer
    }

    /// Purchase one unit of `index`, paying `value`
    pub async fn buy_item(
        &self,
        index: usize,
        value: U256,
    ) -> Result<PendingTransaction, VendingError> {
        let call = VendingMachine::buyItemCall {
            index: U256::from(index),
        };
        log::info!("🛒 CONTRACT: buyItem({}) value={} wei", index, value);
        self.send(call.abi_encode(), Some(value)).await
    }

    /// Increase the stock of `index` by `amount`
    pub async fn add_stock(
        &self,
        index: usize,
        amount: U256,
    ) -> Result<PendingTransaction, VendingError> {
        let call = VendingMachine::addStockCall {
            index: U256::from(index),
            amount,
        };
        log::info!("📦 CONTRACT: addStock({}, {})", index, amount);
        self.send(call.abi_encode(), None).await
    }

    /// Move the contract balance to its owner
    pub async fn withdraw_balance(&self) -> Result<PendingTransaction, VendingError> {
        let call = VendingMachine::withdrawBalanceCall {};
        log::info!("💸 CONTRACT: withdrawBalance()");
        self.send(call.abi_encode(), None).await
    }

    /// Read the name and current stock of `index`
    pub async fn check_stock(&self, index: usize) -> Result<(String, u64), VendingError> {
        let call = VendingMachine::checkStockCall {
            index: U256::from(index),
        };
        let request = TransactionRequest {
            from: self.signer,
            to: self.address,
            data: call.abi_encode().into(),
            value: None,
        };

        let raw = self
            .provider
            .request("eth_call", json!([request, "latest"]))
            .await?;
        let output: Bytes = serde_json::from_value(raw)?;
        let decoded = VendingMachine::checkStockCall::abi_decode_returns(&output, true)?;

        if decoded.stock > U256::from(u64::MAX) {
            return Err(VendingError::InvalidResponse(format!(
                "Stock for item {} does not fit in u64: {}",
                index, decoded.stock
            )));
        }

        Ok((decoded.name, decoded.stock.to::<u64>()))
    }

    async fn send(
        &self,
        data: Vec<u8>,
        value: Option<U256>,
    ) -> Result<PendingTransaction, VendingError> {
        let from = self.signer.ok_or(VendingError::SignerRequired)?;
        let request = TransactionRequest {
            from: Some(from),
            to: self.address,
            data: data.into(),
            value,
        };

        let raw = self
            .provider
            .request("eth_sendTransaction", json!([request]))
            .await?;
        let hash: B256 = serde_json::from_value(raw)?;

        log::info!("  Submitted tx {}", hash);

        Ok(PendingTransaction {
            provider: self.provider.clone(),
            hash,
            poll_interval: self.poll_interval,
            attempts: self.confirmation_attempts,
        })
    }
}

/// A submitted transaction that has not been observed in a block yet
pub struct PendingTransaction {
    provider: Arc<dyn WalletProvider>,
    hash: B256,
    poll_interval: Duration,
    attempts: u32,
}

impl PendingTransaction {
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Wait until the transaction is mined
    ///
    /// Fails with `ContractRevert` when the receipt reports a failed
    /// execution and with `ConfirmationTimeout` once all polls are spent.
    pub async fn wait(self) -> Result<TransactionReceipt, VendingError> {
        for attempt in 1..=self.attempts {
            let raw = self
                .provider
                .request("eth_getTransactionReceipt", json!([self.hash]))
                .await?;

            if !raw.is_null() {
                let receipt: TransactionReceipt = serde_json::from_value(raw)?;
                if !receipt.succeeded() {
                    return Err(VendingError::ContractRevert(format!(
                        "transaction {} reverted",
                        self.hash
                    )));
                }
                log::info!("  ✓ Confirmed tx {}", self.hash);
                return Ok(receipt);
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(VendingError::ConfirmationTimeout(self.hash.to_string()))
    }
}
