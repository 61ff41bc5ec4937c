//! Vending Session
//!
//! UI state controller. Holds what the front-end displays (account, stock
//! per item, restock drafts, status line) and implements the user actions on
//! top of the wallet gateway, network guard and contract proxy.
//!
//! Actions never fail outward: every error becomes the status line. The
//! state lock is only taken to apply a finished result, never across a call
//! to the wallet or chain, so concurrent actions interleave freely and the
//! last one to complete owns the status line.

use alloy_primitives::U256;
use futures::future::try_join_all;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::catalog::{self, Item, CATALOG, ITEM_COUNT};
use crate::contract::ContractHandle;
use crate::messages::{Locale, Operation};
use crate::network;
use crate::wallet::WalletGateway;
use crate::{VendingConfig, VendingError};

/// Displayed state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Connected account, verbatim as the wallet returned it
    pub account: Option<String>,
    /// Last known stock per item; `None` until first read
    pub stocks: [Option<u64>; ITEM_COUNT],
    /// Pending restock amounts entered by the owner
    pub drafts: [u64; ITEM_COUNT],
    /// Most recent outcome
    pub status: String,
}

impl SessionState {
    pub fn apply_connect(&mut self, locale: Locale, result: Result<String, VendingError>) {
        match result {
            Ok(account) => {
                self.account = Some(account);
                self.status = locale.connected();
            }
            Err(e) => self.status = locale.failed(Operation::Connect, &e),
        }
    }

    pub fn apply_stock(&mut self, locale: Locale, index: usize, result: Result<u64, VendingError>) {
        match (result, self.stocks.get_mut(index)) {
            (Ok(stock), Some(slot)) => *slot = Some(stock),
            (Ok(_), None) => {
                let err = VendingError::UnknownItem(index);
                self.status = locale.failed(Operation::CheckStock, &err);
            }
            (Err(e), _) => self.status = locale.failed(Operation::CheckStock, &e),
        }
    }

    /// All-or-nothing: either every entry is replaced or none is
    pub fn apply_all_stocks(
        &mut self,
        locale: Locale,
        result: Result<[u64; ITEM_COUNT], VendingError>,
    ) {
        match result {
            Ok(stocks) => self.stocks = stocks.map(Some),
            Err(e) => self.status = locale.failed(Operation::CheckAllStocks, &e),
        }
    }

    pub fn apply_purchase(&mut self, locale: Locale, result: Result<&Item, VendingError>) {
        self.status = match result {
            Ok(item) => locale.purchased(item),
            Err(e) => locale.failed(Operation::Buy, &e),
        };
    }

    pub fn apply_restock(
        &mut self,
        locale: Locale,
        amount: u64,
        result: Result<&Item, VendingError>,
    ) {
        match result {
            Ok(item) => {
                self.status = locale.stock_added(item, amount);
                self.drafts[item.index] = 0;
            }
            Err(e) => self.status = locale.failed(Operation::AddStock, &e),
        }
    }

    pub fn apply_withdrawal(&mut self, locale: Locale, result: Result<(), VendingError>) {
        self.status = match result {
            Ok(()) => locale.withdrawn(),
            Err(e) => locale.failed(Operation::Withdraw, &e),
        };
    }
}

/// Per-item row of the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub index: usize,
    pub name: &'static str,
    pub stock: Option<u64>,
    pub draft: u64,
}

/// What the UI renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub account: Option<String>,
    pub status: String,
    /// Purchase buttons are enabled only with a connected account
    pub can_buy: bool,
    /// Show restock and withdraw controls. A hint only: the contract does
    /// its own owner check.
    pub is_owner: bool,
    pub item_price_wei: String,
    pub items: Vec<ItemView>,
}

pub struct VendingSession {
    config: VendingConfig,
    gateway: WalletGateway,
    state: RwLock<SessionState>,
}

impl VendingSession {
    pub fn new(config: VendingConfig, gateway: WalletGateway) -> Self {
        Self {
            config,
            gateway,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Session wired to the wallet endpoint named in `config`
    pub fn from_config(config: VendingConfig) -> Self {
        let gateway = WalletGateway::from_config(&config);
        Self::new(config, gateway)
    }

    pub fn config(&self) -> &VendingConfig {
        &self.config
    }

    fn locale(&self) -> Locale {
        self.config.locale
    }

    // ============================================================================
    // Lifecycle & views
    // ============================================================================

    /// Initial stock refresh, run once when the page opens
    pub async fn start(&self) {
        log::info!("🏪 Vending session started");
        self.check_all_stocks().await;
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> SessionView {
        let state = self.state.read().await;
        let is_owner = state
            .account
            .as_deref()
            .map(|account| self.config.is_owner(account))
            .unwrap_or(false);

        SessionView {
            account: state.account.clone(),
            status: state.status.clone(),
            can_buy: state.account.is_some(),
            is_owner,
            item_price_wei: self.config.item_price.to_string(),
            items: CATALOG
                .iter()
                .map(|item| ItemView {
                    index: item.index,
                    name: item.name,
                    stock: state.stocks[item.index],
                    draft: state.drafts[item.index],
                })
                .collect(),
        }
    }

    /// Update the restock input for `index`
    pub async fn set_stock_draft(&self, index: usize, amount: u64) -> Result<(), VendingError> {
        let item = catalog::item(index)?;
        self.state.write().await.drafts[item.index] = amount;
        Ok(())
    }

    // ============================================================================
    // Actions
    // ============================================================================

    pub async fn connect(&self) {
        let result = self.gateway.connect().await;
        if let Err(ref e) = result {
            log::warn!("Connect failed: {}", e);
        }
        self.state.write().await.apply_connect(self.locale(), result);
    }

    pub async fn check_stock(&self, index: usize) {
        let result = self.read_stock(index).await;
        match result {
            Ok(stock) => log::info!("📊 Item {} stock: {}", index, stock),
            Err(ref e) => log::warn!("Stock check for item {} failed: {}", index, e),
        }
        self.state
            .write()
            .await
            .apply_stock(self.locale(), index, result);
    }

    pub async fn check_all_stocks(&self) {
        let result = self.read_all_stocks().await;
        match result {
            Ok(ref stocks) => log::info!("📊 Stocks: {:?}", stocks),
            Err(ref e) => log::warn!("Stock refresh failed: {}", e),
        }
        self.state
            .write()
            .await
            .apply_all_stocks(self.locale(), result);
    }

    pub async fn buy_item(&self, index: usize) {
        if self.state.read().await.account.is_none() {
            self.state.write().await.status = self.locale().connect_first();
            return;
        }

        let result = self.submit_purchase(index).await;
        let succeeded = result.is_ok();
        if let Err(ref e) = result {
            log::warn!("Purchase of item {} failed: {}", index, e);
        }
        self.state
            .write()
            .await
            .apply_purchase(self.locale(), result);

        if succeeded {
            self.check_stock(index).await;
        }
    }

    /// Restock `index` by `amount`; non-positive amounts are rejected locally
    pub async fn add_stock(&self, index: usize, amount: i64) {
        self.restock(index, u64::try_from(amount).unwrap_or(0)).await;
    }

    /// Restock `index` with the amount currently in its draft
    pub async fn add_stock_from_draft(&self, index: usize) {
        let draft = match catalog::item(index) {
            Ok(item) => self.state.read().await.drafts[item.index],
            Err(e) => {
                self.state.write().await.status = self.locale().failed(Operation::AddStock, &e);
                return;
            }
        };
        self.restock(index, draft).await;
    }

    async fn restock(&self, index: usize, amount: u64) {
        if amount == 0 {
            self.state.write().await.status = self.locale().amount_required();
            return;
        }

        let result = self.submit_restock(index, amount).await;
        let succeeded = result.is_ok();
        if let Err(ref e) = result {
            log::warn!("Restock of item {} failed: {}", index, e);
        }
        self.state
            .write()
            .await
            .apply_restock(self.locale(), amount, result);

        if succeeded {
            self.check_stock(index).await;
        }
    }

    pub async fn withdraw_balance(&self) {
        let result = self.submit_withdrawal().await;
        if let Err(ref e) = result {
            log::warn!("Withdrawal failed: {}", e);
        }
        self.state
            .write()
            .await
            .apply_withdrawal(self.locale(), result);
    }

    // ============================================================================
    // Chain interaction
    // ============================================================================

    async fn read_stock(&self, index: usize) -> Result<u64, VendingError> {
        catalog::item(index)?;
        let contract = ContractHandle::connect(&self.gateway, &self.config, false).await?;
        let (_, stock) = contract.check_stock(index).await?;
        Ok(stock)
    }

    async fn read_all_stocks(&self) -> Result<[u64; ITEM_COUNT], VendingError> {
        let contract = ContractHandle::connect(&self.gateway, &self.config, false).await?;
        let reads = CATALOG.iter().map(|item| contract.check_stock(item.index));
        let results = try_join_all(reads).await?;

        let mut stocks = [0u64; ITEM_COUNT];
        for (slot, (_, stock)) in stocks.iter_mut().zip(results) {
            *slot = stock;
        }
        Ok(stocks)
    }

    /// Wallet -> network guard -> signed contract, in that order
    async fn signed_contract(&self) -> Result<ContractHandle, VendingError> {
        let provider = self.gateway.provider()?;
        network::ensure_network(provider.as_ref(), self.config.chain_id).await?;
        ContractHandle::connect(&self.gateway, &self.config, true).await
    }

    async fn submit_purchase(&self, index: usize) -> Result<&'static Item, VendingError> {
        let item = catalog::item(index)?;
        let contract = self.signed_contract().await?;
        contract
            .buy_item(item.index, self.config.item_price)
            .await?
            .wait()
            .await?;
        log::info!("✅ Purchased {}", item.name);
        Ok(item)
    }

    async fn submit_restock(&self, index: usize, amount: u64) -> Result<&'static Item, VendingError> {
        let item = catalog::item(index)?;
        let contract = self.signed_contract().await?;
        contract
            .add_stock(item.index, U256::from(amount))
            .await?
            .wait()
            .await?;
        log::info!("✅ Restocked {} by {}", item.name, amount);
        Ok(item)
    }

    async fn submit_withdrawal(&self) -> Result<(), VendingError> {
        let contract = self.signed_contract().await?;
        contract.withdraw_balance().await?.wait().await?;
        log::info!("✅ Balance withdrawn");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_unknown_and_empty() {
        let state = SessionState::default();
        assert_eq!(state.account, None);
        assert_eq!(state.stocks, [None; ITEM_COUNT]);
        assert_eq!(state.drafts, [0; ITEM_COUNT]);
        assert!(state.status.is_empty());
    }

    #[test]
    fn test_failed_connect_keeps_previous_account() {
        let mut state = SessionState {
            account: Some("0xabc".to_string()),
            ..Default::default()
        };
        state.apply_connect(Locale::En, Err(VendingError::NoAccounts));
        assert_eq!(state.account.as_deref(), Some("0xabc"));
        assert_eq!(
            state.status,
            "Wallet connection failed: The wallet has no accounts."
        );
    }

    #[test]
    fn test_failed_refresh_keeps_last_known_values() {
        let mut state = SessionState::default();
        state.apply_all_stocks(Locale::En, Ok([5, 5, 5, 5]));
        state.apply_all_stocks(Locale::En, Err(VendingError::ProviderMissing));
        assert_eq!(state.stocks, [Some(5); ITEM_COUNT]);

        state.apply_stock(Locale::En, 1, Err(VendingError::ProviderMissing));
        assert_eq!(state.stocks[1], Some(5));
        assert!(state.status.starts_with("Stock check failed"));
    }

    #[test]
    fn test_stock_for_unknown_index_only_touches_status() {
        let mut state = SessionState::default();
        state.apply_stock(Locale::En, 9, Ok(3));
        assert_eq!(state.stocks, [None; ITEM_COUNT]);
        assert!(state.status.contains("Unknown item index: 9"));
    }

    #[test]
    fn test_successful_restock_clears_only_that_draft() {
        let mut state = SessionState {
            drafts: [3, 4, 5, 6],
            ..Default::default()
        };
        state.apply_restock(Locale::En, 5, Ok(&CATALOG[2]));
        assert_eq!(state.drafts, [3, 4, 0, 6]);
        assert_eq!(state.status, "Added 5 to Coke stock");

        state.apply_restock(Locale::En, 4, Err(VendingError::ProviderMissing));
        assert_eq!(state.drafts, [3, 4, 0, 6]);
    }
}
