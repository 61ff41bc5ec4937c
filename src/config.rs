/// Vending machine deployment configuration
///
/// The defaults are the deployment constants of the contract the front-end
/// was built against (a local development chain). Every value can be
/// overridden from the environment or a `.env` file.
use std::env;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{address, Address, U256};

use crate::messages::Locale;

/// Deployed contract address
pub const CONTRACT_ADDRESS: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

/// Chain the contract lives on
pub const CHAIN_ID: u64 = 31337;

/// Account allowed to restock and withdraw (enforced by the contract)
pub const OWNER_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Price of one item: 0.0001 native unit in wei
pub const ITEM_PRICE_WEI: u64 = 100_000_000_000_000;

#[derive(Clone, Debug)]
pub struct VendingConfig {
    /// Wallet provider endpoint; `None` means no injected provider
    pub rpc_url: Option<String>,
    /// Vending machine contract address
    pub contract_address: Address,
    /// Chain id the wallet must be on before writes
    pub chain_id: u64,
    /// Owner address, used only to decide which controls to show
    pub owner_address: String,
    /// Value sent with every purchase
    pub item_price: U256,
    /// Language of status messages
    pub locale: Locale,
    /// Delay between receipt polls while awaiting confirmation
    pub confirmation_poll_interval: Duration,
    /// Receipt polls before a transaction counts as unconfirmed
    pub confirmation_attempts: u32,
}

impl VendingConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `VENDING_RPC_URL`: wallet JSON-RPC endpoint (unset: no provider)
    /// - `VENDING_CHAIN_ID`: expected chain id (default 31337)
    /// - `VENDING_CONTRACT_ADDRESS`: contract address
    /// - `VENDING_OWNER_ADDRESS`: owner address for the admin controls
    /// - `VENDING_LOCALE`: "ko" (default) or "en"
    /// - `VENDING_CONFIRMATION_POLL_MS`: receipt poll interval (default 1000)
    /// - `VENDING_CONFIRMATION_ATTEMPTS`: receipt polls (default 120)
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Against the bundled mock chain
    /// VENDING_RPC_URL=http://localhost:8545 cargo run -p vending-server
    /// ```
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = Self::default();

        let rpc_url = env::var("VENDING_RPC_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        match rpc_url {
            Some(ref url) => log::info!("🔗 Wallet provider: {}", url),
            None => log::warn!("⚠️  VENDING_RPC_URL not set, running without a wallet provider"),
        }

        let chain_id = parse_var("VENDING_CHAIN_ID", defaults.chain_id);
        let contract_address = parse_var("VENDING_CONTRACT_ADDRESS", defaults.contract_address);
        let owner_address =
            env::var("VENDING_OWNER_ADDRESS").unwrap_or_else(|_| defaults.owner_address.clone());
        let locale = parse_var("VENDING_LOCALE", defaults.locale);
        let poll_ms = parse_var(
            "VENDING_CONFIRMATION_POLL_MS",
            defaults.confirmation_poll_interval.as_millis() as u64,
        );
        let confirmation_attempts =
            parse_var("VENDING_CONFIRMATION_ATTEMPTS", defaults.confirmation_attempts);

        log::info!("📜 Contract {} on chain {}", contract_address, chain_id);

        Self {
            rpc_url,
            contract_address,
            chain_id,
            owner_address,
            locale,
            confirmation_poll_interval: Duration::from_millis(poll_ms),
            confirmation_attempts,
            ..defaults
        }
    }

    /// Whether `account` is the configured owner
    ///
    /// Case-insensitive, since wallets may return lowercase or checksummed
    /// addresses. This only drives what the UI shows.
    pub fn is_owner(&self, account: &str) -> bool {
        account.eq_ignore_ascii_case(&self.owner_address)
    }
}

impl Default for VendingConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            contract_address: CONTRACT_ADDRESS,
            chain_id: CHAIN_ID,
            owner_address: OWNER_ADDRESS.to_string(),
            item_price: U256::from(ITEM_PRICE_WEI),
            locale: Locale::default(),
            confirmation_poll_interval: Duration::from_millis(1000),
            confirmation_attempts: 120,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("⚠️  Invalid {} '{}', using default", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}
