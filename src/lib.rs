//! Vending dApp: wallet, network and contract interaction for an on-chain
//! vending machine
//!
//! This crate is the client side of a vending machine contract. The
//! contract owns every business rule; this side connects a wallet, checks
//! the network, submits purchase/restock/withdraw transactions and keeps the
//! displayed state in sync with the chain.
//!
//! # Architecture
//!
//! - **Wallet Gateway** ([`WalletGateway`]): provider detection and the
//!   account-access handshake
//! - **Network Guard** ([`network`]): chain id check before writes
//! - **Contract Proxy** ([`ContractHandle`]): ABI-encoded calls to the
//!   contract, read-only or signed
//! - **Vending Session** ([`VendingSession`]): the UI state controller
//!
//! # Example
//!
//! ```ignore
//! use vending_dapp::{VendingConfig, VendingSession};
//!
//! let session = VendingSession::from_config(VendingConfig::from_env());
//! session.start().await;
//! session.connect().await;
//! session.buy_item(2).await;
//!
//! println!("{}", session.view().await.status);
//! ```

// Public modules
pub mod catalog;
pub mod config;
pub mod contract;
pub mod error;
pub mod messages;
pub mod network;
pub mod rpc;
pub mod session;
pub mod wallet;

// Re-exports for convenience
pub use catalog::{Item, CATALOG, ITEM_COUNT};
pub use config::VendingConfig;
pub use contract::{ContractHandle, PendingTransaction, TransactionReceipt, TransactionRequest};
pub use error::VendingError;
pub use messages::Locale;
pub use rpc::{HttpProvider, WalletProvider};
pub use session::{SessionState, SessionView, VendingSession};
pub use wallet::WalletGateway;

// Common result type
pub type Result<T> = std::result::Result<T, VendingError>;
