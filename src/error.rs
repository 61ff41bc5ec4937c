//! Error types for vending machine interactions
//!
//! Covers the wallet handshake, network validation, JSON-RPC transport and
//! contract execution failures raised while talking to the chain.

use thiserror::Error;

/// JSON-RPC error code wallets use when the user dismisses a prompt (EIP-1193)
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC error code nodes use for reverted execution
pub const EXECUTION_REVERTED_CODE: i64 = 3;

/// Core error type for wallet, network and contract operations
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum VendingError {
    /// No injected wallet provider, or the provider cannot take requests
    #[error("Wallet provider not found")]
    ProviderMissing,

    /// The wallet granted access but exposed no account
    #[error("Wallet returned no accounts")]
    NoAccounts,

    /// The wallet is pointed at a different chain
    #[error("Wrong network: expected chain {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// The user declined the wallet prompt
    #[error("User rejected the request: {0}")]
    UserRejectedRequest(String),

    /// Contract execution reverted
    #[error("Contract reverted: {0}")]
    ContractRevert(String),

    /// The signer cannot cover value plus gas
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Local validation failed before any call was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Item index outside the catalog
    #[error("Invalid input: Unknown item index: {0}")]
    UnknownItem(usize),

    /// A write was attempted on a handle bound to the read-only provider
    #[error("A signer is required for this call")]
    SignerRequired,

    /// The transaction was not mined within the confirmation window
    #[error("Transaction {0} was not confirmed in time")]
    ConfirmationTimeout(String),

    /// Any other JSON-RPC error, passed through unmodified
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The transport to the provider failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with something we could not decode
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl VendingError {
    /// Classify a JSON-RPC error object returned by a wallet or node
    ///
    /// The wallet message is kept verbatim; only the variant is chosen.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();

        if code == USER_REJECTED_CODE {
            Self::UserRejectedRequest(message)
        } else if lowered.contains("insufficient funds") {
            Self::InsufficientFunds(message)
        } else if code == EXECUTION_REVERTED_CODE || lowered.contains("revert") {
            Self::ContractRevert(message)
        } else {
            Self::Rpc { code, message }
        }
    }

    /// Message of the underlying failure, without the variant prefix
    ///
    /// Chain-originated errors carry the node's text as-is. Local variants
    /// return `None` and are rendered by the message catalog instead.
    pub fn chain_message(&self) -> Option<&str> {
        match self {
            Self::UserRejectedRequest(msg)
            | Self::ContractRevert(msg)
            | Self::InsufficientFunds(msg)
            | Self::Rpc { message: msg, .. } => Some(msg),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for VendingError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for VendingError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

impl From<alloy_sol_types::Error> for VendingError {
    fn from(err: alloy_sol_types::Error) -> Self {
        Self::InvalidResponse(format!("ABI decode failed: {}", err))
    }
}
