//! Localized status messages
//!
//! Every action outcome ends up as a single status line. Failures are
//! prefixed with the failed operation and embed the underlying error text.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Item;
use crate::VendingError;

/// Display language for status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

impl FromStr for Locale {
    type Err = VendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ko" | "ko-kr" | "korean" => Ok(Self::Ko),
            "en" | "en-us" | "english" => Ok(Self::En),
            other => Err(VendingError::InvalidInput(format!(
                "Unsupported locale: {}",
                other
            ))),
        }
    }
}

/// User actions that produce a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Connect,
    Buy,
    AddStock,
    Withdraw,
    CheckStock,
    CheckAllStocks,
}

impl Locale {
    pub fn connected(self) -> String {
        match self {
            Self::Ko => "지갑 연결 완료".to_string(),
            Self::En => "Wallet connected".to_string(),
        }
    }

    pub fn connect_first(self) -> String {
        match self {
            Self::Ko => "먼저 지갑을 연결해 주세요.".to_string(),
            Self::En => "Connect your wallet first.".to_string(),
        }
    }

    pub fn amount_required(self) -> String {
        match self {
            Self::Ko => "1개 이상 입력하세요.".to_string(),
            Self::En => "Enter a quantity of at least 1.".to_string(),
        }
    }

    pub fn purchased(self, item: &Item) -> String {
        match self {
            Self::Ko => format!("{} 구매 완료", item.name),
            Self::En => format!("{} purchased", item.name),
        }
    }

    pub fn stock_added(self, item: &Item, amount: u64) -> String {
        match self {
            Self::Ko => format!("{} 재고 {}개 추가 완료", item.name, amount),
            Self::En => format!("Added {} to {} stock", amount, item.name),
        }
    }

    pub fn withdrawn(self) -> String {
        match self {
            Self::Ko => "잔액 인출 완료".to_string(),
            Self::En => "Balance withdrawn".to_string(),
        }
    }

    /// Failure line: operation prefix plus the error description
    pub fn failed(self, operation: Operation, err: &VendingError) -> String {
        format!("{}: {}", self.operation_failed(operation), self.describe(err))
    }

    fn operation_failed(self, operation: Operation) -> &'static str {
        match (self, operation) {
            (Self::Ko, Operation::Connect) => "지갑 연결 실패",
            (Self::Ko, Operation::Buy) => "구매 실패",
            (Self::Ko, Operation::AddStock) => "재고 추가 실패",
            (Self::Ko, Operation::Withdraw) => "인출 실패",
            (Self::Ko, Operation::CheckStock) => "재고 확인 실패",
            (Self::Ko, Operation::CheckAllStocks) => "전체 재고 확인 실패",
            (Self::En, Operation::Connect) => "Wallet connection failed",
            (Self::En, Operation::Buy) => "Purchase failed",
            (Self::En, Operation::AddStock) => "Restock failed",
            (Self::En, Operation::Withdraw) => "Withdrawal failed",
            (Self::En, Operation::CheckStock) => "Stock check failed",
            (Self::En, Operation::CheckAllStocks) => "Stock refresh failed",
        }
    }

    /// Render an error in this locale
    ///
    /// Chain and wallet messages are embedded verbatim.
    pub fn describe(self, err: &VendingError) -> String {
        if let Some(msg) = err.chain_message() {
            return msg.to_string();
        }

        match (self, err) {
            (Self::Ko, VendingError::ProviderMissing) => {
                "지갑 provider를 찾을 수 없습니다.".to_string()
            }
            (Self::Ko, VendingError::NoAccounts) => "지갑 계정이 없습니다.".to_string(),
            (Self::Ko, VendingError::WrongNetwork { expected, .. }) => {
                format!("올바르지 않은 네트워크입니다. 필요: {}", expected)
            }
            (Self::Ko, VendingError::SignerRequired) => {
                "서명 가능한 계정이 필요합니다.".to_string()
            }
            (Self::Ko, VendingError::ConfirmationTimeout(hash)) => {
                format!("트랜잭션 {} 확인 시간이 초과되었습니다.", hash)
            }
            (Self::Ko, VendingError::UnknownItem(index)) => {
                format!("알 수 없는 상품 번호입니다: {}", index)
            }
            (Self::Ko, VendingError::InvalidInput(msg)) => format!("잘못된 입력입니다: {}", msg),
            (Self::Ko, VendingError::Transport(msg)) => {
                format!("지갑과 통신하지 못했습니다: {}", msg)
            }
            (Self::Ko, VendingError::InvalidResponse(msg)) => {
                format!("지갑 응답을 해석하지 못했습니다: {}", msg)
            }
            (Self::En, VendingError::ProviderMissing) => {
                "Wallet provider not found.".to_string()
            }
            (Self::En, VendingError::NoAccounts) => "The wallet has no accounts.".to_string(),
            (Self::En, VendingError::WrongNetwork { expected, .. }) => {
                format!("Wrong network. Required: {}", expected)
            }
            (_, other) => other.to_string(),
        }
    }
}
