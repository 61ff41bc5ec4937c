/// Simulated wallet and vending machine contract
///
/// Holds everything a wallet extension plus a dev chain would: the user's
/// accounts and balances, the active chain id, mined receipts, and the
/// storage of a single vending machine contract. Transactions are mined as
/// soon as they are sent.
use std::collections::HashMap;

use alloy_primitives::{keccak256, Address, Bytes, B256, U256, U64};
use alloy_sol_types::{SolCall, SolInterface};
use thiserror::Error;
use vending_dapp::config::{CHAIN_ID, CONTRACT_ADDRESS, ITEM_PRICE_WEI, OWNER_ADDRESS};
use vending_dapp::contract::VendingMachine::{self, VendingMachineCalls};
use vending_dapp::{TransactionReceipt, TransactionRequest, CATALOG, ITEM_COUNT};

/// Wei in one native unit
const ONE_UNIT_WEI: u64 = 1_000_000_000_000_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("User rejected the request.")]
    UserRejected,

    #[error("The requested account has not been authorized by the user.")]
    Unauthorized,

    #[error("execution reverted: {0}")]
    Reverted(String),

    #[error("insufficient funds for gas * price + value: have {have} want {want}")]
    InsufficientFunds { have: U256, want: U256 },

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("the method {0} does not exist/is not available")]
    MethodNotFound(String),
}

impl ChainError {
    /// JSON-RPC error code, following EIP-1193 and common node conventions
    pub fn code(&self) -> i64 {
        match self {
            Self::UserRejected => 4001,
            Self::Unauthorized => 4100,
            Self::Reverted(_) => 3,
            Self::InsufficientFunds { .. } => -32000,
            Self::InvalidParams(_) => -32602,
            Self::MethodNotFound(_) => -32601,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockChainConfig {
    pub chain_id: u64,
    pub contract_address: Address,
    pub owner: Address,
    /// Wallet accounts, first one is the active account
    pub accounts: Vec<Address>,
    pub initial_stock: u64,
    pub account_balance: U256,
    pub item_price: U256,
    /// Answer every wallet prompt with a rejection
    pub reject_prompts: bool,
}

impl Default for MockChainConfig {
    fn default() -> Self {
        let owner = OWNER_ADDRESS.parse().unwrap_or(Address::ZERO);
        Self {
            chain_id: CHAIN_ID,
            contract_address: CONTRACT_ADDRESS,
            owner,
            accounts: vec![owner],
            initial_stock: 5,
            account_balance: U256::from(ONE_UNIT_WEI) * U256::from(10u64),
            item_price: U256::from(ITEM_PRICE_WEI),
            reject_prompts: false,
        }
    }
}

pub struct MockChain {
    config: MockChainConfig,
    /// Granted through `eth_requestAccounts`
    authorized: bool,
    balances: HashMap<Address, U256>,
    stocks: [u64; ITEM_COUNT],
    contract_balance: U256,
    receipts: HashMap<B256, TransactionReceipt>,
    block_number: u64,
}

impl MockChain {
    pub fn new(config: MockChainConfig) -> Self {
        let balances = config
            .accounts
            .iter()
            .chain(std::iter::once(&config.owner))
            .map(|account| (*account, config.account_balance))
            .collect();

        Self {
            stocks: [config.initial_stock; ITEM_COUNT],
            config,
            authorized: false,
            balances,
            contract_balance: U256::ZERO,
            receipts: HashMap::new(),
            block_number: 0,
        }
    }

    // ============================================================================
    // Wallet side
    // ============================================================================

    pub fn request_accounts(&mut self) -> Result<Vec<Address>, ChainError> {
        if self.config.reject_prompts {
            return Err(ChainError::UserRejected);
        }
        self.authorized = true;
        Ok(self.config.accounts.clone())
    }

    /// Accounts visible without prompting
    pub fn accounts(&self) -> Vec<Address> {
        if self.authorized {
            self.config.accounts.clone()
        } else {
            Vec::new()
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Switch the active chain, as a user would in the wallet UI
    pub fn set_chain_id(&mut self, chain_id: u64) {
        log::info!("🔀 Wallet switched to chain {}", chain_id);
        self.config.chain_id = chain_id;
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn balance(&self, account: &Address) -> U256 {
        if *account == self.config.contract_address {
            return self.contract_balance;
        }
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn stocks(&self) -> [u64; ITEM_COUNT] {
        self.stocks
    }

    // ============================================================================
    // Contract side
    // ============================================================================

    /// Execute a view call against the contract
    pub fn call(&self, tx: &TransactionRequest) -> Result<Bytes, ChainError> {
        if tx.to != self.config.contract_address {
            // No code at that address
            return Ok(Bytes::new());
        }

        match decode(&tx.data)? {
            VendingMachineCalls::checkStock(call) => {
                let index = self.item_index(call.index)?;
                let output = VendingMachine::checkStockCall::abi_encode_returns(&(
                    CATALOG[index].name.to_string(),
                    U256::from(self.stocks[index]),
                ));
                Ok(output.into())
            }
            _ => Err(ChainError::Reverted(
                "state-changing call used as view".to_string(),
            )),
        }
    }

    /// Execute and mine a transaction, returning its hash
    pub fn send_transaction(&mut self, tx: &TransactionRequest) -> Result<B256, ChainError> {
        if self.config.reject_prompts {
            return Err(ChainError::UserRejected);
        }

        let from = tx
            .from
            .ok_or_else(|| ChainError::InvalidParams("missing from".to_string()))?;
        if !self.authorized || !self.config.accounts.contains(&from) {
            return Err(ChainError::Unauthorized);
        }
        if tx.to != self.config.contract_address {
            return Err(ChainError::InvalidParams(format!("unknown contract {}", tx.to)));
        }

        let value = tx.value.unwrap_or_default();
        let have = self.balance(&from);
        if have < value {
            return Err(ChainError::InsufficientFunds { have, want: value });
        }

        self.execute(from, value, &tx.data)?;

        self.block_number += 1;
        let hash = self.transaction_hash(from, tx);
        self.receipts.insert(
            hash,
            TransactionReceipt {
                transaction_hash: hash,
                block_number: Some(U64::from(self.block_number)),
                status: Some(U64::from(1u64)),
            },
        );

        log::info!("⛏️  Mined tx {} in block {}", hash, self.block_number);
        Ok(hash)
    }

    pub fn receipt(&self, hash: &B256) -> Option<TransactionReceipt> {
        self.receipts.get(hash).cloned()
    }

    fn execute(&mut self, from: Address, value: U256, data: &[u8]) -> Result<(), ChainError> {
        match decode(data)? {
            VendingMachineCalls::buyItem(call) => {
                let index = self.item_index(call.index)?;
                if value != self.config.item_price {
                    return Err(ChainError::Reverted("Incorrect payment".to_string()));
                }
                if self.stocks[index] == 0 {
                    return Err(ChainError::Reverted("Out of stock".to_string()));
                }
                self.stocks[index] -= 1;
                self.move_funds(from, value);
                log::info!("🥤 {} bought {}", from, CATALOG[index].name);
            }
            VendingMachineCalls::addStock(call) => {
                self.only_owner(from)?;
                let index = self.item_index(call.index)?;
                if call.amount > U256::from(u64::MAX) {
                    return Err(ChainError::Reverted("Amount too large".to_string()));
                }
                let amount = call.amount.to::<u64>();
                self.stocks[index] = self.stocks[index]
                    .checked_add(amount)
                    .ok_or_else(|| ChainError::Reverted("Stock overflow".to_string()))?;
            }
            VendingMachineCalls::withdrawBalance(_) => {
                self.only_owner(from)?;
                let amount = std::mem::take(&mut self.contract_balance);
                *self.balances.entry(self.config.owner).or_default() += amount;
                log::info!("💰 Withdrew {} wei to owner", amount);
            }
            VendingMachineCalls::checkStock(call) => {
                // Views can be sent as transactions; they just cost gas
                self.item_index(call.index)?;
            }
        }
        Ok(())
    }

    fn move_funds(&mut self, from: Address, value: U256) {
        if let Some(balance) = self.balances.get_mut(&from) {
            *balance -= value;
        }
        self.contract_balance += value;
    }

    fn only_owner(&self, from: Address) -> Result<(), ChainError> {
        if from != self.config.owner {
            return Err(ChainError::Reverted("Only owner".to_string()));
        }
        Ok(())
    }

    fn item_index(&self, index: U256) -> Result<usize, ChainError> {
        if index >= U256::from(ITEM_COUNT) {
            return Err(ChainError::Reverted("Invalid item".to_string()));
        }
        Ok(index.to::<usize>())
    }

    fn transaction_hash(&self, from: Address, tx: &TransactionRequest) -> B256 {
        let mut preimage = Vec::with_capacity(20 + 8 + tx.data.len());
        preimage.extend_from_slice(from.as_slice());
        preimage.extend_from_slice(&self.block_number.to_be_bytes());
        preimage.extend_from_slice(&tx.data);
        keccak256(preimage)
    }
}

fn decode(data: &[u8]) -> Result<VendingMachineCalls, ChainError> {
    VendingMachineCalls::abi_decode(data, true)
        .map_err(|e| ChainError::Reverted(format!("unrecognized call: {}", e)))
}
