//! Shared test utilities
//!
//! `ScriptedWallet` is an in-memory wallet provider that also plays the
//! vending machine contract, so session behaviour can be tested without a
//! node. Every request is recorded for call-order assertions.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{keccak256, Bytes, U256};
use alloy_sol_types::{SolCall, SolInterface};
use async_trait::async_trait;
use serde_json::{json, Value};
use vending_dapp::contract::VendingMachine::{self, VendingMachineCalls};
use vending_dapp::{
    Locale, TransactionRequest, VendingConfig, VendingError, VendingSession, WalletGateway,
    WalletProvider, CATALOG, ITEM_COUNT,
};

pub const OWNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const BUYER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

/// What the scripted wallet and contract answer with
#[derive(Debug, Clone)]
pub struct WalletScript {
    pub accounts: Vec<String>,
    pub chain_id: u64,
    pub stocks: [u64; ITEM_COUNT],
    /// Item indexes whose `checkStock` call fails
    pub failing_reads: Vec<usize>,
    /// Answer account prompts with a 4001 rejection
    pub reject_prompts: bool,
    /// Revert every transaction with this message
    pub revert_writes: Option<String>,
    /// `null` receipts returned before a transaction shows up as mined
    pub pending_receipts: u32,
    /// Mine every transaction with a failed (`status: 0x0`) receipt
    pub revert_receipts: bool,
    /// Set once the user granted access through `eth_requestAccounts`
    pub authorized: bool,
    pub supports_requests: bool,
}

impl Default for WalletScript {
    fn default() -> Self {
        Self {
            accounts: vec![BUYER.to_string()],
            chain_id: 31337,
            stocks: [5; ITEM_COUNT],
            failing_reads: Vec::new(),
            reject_prompts: false,
            revert_writes: None,
            pending_receipts: 0,
            revert_receipts: false,
            authorized: false,
            supports_requests: true,
        }
    }
}

pub struct ScriptedWallet {
    script: Mutex<WalletScript>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedWallet {
    pub fn new(script: WalletScript) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Change the script mid-test (e.g. stock moved on-chain)
    pub fn update(&self, f: impl FnOnce(&mut WalletScript)) {
        f(&mut self.script.lock().unwrap());
    }

    pub fn stocks(&self) -> [u64; ITEM_COUNT] {
        self.script.lock().unwrap().stocks
    }

    /// Methods requested so far, in order
    pub fn methods(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.methods().iter().filter(|m| *m == method).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn handle(&self, method: &str, params: &Value) -> Result<Value, VendingError> {
        let mut script = self.script.lock().unwrap();

        match method {
            "eth_requestAccounts" => {
                if script.reject_prompts {
                    return Err(VendingError::from_rpc(4001, "User rejected the request."));
                }
                script.authorized = true;
                Ok(json!(script.accounts))
            }
            "eth_accounts" => {
                if script.authorized {
                    Ok(json!(script.accounts))
                } else {
                    Ok(json!([]))
                }
            }
            "eth_chainId" => Ok(json!(format!("0x{:x}", script.chain_id))),
            "eth_call" => {
                let tx: TransactionRequest = serde_json::from_value(params[0].clone())?;
                let call = VendingMachine::checkStockCall::abi_decode(&tx.data, true)?;
                let index = call.index.to::<usize>();
                if script.failing_reads.contains(&index) {
                    return Err(VendingError::from_rpc(-32000, "header not found"));
                }
                let output = VendingMachine::checkStockCall::abi_encode_returns(&(
                    CATALOG[index].name.to_string(),
                    U256::from(script.stocks[index]),
                ));
                Ok(json!(Bytes::from(output)))
            }
            "eth_sendTransaction" => {
                if let Some(reason) = &script.revert_writes {
                    return Err(VendingError::from_rpc(3, reason.clone()));
                }
                let tx: TransactionRequest = serde_json::from_value(params[0].clone())?;
                let call = VendingMachineCalls::abi_decode(&tx.data, true)?;
                // A reverted execution leaves contract storage untouched
                if !script.revert_receipts {
                    match call {
                        VendingMachineCalls::buyItem(call) => {
                            script.stocks[call.index.to::<usize>()] -= 1;
                        }
                        VendingMachineCalls::addStock(call) => {
                            script.stocks[call.index.to::<usize>()] += call.amount.to::<u64>();
                        }
                        VendingMachineCalls::withdrawBalance(_) => {}
                        VendingMachineCalls::checkStock(_) => {}
                    }
                }
                let nonce = self.calls.lock().unwrap().len() as u64;
                Ok(json!(keccak256(nonce.to_be_bytes())))
            }
            "eth_getTransactionReceipt" => {
                if script.pending_receipts > 0 {
                    script.pending_receipts -= 1;
                    return Ok(Value::Null);
                }
                let status = if script.revert_receipts { "0x0" } else { "0x1" };
                Ok(json!({
                    "transactionHash": params[0],
                    "blockNumber": "0x1",
                    "status": status
                }))
            }
            other => Err(VendingError::from_rpc(
                -32601,
                format!("method {} not found", other),
            )),
        }
    }
}

#[async_trait]
impl WalletProvider for ScriptedWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, VendingError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params.clone()));
        self.handle(method, &params)
    }

    fn supports_requests(&self) -> bool {
        self.script.lock().unwrap().supports_requests
    }
}

/// Config with English messages and fast confirmation polling
pub fn test_config() -> VendingConfig {
    VendingConfig {
        locale: Locale::En,
        confirmation_poll_interval: Duration::from_millis(1),
        confirmation_attempts: 5,
        ..Default::default()
    }
}

pub fn gateway(wallet: &Arc<ScriptedWallet>) -> WalletGateway {
    WalletGateway::new(Some(wallet.clone() as Arc<dyn WalletProvider>))
}

/// Session backed by a scripted wallet
pub fn scripted_session(script: WalletScript) -> (Arc<ScriptedWallet>, VendingSession) {
    let _ = env_logger::builder().is_test(true).try_init();

    let wallet = ScriptedWallet::new(script);
    let session = VendingSession::new(test_config(), gateway(&wallet));
    (wallet, session)
}
