/// Axum handlers for the JSON-RPC endpoint and the mock helpers
use alloy_primitives::{Address, B256, U64};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use vending_dapp::rpc::{RpcRequest, RpcResponse};
use vending_dapp::TransactionRequest;

use crate::chain::ChainError;
use crate::server::SharedChain;

/// POST /
/// Single JSON-RPC request in, single response out
pub async fn rpc(State(chain): State<SharedChain>, Json(req): Json<RpcRequest>) -> Json<RpcResponse> {
    log::debug!("→ {} {}", req.method, req.params);

    let response = match dispatch(&chain, &req.method, &req.params).await {
        Ok(result) => RpcResponse::success(req.id, result),
        Err(e) => {
            log::debug!("✗ {} failed: {}", req.method, e);
            RpcResponse::failure(req.id, e.code(), e.to_string())
        }
    };

    Json(response)
}

async fn dispatch(chain: &SharedChain, method: &str, params: &Value) -> Result<Value, ChainError> {
    match method {
        "eth_requestAccounts" => {
            let accounts = chain.lock().await.request_accounts()?;
            Ok(json!(accounts))
        }
        "eth_accounts" => Ok(json!(chain.lock().await.accounts())),
        "eth_chainId" => Ok(json!(U64::from(chain.lock().await.chain_id()))),
        "eth_blockNumber" => Ok(json!(U64::from(chain.lock().await.block_number()))),
        "eth_getBalance" => {
            let account: Address = param(params, 0)?;
            Ok(json!(chain.lock().await.balance(&account)))
        }
        "eth_call" => {
            let tx: TransactionRequest = param(params, 0)?;
            Ok(json!(chain.lock().await.call(&tx)?))
        }
        "eth_sendTransaction" => {
            let tx: TransactionRequest = param(params, 0)?;
            Ok(json!(chain.lock().await.send_transaction(&tx)?))
        }
        "eth_getTransactionReceipt" => {
            let hash: B256 = param(params, 0)?;
            Ok(json!(chain.lock().await.receipt(&hash)))
        }
        other => Err(ChainError::MethodNotFound(other.to_string())),
    }
}

fn param<T: for<'de> Deserialize<'de>>(params: &Value, position: usize) -> Result<T, ChainError> {
    let raw = params
        .get(position)
        .cloned()
        .ok_or_else(|| ChainError::InvalidParams(format!("missing param {}", position)))?;
    serde_json::from_value(raw).map_err(|e| ChainError::InvalidParams(e.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct ChainIdRequest {
    pub chain_id: u64,
}

/// POST /mock/chain-id
/// Switch the wallet's active chain
pub async fn set_chain_id(
    State(chain): State<SharedChain>,
    Json(req): Json<ChainIdRequest>,
) -> StatusCode {
    chain.lock().await.set_chain_id(req.chain_id);
    StatusCode::NO_CONTENT
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
