//! Wallet provider transport
//!
//! A wallet provider is anything that accepts EIP-1193 style requests:
//! a method name plus JSON params, answered with JSON or a JSON-RPC error.
//! [`HttpProvider`] speaks JSON-RPC 2.0 over HTTP to a wallet endpoint.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::VendingError;

/// EIP-1193 style request channel
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Send one request and return its `result`
    async fn request(&self, method: &str, params: Value) -> Result<Value, VendingError>;

    /// Whether the provider can take requests at all
    ///
    /// Injected objects that only expose legacy `send`/`enable` entry points
    /// answer `false` here.
    fn supports_requests(&self) -> bool {
        true
    }
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(RpcErrorObject {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Unwrap into the result, classifying any error object
    pub fn into_result(self) -> Result<Value, VendingError> {
        match (self.result, self.error) {
            (_, Some(err)) => Err(VendingError::from_rpc(err.code, err.message)),
            (Some(result), None) => Ok(result),
            // A null result is serialized without the field
            (None, None) => Ok(Value::Null),
        }
    }
}

/// JSON-RPC over HTTP
pub struct HttpProvider {
    url: String,
    /// reqwest::Client is internally Arc-based
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl WalletProvider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, VendingError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Value::from(id),
            method: method.to_string(),
            params,
        };

        log::debug!("→ {} #{} {}", method, id, body.params);

        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        let payload = response.bytes().await?;

        // Nodes may wrap a JSON-RPC error in a 4xx/5xx answer; keep its message
        let response = match serde_json::from_slice::<RpcResponse>(&payload) {
            Ok(response) if status.is_success() || response.error.is_some() => response,
            Err(e) if status.is_success() => return Err(e.into()),
            _ => {
                return Err(VendingError::Transport(format!(
                    "{} answered HTTP {}",
                    self.url, status
                )))
            }
        };
        let result = response.into_result();

        match &result {
            Ok(value) => log::debug!("← {} #{} {}", method, id, value),
            Err(e) => log::debug!("← {} #{} failed: {}", method, id, e),
        }

        result
    }
}
