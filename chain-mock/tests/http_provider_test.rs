//! HttpProvider against nodes that answer JSON-RPC errors with HTTP error codes

use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use vending_dapp::rpc::RpcResponse;
use vending_dapp::{HttpProvider, VendingError, WalletProvider};

async fn spawn_node(router: Router) -> anyhow::Result<String> {
    let _ = env_logger::builder().is_test(true).try_init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move { axum::serve(listener, router).await });
    Ok(url)
}

#[tokio::test]
async fn test_error_envelope_in_http_error_keeps_revert_reason() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RpcResponse::failure(
                    json!(1),
                    3,
                    "execution reverted: Out of stock",
                )),
            )
        }),
    );
    let provider = HttpProvider::new(spawn_node(router).await?);

    let result = provider.request("eth_sendTransaction", json!([])).await;

    assert_eq!(
        result,
        Err(VendingError::ContractRevert(
            "execution reverted: Out of stock".to_string()
        ))
    );
    Ok(())
}

#[tokio::test]
async fn test_insufficient_funds_behind_http_400() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(RpcResponse::failure(
                    json!(1),
                    -32000,
                    "insufficient funds for gas * price + value",
                )),
            )
        }),
    );
    let provider = HttpProvider::new(spawn_node(router).await?);

    let result = provider.request("eth_sendTransaction", json!([])).await;

    assert!(matches!(result, Err(VendingError::InsufficientFunds(_))));
    Ok(())
}

#[tokio::test]
async fn test_http_error_without_envelope_is_transport() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
    );
    let provider = HttpProvider::new(spawn_node(router).await?);

    let result = provider.request("eth_chainId", json!([])).await;

    assert!(
        matches!(result, Err(VendingError::Transport(ref msg)) if msg.contains("502")),
        "{:?}",
        result
    );
    Ok(())
}
