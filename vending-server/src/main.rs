use std::env;
use std::sync::Arc;

use anyhow::Context;
use vending_dapp::{VendingConfig, VendingSession};
use vending_server::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger (set RUST_LOG=debug to see wallet RPC traffic)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = VendingConfig::from_env();

    // Use BIND_ADDRESS=0.0.0.0:3000 to expose the API beyond localhost
    let addr = env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let session = Arc::new(VendingSession::from_config(config));
    session.start().await;

    log::info!("Starting vending machine server on {}", addr);
    start_server(&addr, session).await.context("Server error")?;
    Ok(())
}
