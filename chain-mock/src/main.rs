/// Mock Chain Server
///
/// Stands in for a browser wallet connected to a local dev chain with the
/// vending machine contract deployed. Point `VENDING_RPC_URL` at it.

use alloy_primitives::Address;
use anyhow::{Context, Result};
use std::env;

use chain_mock::{run_server, MockChain, MockChainConfig};

#[derive(Debug)]
struct Config {
    chain: MockChainConfig,

    // Server
    server_host: String,
    server_port: u16,
}

impl Config {
    fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let mut chain = MockChainConfig::default();

        if let Ok(chain_id) = env::var("MOCK_CHAIN_ID") {
            chain.chain_id = chain_id.parse().context("Invalid MOCK_CHAIN_ID")?;
        }

        if let Ok(owner) = env::var("MOCK_OWNER") {
            chain.owner = owner.parse().context("Invalid MOCK_OWNER")?;
        }

        // Comma-separated, first entry is the active account
        chain.accounts = match env::var("MOCK_ACCOUNTS") {
            Ok(accounts) if !accounts.trim().is_empty() => accounts
                .split(',')
                .map(|s| s.trim().parse::<Address>())
                .collect::<Result<_, _>>()
                .context("Invalid MOCK_ACCOUNTS")?,
            _ => vec![chain.owner],
        };

        if let Ok(stock) = env::var("MOCK_INITIAL_STOCK") {
            chain.initial_stock = stock.parse().context("Invalid MOCK_INITIAL_STOCK")?;
        }

        let server_host = env::var("MOCK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("MOCK_PORT")
            .unwrap_or_else(|_| "8545".to_string())
            .parse()
            .context("Invalid MOCK_PORT")?;

        Ok(Self {
            chain,
            server_host,
            server_port,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Mock Chain Server...");

    let config = Config::from_env().context("Failed to load configuration")?;

    log::info!("Chain id: {}", config.chain.chain_id);
    log::info!("Contract: {}", config.chain.contract_address);
    log::info!("Owner: {}", config.chain.owner);
    log::info!("Accounts: {:?}", config.chain.accounts);

    run_server(
        MockChain::new(config.chain),
        config.server_host,
        config.server_port,
    )
    .await
    .context("Server error")?;

    Ok(())
}
