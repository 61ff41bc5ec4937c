/// Axum HTTP server setup and routing
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chain::MockChain;
use crate::handlers::*;

/// Shared application state
pub type SharedChain = Arc<Mutex<MockChain>>;

pub fn create_router(chain: SharedChain) -> Router {
    // Browser front-ends call the wallet endpoint directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // JSON-RPC
        .route("/", post(rpc))
        // Health check
        .route("/health", get(health_check))
        // Wallet simulation helpers
        .route("/mock/chain-id", post(set_chain_id))
        // Shared state
        .with_state(chain)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve on an already-bound listener (tests bind to port 0)
pub async fn serve(listener: TcpListener, chain: SharedChain) -> anyhow::Result<()> {
    axum::serve(listener, create_router(chain)).await?;
    Ok(())
}

pub async fn run_server(chain: MockChain, host: String, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    log::info!("🚀 Mock chain listening on http://{}", addr);
    log::info!("🔀 Switch networks with: POST /mock/chain-id");

    serve(listener, Arc::new(Mutex::new(chain))).await
}
