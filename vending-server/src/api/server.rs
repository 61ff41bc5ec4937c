use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vending_dapp::VendingSession;

use super::handlers;
use crate::error::ApiError;

/// One session per server process, like one open page
pub type SharedSession = Arc<VendingSession>;

pub fn create_router(session: SharedSession, cors: CorsLayer) -> Router {
    Router::new()
        // Session
        .route("/api/session", get(handlers::get_session_handler))
        .route("/api/session/connect", post(handlers::connect_handler))
        // Stock
        .route("/api/stocks/refresh", post(handlers::refresh_stocks_handler))
        .route("/api/items/:index/check", post(handlers::check_stock_handler))
        // Purchase
        .route("/api/items/:index/buy", post(handlers::buy_item_handler))
        // Owner controls
        .route("/api/items/:index/draft", put(handlers::set_draft_handler))
        .route("/api/items/:index/restock", post(handlers::restock_handler))
        .route("/api/withdraw", post(handlers::withdraw_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(session)
}

/// CORS from `ALLOWED_ORIGINS` (comma-separated); any origin when unset
pub fn cors_from_env() -> Result<CorsLayer, ApiError> {
    match std::env::var("ALLOWED_ORIGINS") {
        Ok(origins) if !origins.trim().is_empty() => {
            log::info!("CORS configured for origins: {}", origins);
            let origin_list = origins
                .split(',')
                .map(|s| {
                    s.trim()
                        .parse::<HeaderValue>()
                        .map_err(|_| ApiError::InvalidOrigin(s.trim().to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CorsLayer::new()
                .allow_origin(origin_list)
                .allow_methods(Any)
                .allow_headers(Any))
        }
        _ => {
            log::warn!("CORS: Allowing all origins (development mode). Set ALLOWED_ORIGINS env var for production.");
            Ok(CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any))
        }
    }
}

pub async fn start_server(addr: &str, session: SharedSession) -> anyhow::Result<()> {
    let app = create_router(session, cors_from_env()?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            log::info!("Received SIGTERM signal");
        },
    }

    log::info!("Shutdown signal received, exiting gracefully...");
}
