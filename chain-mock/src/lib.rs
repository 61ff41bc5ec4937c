/// Mock Chain Library
///
/// A wallet plus vending machine contract simulator speaking JSON-RPC.
/// Usable as a standalone binary for local development or in-process from
/// integration tests.

pub mod chain;
pub mod handlers;
pub mod server;

// Re-export commonly used types
pub use chain::{ChainError, MockChain, MockChainConfig};
pub use server::{create_router, run_server, serve, SharedChain};
