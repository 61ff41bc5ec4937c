/// HTTP front-end for the vending machine session
///
/// Exposes the `VendingSession` actions and its view as a small JSON API, so
/// any browser UI can render the machine and forward button presses.

pub mod api;
pub mod error;

pub use api::server::{create_router, start_server, SharedSession};
pub use error::ApiError;
