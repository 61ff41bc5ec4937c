use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors the HTTP layer reports itself
///
/// Action failures are not here: they become the session status line and
/// are returned with the view.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unknown item index: {0}")]
    UnknownItem(usize),

    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("Invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::UnknownItem(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::InvalidOrigin(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ApiError::InvalidBody(ref rejection) => (rejection.status(), self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
