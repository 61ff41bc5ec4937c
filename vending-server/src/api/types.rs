use serde::{Deserialize, Serialize};

/// Body of `PUT /api/items/:index/draft`
#[derive(Debug, Deserialize, Serialize)]
pub struct DraftRequest {
    pub amount: u64,
}

/// Body of `POST /api/items/:index/restock`
///
/// Without an amount the item's draft is used.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RestockRequest {
    pub amount: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
