use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use vending_dapp::SessionView;

use super::server::SharedSession;
use super::types::{DraftRequest, HealthResponse, RestockRequest};
use crate::error::ApiError;

pub async fn get_session_handler(State(session): State<SharedSession>) -> Json<SessionView> {
    Json(session.view().await)
}

pub async fn connect_handler(State(session): State<SharedSession>) -> Json<SessionView> {
    session.connect().await;
    Json(session.view().await)
}

pub async fn refresh_stocks_handler(State(session): State<SharedSession>) -> Json<SessionView> {
    session.check_all_stocks().await;
    Json(session.view().await)
}

pub async fn buy_item_handler(
    State(session): State<SharedSession>,
    Path(index): Path<usize>,
) -> Json<SessionView> {
    session.buy_item(index).await;
    Json(session.view().await)
}

pub async fn check_stock_handler(
    State(session): State<SharedSession>,
    Path(index): Path<usize>,
) -> Json<SessionView> {
    session.check_stock(index).await;
    Json(session.view().await)
}

pub async fn set_draft_handler(
    State(session): State<SharedSession>,
    Path(index): Path<usize>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<SessionView>, ApiError> {
    session
        .set_stock_draft(index, req.amount)
        .await
        .map_err(|_| ApiError::UnknownItem(index))?;
    Ok(Json(session.view().await))
}

/// Restock with the body amount, or the item's draft when none is given
///
/// A request without a JSON body uses the draft. A JSON body that does not
/// parse is rejected before anything is sent to the chain.
pub async fn restock_handler(
    State(session): State<SharedSession>,
    Path(index): Path<usize>,
    body: Result<Json<RestockRequest>, JsonRejection>,
) -> Result<Json<SessionView>, ApiError> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(JsonRejection::MissingJsonContentType(_)) => RestockRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };

    match req.amount {
        Some(amount) => session.add_stock(index, amount).await,
        None => session.add_stock_from_draft(index).await,
    }
    Ok(Json(session.view().await))
}

pub async fn withdraw_handler(State(session): State<SharedSession>) -> Json<SessionView> {
    session.withdraw_balance().await;
    Json(session.view().await)
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
