//! Order tracking for the current session.

use axum::{
    Json,
    extract::{Path, State},
};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::session;
use crate::orders::OrderReceipt;
use crate::state::AppState;

/// List receipts placed in this session, newest first.
///
/// Expired receipts are skipped.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Json<Vec<OrderReceipt>> {
    let mut receipts = Vec::new();
    for order_id in session::order_ids(&session).await.iter().rev() {
        if let Some(receipt) = state.orders().get(order_id).await {
            receipts.push(receipt.as_ref().clone());
        }
    }
    Json(receipts)
}

/// Show one receipt. Orders from other sessions are reported as not found.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(order_id): Path<String>,
) -> Result<Json<OrderReceipt>> {
    let not_found = || AppError::NotFound(format!("order {order_id}"));

    let id = Uuid::parse_str(&order_id).map_err(|_| not_found())?;
    if !session::order_ids(&session).await.contains(&id) {
        return Err(not_found());
    }

    let receipt = state.orders().get(&id).await.ok_or_else(not_found)?;
    Ok(Json(receipt.as_ref().clone()))
}
