//! Checkout route handlers.
//!
//! Quotes are derived from the cart summary and the store's pricing rules and
//! never change the cart. Placing an order snapshots the cart into a receipt
//! and then clears it. There is no payment step.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cartwheel_core::{CheckoutQuote, CouponCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionCart;
use crate::models::session;
use crate::state::AppState;

/// Optional coupon, from the query string or request body.
#[derive(Debug, Default, Deserialize)]
pub struct CouponForm {
    pub coupon: Option<String>,
}

impl CouponForm {
    /// Parse the coupon, treating a blank value as no coupon.
    fn code(&self) -> Result<Option<CouponCode>> {
        match self.coupon.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Ok(Some(CouponCode::parse(raw)?)),
        }
    }
}

/// Price the current cart.
#[instrument(skip(state, cart))]
pub async fn quote(
    State(state): State<AppState>,
    SessionCart(cart): SessionCart,
    Query(form): Query<CouponForm>,
) -> Result<Json<CheckoutQuote>> {
    let coupon = form.code()?;
    let quote = state.pricing().quote(&cart.summary(), coupon.as_ref())?;
    Ok(Json(quote))
}

/// Place an order for the current cart.
///
/// Responds 201 with the receipt; 400 if the cart is empty or the coupon is
/// unknown. The cart is only cleared once the receipt exists.
#[instrument(skip(state, session, cart))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    SessionCart(mut cart): SessionCart,
    form: Option<Json<CouponForm>>,
) -> Result<Response> {
    let form = form.map(|Json(form)| form).unwrap_or_default();
    if cart.cart().is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let coupon = form.code()?;
    let quote = state.pricing().quote(&cart.summary(), coupon.as_ref())?;

    // Session first: a receipt is only stored once its owner can find it.
    let order_id = Uuid::new_v4();
    session::push_order_id(&session, order_id).await?;
    let receipt = state
        .orders()
        .place(order_id, cart.items().to_vec(), quote)
        .await;
    cart.clear().await;

    let order_label = order_id.to_string();
    add_breadcrumb("checkout", "Placed order", Some(&[("order_id", order_label.as_str())]));

    Ok((StatusCode::CREATED, Json(receipt.as_ref().clone())).into_response())
}
