//! Cart route handlers.
//!
//! The cart lives in the visitor's session (see [`SessionCart`]). Every
//! mutating handler responds with the full cart view and an
//! `HX-Trigger: cart-updated` header so other widgets (sidebar, badge) can
//! refresh themselves.

use axum::{
    Json,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use cartwheel_core::{Cart, CartSummary, CurrencyCode, LineItem, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionCart;
use crate::state::AppState;

/// Event name sent in the `HX-Trigger` header after a mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub image: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub line_total: Decimal,
    /// Formatted unit price (e.g., "$5.00").
    pub price: String,
    /// Formatted line total.
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub summary: CartSummary,
    /// Formatted subtotal (e.g., "$35.00").
    pub subtotal: String,
    pub item_count: u64,
}

// =============================================================================
// Type Conversions
// =============================================================================

fn format_price(amount: Decimal) -> String {
    Price::new(amount, CurrencyCode::default()).display()
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        let line_total = item.line_total();
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total,
            price: format_price(item.unit_price),
            line_price: format_price(line_total),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let summary = cart.summary();
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            summary,
            subtotal: format_price(summary.price),
            item_count: summary.quantity,
        }
    }
}

/// Wrap a cart view with the `cart-updated` trigger header.
fn updated(cart: &Cart) -> Response {
    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        Json(CartView::from(cart)),
    )
        .into_response()
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Add to cart request. `quantity` defaults to 1; values below 1 count as 1.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<i64>,
}

/// Update quantity request. `quantity <= 0` removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove / decrement request.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub product_id: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(cart))]
pub async fn show(SessionCart(cart): SessionCart) -> Json<CartView> {
    Json(CartView::from(cart.cart()))
}

/// Add a catalog product to the cart.
///
/// Unknown products are rejected with 404, sold-out products with 409.
#[instrument(skip(state, cart))]
pub async fn add(
    State(state): State<AppState>,
    SessionCart(mut cart): SessionCart,
    Json(form): Json<AddToCartForm>,
) -> Result<Response> {
    let id = ProductId::parse(&form.product_id)?;
    let product = state
        .catalog()
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    if !product.in_stock() {
        return Err(AppError::Conflict(format!("product {id} is out of stock")));
    }

    let quantity = u32::try_from(form.quantity.unwrap_or(1).max(1)).unwrap_or(u32::MAX);
    cart.add_item(&product.snapshot(), quantity).await;

    let quantity_label = quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[
            ("product_id", id.as_str()),
            ("quantity", quantity_label.as_str()),
        ]),
    );
    tracing::debug!(product_id = %id, quantity, "Added to cart");

    Ok(updated(cart.cart()))
}

/// Overwrite the quantity of a line.
#[instrument(skip(cart))]
pub async fn update(
    SessionCart(mut cart): SessionCart,
    Json(form): Json<UpdateCartForm>,
) -> Result<Response> {
    let id = ProductId::parse(&form.product_id)?;
    cart.set_quantity(&id, form.quantity).await;
    Ok(updated(cart.cart()))
}

/// Take one unit off a line.
#[instrument(skip(cart))]
pub async fn decrement(
    SessionCart(mut cart): SessionCart,
    Json(form): Json<CartLineForm>,
) -> Result<Response> {
    let id = ProductId::parse(&form.product_id)?;
    cart.decrement_item(&id).await;
    Ok(updated(cart.cart()))
}

/// Remove a line. Removing an absent product is not an error.
#[instrument(skip(cart))]
pub async fn remove(
    SessionCart(mut cart): SessionCart,
    Json(form): Json<CartLineForm>,
) -> Result<Response> {
    let id = ProductId::parse(&form.product_id)?;
    cart.remove_item(&id).await;
    add_breadcrumb("cart", "Removed item", Some(&[("product_id", id.as_str())]));
    Ok(updated(cart.cart()))
}

/// Empty the cart.
#[instrument(skip(cart))]
pub async fn clear(SessionCart(mut cart): SessionCart) -> Response {
    cart.clear().await;
    add_breadcrumb("cart", "Cleared cart", None);
    updated(cart.cart())
}

/// Get the cart count badge.
#[instrument(skip(cart))]
pub async fn count(SessionCart(cart): SessionCart) -> impl IntoResponse {
    Json(json!({ "count": cart.summary().quantity }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartwheel_core::ProductSnapshot;

    use super::*;

    #[test]
    fn test_cart_view_formats_prices() {
        let mut cart = Cart::new();
        cart.add_item(
            &ProductSnapshot {
                id: ProductId::parse("a").unwrap(),
                name: "A".to_string(),
                image: None,
                price: Decimal::new(10, 0),
                stock: None,
            },
            2,
        );
        cart.add_item(
            &ProductSnapshot {
                id: ProductId::parse("b").unwrap(),
                name: "B".to_string(),
                image: None,
                price: Decimal::new(5, 0),
                stock: None,
            },
            3,
        );

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 5);
        assert_eq!(view.subtotal, "$35.00");
        assert_eq!(view.items[0].line_price, "$20.00");
        assert_eq!(view.items[1].price, "$5.00");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&Cart::new());
        assert!(view.items.is_empty());
        assert_eq!(view.subtotal, "$0.00");
        assert_eq!(view.item_count, 0);
    }
}
