//! HTTP route handlers for storefront.
//!
//! All bodies are JSON.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database, when configured)
//!
//! # Products
//! GET  /products               - Product listing (q, category, page, per_page)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (mutations respond with the cart and HX-Trigger: cart-updated)
//! GET  /cart                   - Cart view
//! POST /cart/add               - Add a product {product_id, quantity?}
//! POST /cart/update            - Set quantity {product_id, quantity}; <= 0 removes
//! POST /cart/decrement         - Take one unit off {product_id}
//! POST /cart/remove            - Remove a line {product_id}
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge
//!
//! # Checkout
//! GET  /checkout/quote         - Price the cart (?coupon=)
//! POST /checkout               - Place an order {coupon?}
//!
//! # Orders (current session)
//! GET  /orders                 - Receipts
//! GET  /orders/{id}            - Receipt
//! ```

pub mod cart;
pub mod checkout;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::place))
        .route("/quote", get(checkout::quote))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/orders", order_routes())
}
