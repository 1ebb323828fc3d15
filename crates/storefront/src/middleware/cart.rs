//! Cart extractor.
//!
//! Builds the visitor's [`CartStore`] from their session. This is the only
//! place a store is constructed for HTTP handlers, so every handler in a
//! request sees the same persisted cart.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use cartwheel_core::{CartPersistence, CartStore};
use tower_sessions::Session;

use crate::models::SessionSlot;
use crate::models::session_keys;

/// The visitor's cart, restored from the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(SessionCart(mut cart): SessionCart) -> impl IntoResponse {
///     cart.clear().await;
///     Json(cart.summary())
/// }
/// ```
pub struct SessionCart(pub CartStore<SessionSlot>);

/// Rejection when the session layer is missing.
#[derive(Debug)]
pub struct MissingSession;

impl IntoResponse for MissingSession {
    fn into_response(self) -> Response {
        tracing::error!("Session layer missing; cannot load cart");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = MissingSession;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(MissingSession)?;

        let persistence =
            CartPersistence::with_key(SessionSlot::new(session), session_keys::CART);
        Ok(Self(CartStore::open(persistence).await))
    }
}
