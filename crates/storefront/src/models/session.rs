//! Session-related types.
//!
//! The visitor's session is the durable medium for their cart: the cart's
//! JSON text lives under [`keys::CART`] and is written after every mutation.

use cartwheel_core::{CartSlot, SlotError};
use tower_sessions::Session;
use uuid::Uuid;

/// Session keys.
pub mod keys {
    /// Key for the serialized cart line items.
    pub const CART: &str = cartwheel_core::CART_SLOT_KEY;

    /// Key for the ids of orders placed in this session.
    pub const ORDERS: &str = "orders";
}

/// [`CartSlot`] backed by the visitor's tower-sessions session.
#[derive(Debug, Clone)]
pub struct SessionSlot {
    session: Session,
}

impl SessionSlot {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartSlot for SessionSlot {
    async fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        self.session
            .get::<String>(key)
            .await
            .map_err(|e| SlotError::Unavailable(e.to_string()))
    }

    async fn write(&self, key: &str, value: String) -> Result<(), SlotError> {
        self.session
            .insert(key, value)
            .await
            .map_err(|e| SlotError::Unavailable(e.to_string()))
    }
}

/// Get the ids of orders placed in this session, oldest first.
pub async fn order_ids(session: &Session) -> Vec<Uuid> {
    session
        .get::<Vec<Uuid>>(keys::ORDERS)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Remember an order placed in this session.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn push_order_id(
    session: &Session,
    order_id: Uuid,
) -> Result<(), tower_sessions::session::Error> {
    let mut ids = order_ids(session).await;
    ids.push(order_id);
    session.insert(keys::ORDERS, ids).await
}
