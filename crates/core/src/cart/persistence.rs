//! Cart persistence through a text-keyed slot.
//!
//! The cart is stored as a JSON array of line items under a single key.
//! Saving never fails from the caller's point of view and loading always
//! produces a valid cart: storage problems and corrupt values are logged and
//! treated as "no prior cart".

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use super::{Cart, CartError, LineItem};

/// Default slot key for the cart.
pub const CART_SLOT_KEY: &str = "cart";

/// Errors reported by a [`CartSlot`] backend.
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    /// The backend could not be reached or refused the operation.
    #[error("slot storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem-backed slot failed.
    #[error("slot I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A durable text value stored under a string key.
///
/// Implemented by the visitor's HTTP session in the storefront, by a
/// directory of JSON files in the CLI and by [`MemorySlot`] in tests.
pub trait CartSlot: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>, SlotError>> + Send;

    /// Overwrite the value stored under `key`.
    fn write(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), SlotError>> + Send;
}

/// In-process slot backed by a map.
#[derive(Debug, Default)]
pub struct MemorySlot {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot already holding `value` under `key`.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let slot = Self::default();
        if let Ok(mut values) = slot.values.lock() {
            values.insert(key.into(), value.into());
        }
        slot
    }

    /// Synchronous read of the raw stored value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }
}

impl CartSlot for MemorySlot {
    async fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        let values = self
            .values
            .lock()
            .map_err(|_| SlotError::Unavailable("memory slot poisoned".to_owned()))?;
        Ok(values.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> Result<(), SlotError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| SlotError::Unavailable("memory slot poisoned".to_owned()))?;
        values.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Why a stored value could not be turned back into a cart.
#[derive(Debug, thiserror::Error)]
enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid cart: {0}")]
    Invalid(#[from] CartError),
}

fn decode(raw: &str) -> Result<Cart, DecodeError> {
    let items: Vec<LineItem> = serde_json::from_str(raw)?;
    Ok(Cart::from_items(items)?)
}

/// Saves and restores a [`Cart`] through a [`CartSlot`].
#[derive(Debug)]
pub struct CartPersistence<S> {
    slot: S,
    key: String,
}

impl<S: CartSlot> CartPersistence<S> {
    /// Persist under the default [`CART_SLOT_KEY`].
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, CART_SLOT_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    /// The slot key this adapter reads and writes.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn slot(&self) -> &S {
        &self.slot
    }

    /// Serialize `cart` into the slot, overwriting any previous value.
    ///
    /// Failures are logged and swallowed.
    pub async fn save(&self, cart: &Cart) {
        let raw = match serde_json::to_string(cart.items()) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.slot.write(&self.key, raw).await {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }

    /// Restore the previously saved cart.
    ///
    /// Returns an empty cart when nothing was saved, the slot cannot be read,
    /// or the stored value is corrupt.
    pub async fn load(&self) -> Cart {
        let raw = match self.slot.read(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read stored cart");
                return Cart::new();
            }
        };

        decode(&raw).unwrap_or_else(|e| {
            tracing::warn!(key = %self.key, error = %e, "Discarding corrupt stored cart");
            Cart::new()
        })
    }
}
