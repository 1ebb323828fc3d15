//! A cart bound to its persistence.

use super::{Cart, CartPersistence, CartSlot, CartSummary, LineItem, ProductSnapshot};
use crate::types::ProductId;

/// The single cart instance of a session.
///
/// Reads go straight to the in-memory [`Cart`]. Every mutation updates the
/// cart first and then awaits [`CartPersistence::save`], so a read after a
/// mutation always sees the new state and the slot never lags behind.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    persistence: CartPersistence<S>,
}

impl<S: CartSlot> CartStore<S> {
    /// Restore the cart saved in `persistence`, or start empty.
    pub async fn open(persistence: CartPersistence<S>) -> Self {
        let cart = persistence.load().await;
        Self { cart, persistence }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Totals for the current contents.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.cart.summary()
    }

    pub async fn add_item(&mut self, product: &ProductSnapshot, quantity: u32) {
        self.cart.add_item(product, quantity);
        self.persist().await;
    }

    pub async fn remove_item(&mut self, id: &ProductId) {
        self.cart.remove_item(id);
        self.persist().await;
    }

    pub async fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        self.cart.set_quantity(id, quantity);
        self.persist().await;
    }

    pub async fn decrement_item(&mut self, id: &ProductId) {
        self.cart.decrement_item(id);
        self.persist().await;
    }

    pub async fn clear(&mut self) {
        self.cart.clear();
        self.persist().await;
    }

    /// Hand back the persistence adapter, e.g. to reuse its slot.
    pub fn into_persistence(self) -> CartPersistence<S> {
        self.persistence
    }

    async fn persist(&self) {
        self.persistence.save(&self.cart).await;
    }
}
