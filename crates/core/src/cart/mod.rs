//! Cart aggregation engine.
//!
//! # Components
//!
//! - [`Cart`] - ordered line items, unique by product id, with the mutation
//!   operations that keep them that way
//! - [`aggregate`] - pure fold from line items to a [`CartSummary`]
//! - [`CartPersistence`] - saves/restores a cart through a text-keyed
//!   [`CartSlot`]
//! - [`CartStore`] - a cart bound to its persistence; every mutation is
//!   saved before the call returns
//!
//! # Invariants
//!
//! - No two line items share an id; adding an existing id increments its
//!   quantity.
//! - Every line item has `quantity >= 1`; reaching zero removes the row.
//! - Unit prices are captured on first add and are never negative.
//!
//! All mutations are total: they clamp or ignore bad input instead of
//! returning errors.

mod item;
mod persistence;
mod store;
mod summary;

pub use item::{LineItem, ProductSnapshot};
pub use persistence::{CART_SLOT_KEY, CartPersistence, CartSlot, MemorySlot, SlotError};
pub use store::CartStore;
pub use summary::{CartSummary, aggregate};

use rust_decimal::Decimal;

use crate::types::ProductId;

/// Reasons a list of decoded line items cannot form a cart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("duplicate line item {0}")]
    DuplicateItem(ProductId),
    #[error("line item {0} has zero quantity")]
    ZeroQuantity(ProductId),
    #[error("line item {0} has a negative unit price")]
    NegativePrice(ProductId),
}

/// An ordered collection of line items, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from previously stored items, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] naming the first offending item.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        for (index, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(CartError::ZeroQuantity(item.id.clone()));
            }
            if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
                return Err(CartError::NegativePrice(item.id.clone()));
            }
            if items.iter().take(index).any(|seen| seen.id == item.id) {
                return Err(CartError::DuplicateItem(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line item by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Totals for the current contents. Recomputed on every call.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        aggregate(&self.items)
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing line keeps its captured unit price and gains `quantity`
    /// units; otherwise a new line is appended. `quantity` is clamped to at
    /// least 1.
    pub fn add_item(&mut self, product: &ProductSnapshot, quantity: u32) {
        let quantity = quantity.max(1);
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(LineItem::from_product(product, quantity)),
        }
    }

    /// Remove the line for `id`. Absent ids are ignored.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Overwrite the quantity of `id`; `quantity <= 0` removes the line.
    ///
    /// Unknown ids are ignored. Quantities above `u32::MAX` saturate.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Take one unit off `id`, removing the line when it reaches zero.
    pub fn decrement_item(&mut self, id: &ProductId) {
        if let Some(quantity) = self.get(id).map(|item| item.quantity) {
            self.set_quantity(id, i64::from(quantity) - 1);
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Consume the cart, returning its line items.
    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Subtotal of the cart. Shorthand for `summary().price`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.summary().price
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::parse(id).unwrap(),
            name: format!("Product {id}"),
            image: None,
            price: Decimal::new(price, 0),
            stock: None,
        }
    }

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    #[test]
    fn test_add_new_item() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 20), 1);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(&id("a")).unwrap().quantity, 1);
    }

    #[test]
    fn test_add_existing_item_is_additive() {
        let mut cart = Cart::new();
        let p = product("a", 20);
        cart.add_item(&p, 1);
        cart.add_item(&p, 2);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(&id("a")).unwrap().quantity, 3);
    }

    #[test]
    fn test_add_clamps_zero_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 20), 0);
        assert_eq!(cart.get(&id("a")).unwrap().quantity, 1);
    }

    #[test]
    fn test_add_keeps_first_captured_price() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 20), 1);
        cart.add_item(&product("a", 99), 1);
        let item = cart.get(&id("a")).unwrap();
        assert_eq!(item.unit_price, Decimal::new(20, 0));
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_add_saturates() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 1), u32::MAX);
        cart.add_item(&product("a", 1), 5);
        assert_eq!(cart.get(&id("a")).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(&product("b", 1), 1);
        cart.add_item(&product("a", 1), 1);
        cart.add_item(&product("b", 1), 1);
        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 20), 1);
        cart.add_item(&product("b", 5), 1);

        assert!(cart.remove_item(&id("a")));
        let once = cart.clone();
        assert!(!cart.remove_item(&id("a")));
        assert_eq!(cart, once);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.remove_item(&id("missing")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 2), 5);
        cart.set_quantity(&id("a"), 2);
        assert_eq!(cart.get(&id("a")).unwrap().quantity, 2);
    }

    #[test]
    fn test_set_quantity_non_positive_removes() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 2), 5);
        cart.add_item(&product("b", 2), 5);
        cart.set_quantity(&id("a"), 0);
        cart.set_quantity(&id("b"), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.set_quantity(&id("ghost"), 4);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_saturates() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 2), 1);
        cart.set_quantity(&id("a"), i64::MAX);
        assert_eq!(cart.get(&id("a")).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_decrement_down_to_removal() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 2), 2);
        cart.decrement_item(&id("a"));
        assert_eq!(cart.get(&id("a")).unwrap().quantity, 1);
        cart.decrement_item(&id("a"));
        assert!(cart.get(&id("a")).is_none());
        cart.decrement_item(&id("a"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_empties_summary() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 10), 2);
        cart.add_item(&product("b", 5), 3);
        cart.clear();
        assert_eq!(cart.summary(), CartSummary::default());
    }

    #[test]
    fn test_no_zero_quantity_lines_after_any_sequence() {
        let mut cart = Cart::new();
        let a = product("a", 3);
        let b = product("b", 4);
        cart.add_item(&a, 0);
        cart.add_item(&b, 2);
        cart.decrement_item(&id("a"));
        cart.set_quantity(&id("b"), 1);
        cart.decrement_item(&id("b"));
        cart.add_item(&a, 1);
        cart.set_quantity(&id("a"), -1);
        cart.add_item(&b, 7);
        cart.decrement_item(&id("b"));
        assert!(cart.items().iter().all(|item| item.quantity >= 1));
        assert_eq!(cart.get(&id("b")).unwrap().quantity, 6);
    }

    #[test]
    fn test_scenario_add_add_remove() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 20), 1);
        cart.add_item(&product("B", 5), 3);
        cart.remove_item(&id("A"));

        assert_eq!(cart.items().len(), 1);
        let b = &cart.items()[0];
        assert_eq!(b.id.as_str(), "B");
        assert_eq!(b.quantity, 3);
        assert_eq!(b.unit_price, Decimal::new(5, 0));
        assert_eq!(
            cart.summary(),
            CartSummary {
                quantity: 3,
                price: Decimal::new(15, 0)
            }
        );
    }

    #[test]
    fn test_from_items_rejects_duplicates() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 1), 1);
        let mut items = cart.into_items();
        items.push(items[0].clone());
        assert_eq!(
            Cart::from_items(items),
            Err(CartError::DuplicateItem(id("a")))
        );
    }

    #[test]
    fn test_from_items_rejects_zero_quantity() {
        let mut item = LineItem::from_product(&product("a", 1), 1);
        item.quantity = 0;
        assert_eq!(
            Cart::from_items(vec![item]),
            Err(CartError::ZeroQuantity(id("a")))
        );
    }

    #[test]
    fn test_from_items_rejects_negative_price() {
        let mut item = LineItem::from_product(&product("a", 1), 1);
        item.unit_price = Decimal::new(-1, 0);
        assert_eq!(
            Cart::from_items(vec![item]),
            Err(CartError::NegativePrice(id("a")))
        );
    }
}
