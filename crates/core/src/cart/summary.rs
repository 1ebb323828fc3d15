//! Cart aggregation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LineItem;

/// Derived totals for a cart: units and subtotal price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSummary {
    /// Total number of units across all line items.
    pub quantity: u64,
    /// Sum of `unit_price × quantity` over all line items.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
}

impl CartSummary {
    /// True when the cart holds no units.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}

/// Fold line items into a [`CartSummary`].
///
/// An empty slice yields `{quantity: 0, price: 0}`.
#[must_use]
pub fn aggregate(items: &[LineItem]) -> CartSummary {
    items
        .iter()
        .fold(CartSummary::default(), |acc, item| CartSummary {
            quantity: acc.quantity.saturating_add(u64::from(item.quantity)),
            price: acc.price.saturating_add(item.line_total()),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn item(id: &str, price: i64, quantity: u32) -> LineItem {
        LineItem {
            id: ProductId::parse(id).unwrap(),
            name: id.to_string(),
            image: None,
            unit_price: Decimal::new(price, 0),
            quantity,
        }
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(
            aggregate(&[]),
            CartSummary {
                quantity: 0,
                price: Decimal::ZERO
            }
        );
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_aggregate_sums_units_and_price() {
        let summary = aggregate(&[item("a", 10, 2), item("b", 5, 3)]);
        assert_eq!(summary.quantity, 5);
        assert_eq!(summary.price, Decimal::new(35, 0));
    }

    #[test]
    fn test_aggregate_keeps_cents() {
        let mut a = item("a", 0, 3);
        a.unit_price = Decimal::new(333, 2);
        assert_eq!(aggregate(&[a]).price, Decimal::new(999, 2));
    }

    #[test]
    fn test_aggregate_saturates_instead_of_overflowing() {
        let mut huge = item("a", 0, 10);
        huge.unit_price = Decimal::MAX;
        let summary = aggregate(&[huge, item("b", 5, u32::MAX)]);
        assert_eq!(summary.price, Decimal::MAX);
        assert_eq!(summary.quantity, 10 + u64::from(u32::MAX));
    }
}
