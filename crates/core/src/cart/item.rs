//! Line items and the product snapshots they are created from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Product data handed to [`Cart::add_item`](super::Cart::add_item).
///
/// Supplied by the catalog; the cart treats it as opaque input and only
/// captures what it needs at insertion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    #[serde(default)]
    pub stock: Option<u32>,
}

/// One product entry in the cart.
///
/// Serialized as `{id, name, image, unitPrice, quantity}` with `unitPrice`
/// as a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Identity key, unique within a cart.
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Price captured when the item was first added. Never negative.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,
    /// Always at least 1 for an item present in a cart.
    pub quantity: u32,
}

impl LineItem {
    /// Build a new line item from a product snapshot.
    ///
    /// Negative catalog prices are clamped to zero and `quantity` to at
    /// least 1.
    #[must_use]
    pub fn from_product(product: &ProductSnapshot, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            unit_price: product.price.max(Decimal::ZERO),
            quantity: quantity.max(1),
        }
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot(price: Decimal) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::parse("mug").unwrap(),
            name: "Mug".to_string(),
            image: Some("/img/mug.jpg".to_string()),
            price,
            stock: Some(4),
        }
    }

    #[test]
    fn test_from_product_captures_price() {
        let item = LineItem::from_product(&snapshot(Decimal::new(1250, 2)), 2);
        assert_eq!(item.unit_price, Decimal::new(1250, 2));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.line_total(), Decimal::new(25, 0));
    }

    #[test]
    fn test_from_product_clamps() {
        let item = LineItem::from_product(&snapshot(Decimal::new(-5, 0)), 0);
        assert_eq!(item.unit_price, Decimal::ZERO);
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_line_total_saturates() {
        let mut item = LineItem::from_product(&snapshot(Decimal::MAX), 1);
        item.quantity = 10;
        assert_eq!(item.line_total(), Decimal::MAX);
    }

    #[test]
    fn test_wire_format() {
        let item = LineItem::from_product(&snapshot(Decimal::new(1250, 2)), 3);
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"id":"mug","name":"Mug","image":"/img/mug.jpg","unitPrice":12.50,"quantity":3}"#
        );
    }

    #[test]
    fn test_unit_price_keeps_every_digit() {
        let price = "1234567890123456.78".parse::<Decimal>().unwrap();
        let item = LineItem::from_product(&snapshot(price), 1);

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains(r#""unitPrice":1234567890123456.78"#));

        let back: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.unit_price, price);
    }
}
