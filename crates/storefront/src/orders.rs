//! Order receipts produced at checkout.
//!
//! Receipts are kept in a bounded in-memory cache (24-hour TTL). There is no
//! payment step; a receipt records what was in the cart and how it was priced.

use std::sync::Arc;
use std::time::Duration;

use cartwheel_core::{CheckoutQuote, LineItem};
use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::Serialize;
use uuid::Uuid;

/// How long receipts are retained.
const RECEIPT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Maximum number of receipts kept in memory.
const MAX_RECEIPTS: u64 = 10_000;

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderReceipt {
    pub order_id: Uuid,
    pub lines: Vec<LineItem>,
    pub quote: CheckoutQuote,
    pub placed_at: DateTime<Utc>,
}

/// Store of recent order receipts.
#[derive(Clone)]
pub struct OrderBook {
    receipts: Cache<Uuid, Arc<OrderReceipt>>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    #[must_use]
    pub fn new() -> Self {
        let receipts = Cache::builder()
            .max_capacity(MAX_RECEIPTS)
            .time_to_live(RECEIPT_TTL)
            .build();
        Self { receipts }
    }

    /// Record an order under `order_id` and return its receipt.
    pub async fn place(
        &self,
        order_id: Uuid,
        lines: Vec<LineItem>,
        quote: CheckoutQuote,
    ) -> Arc<OrderReceipt> {
        let receipt = Arc::new(OrderReceipt {
            order_id,
            lines,
            quote,
            placed_at: Utc::now(),
        });
        self.receipts
            .insert(receipt.order_id, Arc::clone(&receipt))
            .await;
        tracing::info!(order_id = %receipt.order_id, "Order placed");
        receipt
    }

    /// Fetch a receipt, if it has not expired.
    pub async fn get(&self, order_id: &Uuid) -> Option<Arc<OrderReceipt>> {
        self.receipts.get(order_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartwheel_core::{CartSummary, PricingRules};
    use rust_decimal::Decimal;

    use super::*;

    fn quote() -> CheckoutQuote {
        let summary = CartSummary {
            quantity: 1,
            price: Decimal::new(10, 0),
        };
        PricingRules::default().quote(&summary, None).unwrap()
    }

    #[tokio::test]
    async fn test_place_then_get() {
        let book = OrderBook::new();

        let receipt = book.place(Uuid::new_v4(), Vec::new(), quote()).await;
        let fetched = book.get(&receipt.order_id).await.unwrap();
        assert_eq!(fetched.quote, quote());
        assert!(book.get(&Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_place_keeps_caller_order_id() {
        let book = OrderBook::new();
        let order_id = Uuid::new_v4();

        assert!(book.get(&order_id).await.is_none());
        let receipt = book.place(order_id, Vec::new(), quote()).await;
        assert_eq!(receipt.order_id, order_id);
        assert_eq!(book.get(&order_id).await.unwrap().order_id, order_id);
    }
}
