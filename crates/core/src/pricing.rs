//! Checkout pricing derived from a cart summary.
//!
//! Quotes are read-only: they take a [`CartSummary`] and never touch the
//! cart itself.
//!
//! ```
//! use cartwheel_core::{CartSummary, PricingRules};
//! use rust_decimal::Decimal;
//!
//! let rules = PricingRules::new(Some(Decimal::new(50, 0)), Decimal::new(5, 0));
//! let summary = CartSummary { quantity: 2, price: Decimal::new(20, 0) };
//! let quote = rules.quote(&summary, None).unwrap();
//! assert_eq!(quote.total, Decimal::new(25, 0));
//! ```

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::cart::CartSummary;
use crate::types::CouponCode;

/// Errors produced while pricing a checkout.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("unknown coupon code: {0}")]
    UnknownCoupon(CouponCode),
    #[error("coupon discount must be between 1 and 100 percent (got {0})")]
    InvalidPercent(u8),
}

/// Shipping and coupon rules for a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingRules {
    /// Subtotal at or above which shipping is free. `None` disables it.
    pub free_shipping_threshold: Option<Decimal>,
    /// Flat shipping fee below the threshold.
    pub shipping_fee: Decimal,
    coupons: BTreeMap<CouponCode, u8>,
}

impl PricingRules {
    #[must_use]
    pub const fn new(free_shipping_threshold: Option<Decimal>, shipping_fee: Decimal) -> Self {
        Self {
            free_shipping_threshold,
            shipping_fee,
            coupons: BTreeMap::new(),
        }
    }

    /// Register a percentage-off coupon.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidPercent`] unless `percent` is in `1..=100`.
    pub fn add_coupon(&mut self, code: CouponCode, percent: u8) -> Result<(), PricingError> {
        if !(1..=100).contains(&percent) {
            return Err(PricingError::InvalidPercent(percent));
        }
        self.coupons.insert(code, percent);
        Ok(())
    }

    /// Percentage for a coupon, if it exists.
    #[must_use]
    pub fn coupon_percent(&self, code: &CouponCode) -> Option<u8> {
        self.coupons.get(code).copied()
    }

    /// Shipping charged for a given subtotal.
    ///
    /// Empty carts ship for free; the threshold compares against the
    /// subtotal before any discount.
    #[must_use]
    pub fn shipping_for(&self, summary: &CartSummary) -> Decimal {
        if summary.is_empty() {
            return Decimal::ZERO;
        }
        match self.free_shipping_threshold {
            Some(threshold) if summary.price >= threshold => Decimal::ZERO,
            _ => self.shipping_fee,
        }
    }

    /// Price a checkout. Arithmetic saturates at [`Decimal::MAX`].
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::UnknownCoupon`] if `coupon` is not registered.
    pub fn quote(
        &self,
        summary: &CartSummary,
        coupon: Option<&CouponCode>,
    ) -> Result<CheckoutQuote, PricingError> {
        let discount = match coupon {
            Some(code) => {
                let percent = self
                    .coupon_percent(code)
                    .ok_or_else(|| PricingError::UnknownCoupon(code.clone()))?;
                (summary.price.saturating_mul(Decimal::from(percent)) / Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            }
            None => Decimal::ZERO,
        };

        let shipping = self.shipping_for(summary);

        Ok(CheckoutQuote {
            item_count: summary.quantity,
            subtotal: summary.price,
            discount,
            shipping,
            total: summary.price.saturating_sub(discount).saturating_add(shipping),
            coupon: coupon.cloned(),
        })
    }
}

impl Default for PricingRules {
    /// Free shipping from $50, otherwise $5, no coupons.
    fn default() -> Self {
        Self::new(Some(Decimal::new(50, 0)), Decimal::new(5, 0))
    }
}

/// Checkout summary shown on the cart sidebar and checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutQuote {
    pub item_count: u64,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total: Decimal,
    pub coupon: Option<CouponCode>,
}
