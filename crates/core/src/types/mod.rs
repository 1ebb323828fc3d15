//! Core types for Cartwheel.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod coupon;
pub mod id;
pub mod price;

pub use coupon::{CouponCode, CouponCodeError};
pub use id::{ProductId, ProductIdError};
pub use price::{CurrencyCode, Price};
