//! Cartwheel Core - Shared types and the cart engine.
//!
//! This crate provides the pieces shared by every Cartwheel component:
//! - `storefront` - Public REST backend consumed by the single-page front end
//! - `cli` - Command-line tools for migrations and local cart inspection
//!
//! # Architecture
//!
//! The core crate contains types, pure cart logic and the persistence
//! *contract* - no HTTP, no database access. Concrete storage lives with the
//! binaries that own it (the HTTP session, a directory on disk).
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, coupon codes and prices
//! - [`cart`] - Line items, mutations, aggregation and persistence
//! - [`pricing`] - Checkout quotes (shipping threshold, coupon discounts)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod pricing;
pub mod types;

pub use cart::{
    CART_SLOT_KEY, Cart, CartError, CartPersistence, CartSlot, CartStore, CartSummary, LineItem,
    MemorySlot, ProductSnapshot, SlotError, aggregate,
};
pub use pricing::{CheckoutQuote, PricingError, PricingRules};
pub use types::*;
