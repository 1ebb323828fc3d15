//! Domain models for storefront.
//!
//! Products live in [`crate::catalog`], receipts in [`crate::orders`]; this
//! module holds what is kept in the visitor's session.

pub mod session;

pub use session::{SessionSlot, keys as session_keys};
