//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (the single-page front end may be served from another origin)
//! 5. Session layer (tower-sessions, `PostgreSQL` or in-memory store)
//!
//! The [`SessionCart`] extractor then restores the visitor's cart from the
//! session inside each cart handler.

pub mod cart;
pub mod request_id;
pub mod session;

pub use cart::SessionCart;
pub use request_id::{RequestId, request_id_middleware};
pub use session::{memory_session_layer, postgres_session_layer, session_layer};
