//! Integration tests for Cartwheel.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`,
//! backed by an in-memory session store. [`TestClient`] plays the part of a
//! browser: it keeps the session cookie between requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartwheel-integration-tests
//! ```

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use cartwheel_core::{CouponCode, PricingRules};
use cartwheel_storefront::catalog::Catalog;
use cartwheel_storefront::config::StorefrontConfig;
use cartwheel_storefront::middleware::memory_session_layer;
use cartwheel_storefront::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// Catalog used by every test.
pub const FIXTURE_CATALOG: &str = r#"[
    {"id": "a", "name": "Product A", "price": 20, "stock": 10, "category": "tea"},
    {"id": "b", "name": "Product B", "image": "/img/b.jpg", "price": 5, "category": "tea"},
    {"id": "kettle", "name": "Gooseneck Kettle", "price": 45.99, "stock": 2, "category": "kitchen"},
    {"id": "gone", "name": "Sold Out", "price": 3, "stock": 0, "category": "kitchen"}
]"#;

/// Build the storefront router over the fixture catalog.
///
/// Pricing: free shipping from 50, otherwise 5. Coupons `SAVE10` (10%) and
/// `HALF` (50%).
#[must_use]
pub fn test_app() -> Router {
    let mut config = StorefrontConfig::local("fixture.json");
    config.pricing = fixture_pricing();

    let catalog = Catalog::from_json(FIXTURE_CATALOG).expect("fixture catalog is valid");
    let layer = memory_session_layer(&config);
    cartwheel_storefront::app(AppState::with_catalog(config, catalog, None), layer)
}

fn fixture_pricing() -> PricingRules {
    let mut pricing = PricingRules::default();
    for (code, percent) in [("SAVE10", 10), ("HALF", 50)] {
        let code = CouponCode::parse(code).expect("fixture coupon is valid");
        pricing
            .add_coupon(code, percent)
            .expect("fixture percent is valid");
    }
    pricing
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body, or `Value::String` for non-JSON bodies.
    pub body: Value,
}

impl TestResponse {
    /// Header value as a string, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// In-process client that carries the session cookie like a browser.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClient {
    /// A new visitor on a fresh storefront.
    #[must_use]
    pub fn new() -> Self {
        Self::with_app(test_app())
    }

    /// A new visitor on an existing storefront (shared sessions and orders).
    #[must_use]
    pub const fn with_app(app: Router) -> Self {
        Self { app, cookie: None }
    }

    /// Another visitor (no cookie) on the same storefront.
    #[must_use]
    pub fn stranger(&self) -> Self {
        Self::with_app(self.app.clone())
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri).body(Body::empty());
        self.send(request.expect("valid request")).await
    }

    pub async fn post(&mut self, uri: &str) -> TestResponse {
        let request = Request::post(uri).body(Body::empty());
        self.send(request.expect("valid request")).await
    }

    pub async fn post_json(&mut self, uri: &str, body: &Value) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()));
        self.send(request.expect("valid request")).await
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            let value = cookie.parse().expect("cookie is a valid header value");
            request.headers_mut().insert(header::COOKIE, value);
        }

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let session_pair = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next());
        if let Some(pair) = session_pair {
            self.cookie = Some(pair.trim().to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
