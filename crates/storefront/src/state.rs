//! Application state shared across handlers.

use std::sync::Arc;

use cartwheel_core::PricingRules;
use sqlx::PgPool;

use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;
use crate::orders::OrderBook;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog, pricing rules and configuration.
/// It holds no per-visitor data: each visitor's cart lives in their session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    orders: OrderBook,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create a new application state, loading the catalog from
    /// `config.catalog_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn new(config: StorefrontConfig, pool: Option<PgPool>) -> Result<Self, CatalogError> {
        let catalog = Catalog::load(&config.catalog_path)?;
        tracing::info!(products = catalog.len(), "Catalog loaded");
        Ok(Self::with_catalog(config, catalog, pool))
    }

    /// Create application state around an already-built catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog, pool: Option<PgPool>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders: OrderBook::new(),
                pool,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn pricing(&self) -> &PricingRules {
        &self.inner.config.pricing
    }

    #[must_use]
    pub fn orders(&self) -> &OrderBook {
        &self.inner.orders
    }

    /// Get the database pool, when sessions are stored in `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
