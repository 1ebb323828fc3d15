//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use cartwheel_core::{CurrencyCode, Price, ProductId};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::{Product, ProductPage, ProductQuery};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product detail response.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    /// Formatted price (e.g., "$14.00").
    pub display_price: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            product: product.clone(),
            display_price: Price::new(product.price, CurrencyCode::default()).display(),
            in_stock: product.in_stock(),
        }
    }
}

/// List products with search, category filter and pagination.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ProductPage> {
    Json(state.catalog().list(&query))
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ProductView>> {
    let id = ProductId::parse(&id)?;
    let product = state
        .catalog()
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(ProductView::from(product)))
}
