//! Product catalog.
//!
//! The catalog is read from a JSON file once at start-up and kept in memory.
//! It is the source of the [`ProductSnapshot`]s handed to the cart.

use std::collections::HashSet;
use std::path::Path;

use cartwheel_core::{ProductId, ProductSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of products per page.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 100;

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    /// Units available; `None` means untracked.
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock != Some(0)
    }

    /// Data captured by the cart when this product is added.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Listing filters and pagination, taken from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name.
    pub q: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// One page of products.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub total_pages: u32,
}

/// In-memory product catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Load the catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed, or if the
    /// products are inconsistent.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load`].
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(raw)?;
        Self::from_products(products)
    }

    /// Build a catalog, rejecting duplicate ids and negative prices.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load`].
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if product.price.is_sign_negative() && !product.price.is_zero() {
                return Err(CatalogError::NegativePrice(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Filter and paginate the catalog, preserving catalog order.
    #[must_use]
    pub fn list(&self, query: &ProductQuery) -> ProductPage {
        let needle = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| {
                needle
                    .as_deref()
                    .is_none_or(|n| p.name.to_lowercase().contains(n))
            })
            .filter(|p| category.is_none_or(|c| p.category.as_deref() == Some(c)))
            .collect();

        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let page = query.page.unwrap_or(1).max(1);
        let total = matches.len();
        let total_pages = u32::try_from(total.div_ceil(per_page as usize)).unwrap_or(u32::MAX);

        let offset = (page as usize - 1).saturating_mul(per_page as usize);
        let items = matches
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .cloned()
            .collect();

        ProductPage {
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"id": "tea-green", "name": "Green Tea", "price": 8.5, "stock": 12, "category": "tea"},
        {"id": "tea-black", "name": "Black Tea", "price": 7, "stock": 0, "category": "tea"},
        {"id": "mug", "name": "Stoneware Mug", "image": "/img/mug.jpg", "price": 14, "category": "kitchen"},
        {"id": "kettle", "name": "Gooseneck Kettle", "price": 45.99, "stock": 3, "category": "kitchen"},
        {"id": "tea-oolong", "name": "Oolong Tea", "price": 11.25, "category": "tea"}
    ]"#;

    fn catalog() -> Catalog {
        Catalog::from_json(CATALOG).unwrap()
    }

    fn ids(page: &ProductPage) -> Vec<&str> {
        page.items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_get() {
        let catalog = catalog();
        let mug = catalog.get(&ProductId::parse("mug").unwrap()).unwrap();
        assert_eq!(mug.price, Decimal::new(14, 0));
        assert!(catalog.get(&ProductId::parse("spoon").unwrap()).is_none());
    }

    #[test]
    fn test_in_stock() {
        let catalog = catalog();
        assert!(!catalog.get(&ProductId::parse("tea-black").unwrap()).unwrap().in_stock());
        assert!(catalog.get(&ProductId::parse("mug").unwrap()).unwrap().in_stock());
    }

    #[test]
    fn test_list_defaults() {
        let page = catalog().list(&ProductQuery::default());
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn test_list_search_is_case_insensitive() {
        let page = catalog().list(&ProductQuery {
            q: Some("TEA".to_string()),
            ..ProductQuery::default()
        });
        assert_eq!(ids(&page), ["tea-green", "tea-black", "tea-oolong"]);
    }

    #[test]
    fn test_list_category() {
        let page = catalog().list(&ProductQuery {
            category: Some("kitchen".to_string()),
            ..ProductQuery::default()
        });
        assert_eq!(ids(&page), ["mug", "kettle"]);
    }

    #[test]
    fn test_list_pagination() {
        let catalog = catalog();
        let query = |page| ProductQuery {
            page: Some(page),
            per_page: Some(2),
            ..ProductQuery::default()
        };

        let first = catalog.list(&query(1));
        assert_eq!(ids(&first), ["tea-green", "tea-black"]);
        assert_eq!(first.total_pages, 3);

        let last = catalog.list(&query(3));
        assert_eq!(ids(&last), ["tea-oolong"]);

        let beyond = catalog.list(&query(9));
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 5);
    }

    #[test]
    fn test_list_clamps_page_size() {
        let catalog = catalog();
        let page = catalog.list(&ProductQuery {
            page: Some(0),
            per_page: Some(0),
            ..ProductQuery::default()
        });
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);

        let page = catalog.list(&ProductQuery {
            per_page: Some(10_000),
            ..ProductQuery::default()
        });
        assert_eq!(page.per_page, MAX_PER_PAGE);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let raw = r#"[{"id": "a", "name": "A", "price": 1}, {"id": "a", "name": "B", "price": 2}]"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let raw = r#"[{"id": "a", "name": "A", "price": -1}]"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_snapshot_copies_price() {
        let catalog = catalog();
        let kettle = catalog.get(&ProductId::parse("kettle").unwrap()).unwrap();
        let snapshot = kettle.snapshot();
        assert_eq!(snapshot.price, Decimal::new(4599, 2));
        assert_eq!(snapshot.stock, Some(3));
    }
}
