//! Local cart commands.
//!
//! Drives the same cart engine the storefront uses, persisted to a directory
//! instead of an HTTP session. Handy for inspecting pricing rules and catalog
//! data without running the server.
//!
//! # Usage
//!
//! ```bash
//! cartwheel cart --dir .cartwheel add tea-green --quantity 2
//! cartwheel cart --dir .cartwheel update tea-green -1
//! cartwheel cart --dir .cartwheel quote --coupon SAVE10
//! ```

use std::path::{Path, PathBuf};

use cartwheel_core::{
    CartPersistence, CartStore, CartSummary, CheckoutQuote, CouponCode, CouponCodeError, LineItem,
    PricingError, PricingRules, ProductId, ProductIdError,
};
use cartwheel_storefront::catalog::{Catalog, CatalogError};
use clap::Subcommand;
use serde::Serialize;
use thiserror::Error;

use crate::slot::FileSlot;

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Show the cart and its summary
    Show,
    /// Add a catalog product
    Add {
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (zero or less removes the line)
    Update {
        product_id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Take one unit off a line
    Decrement { product_id: String },
    /// Remove a line
    Remove { product_id: String },
    /// Empty the cart
    Clear,
    /// Price the cart
    Quote {
        #[arg(short, long)]
        coupon: Option<String>,
    },
}

/// Errors from cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("Product {0} is out of stock")]
    OutOfStock(ProductId),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Invalid product id: {0}")]
    ProductId(#[from] ProductIdError),

    #[error("Invalid coupon: {0}")]
    Coupon(#[from] CouponCodeError),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// What a cart command reports back.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CartOutput {
    Cart {
        items: Vec<LineItem>,
        summary: CartSummary,
    },
    Quote(CheckoutQuote),
}

/// Where a cart command reads and writes.
#[derive(Debug, Clone)]
pub struct CartContext {
    pub dir: PathBuf,
    pub catalog_path: PathBuf,
    pub pricing: PricingRules,
}

/// Run one cart command against the cart stored in `ctx.dir`.
///
/// # Errors
///
/// Returns an error for malformed ids and coupons, products missing from the
/// catalog or out of stock, and unknown coupons.
pub async fn run(ctx: &CartContext, action: CartAction) -> Result<CartOutput, CartCommandError> {
    let mut store = CartStore::open(CartPersistence::new(FileSlot::new(&ctx.dir))).await;

    match action {
        CartAction::Show => {}
        CartAction::Add {
            product_id,
            quantity,
        } => {
            let id = ProductId::parse(&product_id)?;
            let catalog = load_catalog(&ctx.catalog_path)?;
            let product = catalog
                .get(&id)
                .ok_or_else(|| CartCommandError::UnknownProduct(id.clone()))?;
            if !product.in_stock() {
                return Err(CartCommandError::OutOfStock(id));
            }
            store.add_item(&product.snapshot(), quantity).await;
        }
        CartAction::Update {
            product_id,
            quantity,
        } => {
            store
                .set_quantity(&ProductId::parse(&product_id)?, quantity)
                .await;
        }
        CartAction::Decrement { product_id } => {
            store.decrement_item(&ProductId::parse(&product_id)?).await;
        }
        CartAction::Remove { product_id } => {
            store.remove_item(&ProductId::parse(&product_id)?).await;
        }
        CartAction::Clear => store.clear().await,
        CartAction::Quote { coupon } => {
            let coupon = coupon.as_deref().map(CouponCode::parse).transpose()?;
            let quote = ctx.pricing.quote(&store.summary(), coupon.as_ref())?;
            return Ok(CartOutput::Quote(quote));
        }
    }

    Ok(CartOutput::Cart {
        items: store.items().to_vec(),
        summary: store.summary(),
    })
}

fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let catalog = Catalog::load(path)?;
    tracing::debug!(products = catalog.len(), path = %path.display(), "Catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const CATALOG: &str = r#"[
        {"id": "a", "name": "Product A", "price": 20},
        {"id": "b", "name": "Product B", "price": 5, "stock": 9},
        {"id": "gone", "name": "Sold Out", "price": 3, "stock": 0}
    ]"#;

    fn context(dir: &tempfile::TempDir) -> CartContext {
        let catalog_path = dir.path().join("catalog.json");
        std::fs::write(&catalog_path, CATALOG).unwrap();

        let mut pricing = PricingRules::default();
        pricing
            .add_coupon(CouponCode::parse("SAVE10").unwrap(), 10)
            .unwrap();

        CartContext {
            dir: dir.path().join("cart"),
            catalog_path,
            pricing,
        }
    }

    fn add(id: &str, quantity: u32) -> CartAction {
        CartAction::Add {
            product_id: id.to_string(),
            quantity,
        }
    }

    fn unwrap_cart(output: CartOutput) -> (Vec<LineItem>, CartSummary) {
        match output {
            CartOutput::Cart { items, summary } => (items, summary),
            CartOutput::Quote(_) => panic!("expected cart output"),
        }
    }

    #[tokio::test]
    async fn test_cart_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        run(&ctx, add("a", 1)).await.unwrap();
        run(&ctx, add("b", 3)).await.unwrap();
        run(
            &ctx,
            CartAction::Remove {
                product_id: "a".to_string(),
            },
        )
        .await
        .unwrap();

        let (items, summary) = unwrap_cart(run(&ctx, CartAction::Show).await.unwrap());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_str(), "b");
        assert_eq!(items[0].quantity, 3);
        assert_eq!(summary.quantity, 3);
        assert_eq!(summary.price, Decimal::new(15, 0));
    }

    #[tokio::test]
    async fn test_show_hand_edited_cart_with_huge_price() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        std::fs::create_dir_all(&ctx.dir).unwrap();
        std::fs::write(
            ctx.dir.join("cart.json"),
            r#"[{"id":"x","name":"X","image":null,"unitPrice":10000000000000000000000000000,"quantity":10}]"#,
        )
        .unwrap();

        let (items, summary) = unwrap_cart(run(&ctx, CartAction::Show).await.unwrap());
        assert_eq!(items.len(), 1);
        assert_eq!(summary.price, Decimal::MAX);

        let output = run(&ctx, CartAction::Quote { coupon: None }).await.unwrap();
        let CartOutput::Quote(quote) = output else {
            panic!("expected quote output");
        };
        assert_eq!(quote.subtotal, Decimal::MAX);
        assert_eq!(quote.total, Decimal::MAX);
    }

    #[tokio::test]
    async fn test_update_negative_removes_line() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        run(&ctx, add("b", 2)).await.unwrap();
        let (items, _) = unwrap_cart(
            run(
                &ctx,
                CartAction::Update {
                    product_id: "b".to_string(),
                    quantity: -1,
                },
            )
            .await
            .unwrap(),
        );
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_unknown_and_sold_out() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        assert!(matches!(
            run(&ctx, add("missing", 1)).await,
            Err(CartCommandError::UnknownProduct(_))
        ));
        assert!(matches!(
            run(&ctx, add("gone", 1)).await,
            Err(CartCommandError::OutOfStock(_))
        ));
    }

    #[tokio::test]
    async fn test_quote_with_coupon() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        run(&ctx, add("a", 3)).await.unwrap();
        let output = run(
            &ctx,
            CartAction::Quote {
                coupon: Some("save10".to_string()),
            },
        )
        .await
        .unwrap();

        let CartOutput::Quote(quote) = output else {
            panic!("expected quote output");
        };
        assert_eq!(quote.subtotal, Decimal::new(60, 0));
        assert_eq!(quote.discount, Decimal::new(6, 0));
        assert_eq!(quote.shipping, Decimal::ZERO);
        assert_eq!(quote.total, Decimal::new(54, 0));
    }

    #[tokio::test]
    async fn test_quote_unknown_coupon() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        let result = run(
            &ctx,
            CartAction::Quote {
                coupon: Some("NOPE".to_string()),
            },
        )
        .await;
        assert!(matches!(result, Err(CartCommandError::Pricing(_))));
    }
}
