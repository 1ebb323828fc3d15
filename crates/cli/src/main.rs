//! Cartwheel CLI - Database migrations and local cart tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the session table in PostgreSQL
//! cartwheel migrate sessions
//!
//! # Work with a cart stored on disk
//! cartwheel cart --dir .cartwheel add tea-green -q 2
//! cartwheel cart --dir .cartwheel show
//! cartwheel cart --dir .cartwheel quote --coupon SAVE10
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `cart` - Drive the cart engine against a directory

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use cartwheel_storefront::config::StorefrontConfig;
use clap::{Parser, Subcommand};

mod commands;
mod slot;

use commands::cart::{CartAction, CartContext};

#[derive(Parser)]
#[command(name = "cartwheel")]
#[command(author, version, about = "Cartwheel CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Inspect and modify a cart stored on disk
    Cart {
        /// Directory holding the cart file
        #[arg(long, default_value = ".cartwheel")]
        dir: PathBuf,

        /// Product catalog (defaults to `STOREFRONT_CATALOG_PATH`)
        #[arg(long)]
        catalog: Option<PathBuf>,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Create the tower-sessions table
    Sessions,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Sessions => commands::migrate::sessions().await?,
        },
        Commands::Cart {
            dir,
            catalog,
            action,
        } => {
            let config = StorefrontConfig::from_env()?;
            let ctx = CartContext {
                dir,
                catalog_path: catalog.unwrap_or(config.catalog_path),
                pricing: config.pricing,
            };
            let output = commands::cart::run(&ctx, action).await?;

            #[allow(clippy::print_stdout)]
            {
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
    }
    Ok(())
}
