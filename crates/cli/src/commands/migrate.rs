//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! # Create the tower-sessions table
//! cartwheel migrate sessions
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use cartwheel_storefront::config::{ConfigError, StorefrontConfig};
use cartwheel_storefront::db;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors from migration commands.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the session table used by the storefront's `PostgreSQL` session store.
///
/// Safe to run repeatedly.
///
/// # Errors
///
/// Returns an error if no database is configured or the migration fails.
pub async fn sessions() -> Result<(), MigrationError> {
    let config = StorefrontConfig::from_env()?;
    let database_url = config
        .database_url
        .as_ref()
        .ok_or(MigrationError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(database_url).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Session migration complete!");
    Ok(())
}
