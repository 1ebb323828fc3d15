//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL of the storefront (default: <http://localhost:3000>).
//!   An `https://` URL turns on secure session cookies.
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for session
//!   storage (falls back to `DATABASE_URL`; in-memory sessions when unset)
//! - `STOREFRONT_CATALOG_PATH` - Product catalog JSON file
//!   (default: crates/storefront/data/catalog.json)
//! - `STOREFRONT_FREE_SHIPPING_THRESHOLD` - Subtotal for free shipping
//!   (default: 50.00; empty disables free shipping)
//! - `STOREFRONT_SHIPPING_FEE` - Flat shipping fee (default: 5.00)
//! - `STOREFRONT_COUPONS` - Comma-separated `CODE:PERCENT` pairs
//! - `STOREFRONT_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use cartwheel_core::{CouponCode, PricingRules};
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Storefront application configuration.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// `PostgreSQL` connection URL for sessions (contains password)
    pub database_url: Option<SecretString>,
    /// Product catalog file
    pub catalog_path: PathBuf,
    /// Shipping and coupon rules
    pub pricing: PricingRules,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("catalog_path", &self.catalog_path)
            .field("pricing", &self.pricing)
            .field("log_format", &self.log_format)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let database_url = get_database_url("STOREFRONT_DATABASE_URL");
        let catalog_path = PathBuf::from(get_env_or_default(
            "STOREFRONT_CATALOG_PATH",
            "crates/storefront/data/catalog.json",
        ));
        let pricing = pricing_from_env()?;
        let log_format = parse_env("STOREFRONT_LOG_FORMAT", "pretty")?;

        Ok(Self {
            host,
            port,
            base_url,
            database_url,
            catalog_path,
            pricing,
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration for local development and tests: in-memory sessions,
    /// default pricing, no Sentry.
    #[must_use]
    pub fn local(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            database_url: None,
            catalog_path: catalog_path.into(),
            pricing: PricingRules::default(),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn pricing_from_env() -> Result<PricingRules, ConfigError> {
    let threshold = match std::env::var("STOREFRONT_FREE_SHIPPING_THRESHOLD") {
        Ok(value) if value.trim().is_empty() => None,
        Ok(value) => Some(parse_money("STOREFRONT_FREE_SHIPPING_THRESHOLD", &value)?),
        Err(_) => Some(Decimal::new(50, 0)),
    };
    let fee = parse_money(
        "STOREFRONT_SHIPPING_FEE",
        &get_env_or_default("STOREFRONT_SHIPPING_FEE", "5.00"),
    )?;

    let mut rules = PricingRules::new(threshold, fee);
    if let Some(raw) = get_optional_env("STOREFRONT_COUPONS") {
        for (code, percent) in parse_coupons(&raw)? {
            rules.add_coupon(code, percent).map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_COUPONS".to_string(), e.to_string())
            })?;
        }
    }
    Ok(rules)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse `CODE:PERCENT,CODE:PERCENT`. Empty entries are skipped.
fn parse_coupons(raw: &str) -> Result<Vec<(CouponCode, u8)>, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("STOREFRONT_COUPONS".to_string(), msg);

    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (code, percent) = entry
                .split_once(':')
                .ok_or_else(|| invalid(format!("expected CODE:PERCENT, got '{entry}'")))?;
            let code = CouponCode::parse(code).map_err(|e| invalid(e.to_string()))?;
            let percent = percent
                .trim()
                .parse::<u8>()
                .map_err(|e| invalid(format!("{code}: {e}")))?;
            Ok((code, percent))
        })
        .collect()
}

/// Parse a non-negative decimal amount.
fn parse_money(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    let amount = Decimal::from_str(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(amount)
}

/// Parse an environment variable with a default value.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map(SecretString::from)
}

/// Get an optional, non-empty environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coupons() {
        let coupons = parse_coupons("save10:10, half:50,,").unwrap();
        assert_eq!(coupons.len(), 2);
        assert_eq!(coupons[0].0.as_str(), "SAVE10");
        assert_eq!(coupons[0].1, 10);
        assert_eq!(coupons[1].0.as_str(), "HALF");
        assert_eq!(coupons[1].1, 50);
    }

    #[test]
    fn test_parse_coupons_missing_percent() {
        let err = parse_coupons("SAVE10").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_parse_coupons_bad_percent() {
        assert!(parse_coupons("SAVE:lots").is_err());
        assert!(parse_coupons("SAVE:300").is_err());
    }

    #[test]
    fn test_parse_coupons_bad_code() {
        assert!(parse_coupons("10% OFF:10").is_err());
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("K", " 5.00 ").unwrap(), Decimal::new(500, 2));
        assert!(parse_money("K", "-1").is_err());
        assert!(parse_money("K", "five").is_err());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig::local("catalog.json");
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = StorefrontConfig::local("catalog.json");
        config.database_url = Some(SecretString::from("postgres://user:hunter2@db/cartwheel"));
        config.sentry_dsn = Some("https://key@sentry.example/1".to_string());

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
        assert!(!debug_output.contains("key@sentry"));
    }
}
