//! Command implementations.
//!
//! Database commands (`migrate`, `seed`) connect to `PostgreSQL` directly.
//! Everything else goes through the storefront API with [`ShopClient`].

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod contact;
pub mod forum;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

use flower_shop_client::{ApiError, ShopClient};
use flower_shop_core::ValidationError;
use flower_shop_storefront::db::RepositoryError;

const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    /// The request was well-formed but could not be completed.
    #[error("{0}")]
    Failed(String),
}

/// Load `.env` and read an environment variable; blank counts as unset.
fn env_var(key: &str) -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Database URL for commands that talk to `PostgreSQL` directly.
fn database_url() -> Result<SecretString, CliError> {
    env_var("STOREFRONT_DATABASE_URL")
        .or_else(|| env_var("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or(CliError::MissingEnvVar("STOREFRONT_DATABASE_URL"))
}

/// API client for `FLOWER_SHOP_API_URL`.
fn api_client() -> Result<ShopClient, CliError> {
    let base = env_var("FLOWER_SHOP_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    tracing::debug!(%base, "Using storefront API");
    Ok(ShopClient::new(&base)?)
}
