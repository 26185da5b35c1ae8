//! Database operations for the storefront `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `category` - Product categories (unique slug)
//! - `product` - Catalog items, each in one category
//! - `forum_post` - Community forum posts
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p flower-shop-cli -- migrate
//! ```
//!
//! Queries are built at runtime with `sqlx::query_as` and `QueryBuilder`, so
//! the crate builds without a live database.

pub mod categories;
pub mod forum;
pub mod products;
pub mod seed;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use forum::ForumRepository;
pub use products::ProductRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate category slug).
    #[error("{0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique violation to [`RepositoryError::Conflict`] with `message`.
    pub(crate) fn conflict_on_unique(e: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    pool_options().connect(database_url.expose_secret()).await
}

/// Create a pool that connects on first use.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL cannot be parsed.
pub fn create_lazy_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    pool_options().connect_lazy(database_url.expose_secret())
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
}

/// Escape `%`, `_` and `\` so `term` matches literally inside `LIKE`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rose"), "%rose%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
