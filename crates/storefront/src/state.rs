//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use flower_shop_core::Category;

use crate::config::StorefrontConfig;
use crate::services::email::{ContactMailer, EmailError};

/// Cache key for the full category list.
const ALL_CATEGORIES: &str = "all";

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool, mailer and category cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: PgPool,
    mailer: ContactMailer,
    categories: Cache<&'static str, Arc<Vec<Category>>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the email configuration is invalid.
    pub fn new(config: &StorefrontConfig, pool: PgPool) -> Result<Self, EmailError> {
        let mailer = ContactMailer::new(&config.email)?;
        let categories = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                pool,
                mailer,
                categories,
            }),
        })
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the contact mailer.
    #[must_use]
    pub fn mailer(&self) -> &ContactMailer {
        &self.inner.mailer
    }

    /// Cached category list, if present and fresh.
    pub async fn cached_categories(&self) -> Option<Arc<Vec<Category>>> {
        self.inner.categories.get(ALL_CATEGORIES).await
    }

    pub async fn cache_categories(&self, categories: Arc<Vec<Category>>) {
        self.inner.categories.insert(ALL_CATEGORIES, categories).await;
    }

    /// Drop the cached category list after a write.
    pub async fn invalidate_categories(&self) {
        self.inner.categories.invalidate(ALL_CATEGORIES).await;
    }
}
