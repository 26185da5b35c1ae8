//! Seed the database with the demo catalog.

use flower_shop_storefront::db::{
    self,
    seed::{SeedOutcome, seed_demo_catalog},
};

use super::{CliError, database_url};

/// Insert demo categories and products into an empty catalog.
///
/// # Errors
///
/// Returns an error if the database URL is missing or any insert fails.
pub async fn run() -> Result<(), CliError> {
    let pool = db::create_pool(&database_url()?).await?;

    match seed_demo_catalog(&pool).await? {
        SeedOutcome::Skipped => tracing::info!("Catalog is not empty; nothing seeded"),
        SeedOutcome::Inserted {
            categories,
            products,
        } => tracing::info!("Seeded {categories} categories and {products} products"),
    }
    Ok(())
}
