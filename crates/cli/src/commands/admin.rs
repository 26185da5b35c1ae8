//! Catalog administration commands.
//!
//! These go through the API like the admin entry form, so the server applies
//! its own validation and cache invalidation.

use flower_shop_core::{NewCategory, NewProduct};

use super::{CliError, api_client, catalog::product_row};

/// Create a category.
///
/// # Errors
///
/// Returns `CliError::Validation` for a blank name, or an API error such as a
/// duplicate slug.
pub async fn create_category(name: String, description: Option<String>) -> Result<(), CliError> {
    let category = NewCategory {
        name,
        description,
        slug: None,
    };
    category.validate()?;

    let created = api_client()?.create_category(&category).await?;
    tracing::info!(id = %created.id, slug = %created.slug, "Category created");
    Ok(())
}

/// Create a product.
///
/// # Errors
///
/// Returns `CliError::Validation` for invalid fields, or an API error if the
/// category does not exist.
pub async fn create_product(product: &NewProduct) -> Result<(), CliError> {
    product.validate()?;

    let created = api_client()?.create_product(product).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Created: {}", product_row(&created));
    }
    Ok(())
}
