//! Catalog browsing commands.

use flower_shop_core::{Product, ProductId, ProductQuery};

use super::{CliError, api_client};

/// One listing row: id, name, type, price, stock.
pub fn product_row(product: &Product) -> String {
    format!(
        "{:>4}  {:<28} {:<12} {:>8}  {:>4} in stock",
        product.id.as_i32(),
        product.name,
        product.product_type.as_str(),
        product.price.to_string(),
        product.stock_quantity
    )
}

/// List products matching `query`.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn products(query: &ProductQuery) -> Result<(), CliError> {
    let products = api_client()?.products(query).await?;

    #[allow(clippy::print_stdout)]
    {
        if products.is_empty() {
            println!("No products found.");
        }
        for product in &products {
            println!("{}", product_row(product));
        }
    }
    Ok(())
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns `CliError::NotFound` if the product does not exist.
pub async fn product(id: ProductId) -> Result<(), CliError> {
    let product = api_client()?
        .product(id)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("Product {id} not found")))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", product.name);
        println!("  Price:    {}", product.price);
        println!("  Type:     {}", product.product_type);
        println!("  Stock:    {}", product.stock_quantity);
        if let Some(category) = &product.category {
            println!("  Category: {} ({})", category.name, category.slug);
        }
        if let Some(description) = &product.description {
            println!("  {description}");
        }
    }
    Ok(())
}

/// List categories.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn categories() -> Result<(), CliError> {
    let categories = api_client()?.categories().await?;

    #[allow(clippy::print_stdout)]
    for category in &categories {
        println!("{:>4}  {:<24} {}", category.id.as_i32(), category.name, category.slug);
    }
    Ok(())
}
