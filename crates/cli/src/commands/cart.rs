//! Local cart commands.
//!
//! The cart lives in `FLOWER_SHOP_DATA_DIR` (default `.flower-shop`) so it
//! survives between invocations.

use std::fmt::Write as _;
use std::path::PathBuf;

use flower_shop_client::{CartStore, FileStorage, SlotStorage};
use flower_shop_core::ProductId;

use super::{CliError, api_client, env_var};

const DEFAULT_DATA_DIR: &str = ".flower-shop";

/// Open the file-backed cart.
pub fn open() -> CartStore<FileStorage> {
    let dir = env_var("FLOWER_SHOP_DATA_DIR").map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
    let storage = FileStorage::new(dir);
    tracing::debug!(dir = %storage.dir().display(), "Opening cart");
    CartStore::open(storage)
}

/// Fetch the product from the API and add it to the cart.
///
/// # Errors
///
/// Returns `CliError::NotFound` if the product does not exist, or an API
/// error if the request fails.
pub async fn add<S: SlotStorage>(
    cart: &mut CartStore<S>,
    id: ProductId,
    quantity: i64,
) -> Result<(), CliError> {
    let product = api_client()?
        .product(id)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("Product {id} not found")))?;

    if product.stock_quantity == 0 {
        tracing::warn!(product_id = %id, "Product is out of stock; cart unchanged");
    }
    cart.add(&product, quantity);
    Ok(())
}

/// Print the cart.
pub fn show<S: SlotStorage>(cart: &CartStore<S>) {
    #[allow(clippy::print_stdout)]
    {
        print!("{}", summary(cart));
    }
}

/// Text rendering of the cart: one row per line, then the totals.
pub fn summary<S: SlotStorage>(cart: &CartStore<S>) -> String {
    if cart.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut out = String::new();
    for line in cart.lines() {
        let _ = writeln!(
            out,
            "{:>4}  {:<28} x{:<3} {:>10}",
            line.product.id.as_i32(),
            line.product.name,
            line.quantity,
            format!("${:.2}", line.line_total()),
        );
    }
    let _ = writeln!(
        out,
        "{} item(s), total ${:.2}",
        cart.total_items(),
        cart.total_price()
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flower_shop_client::MemoryStorage;
    use flower_shop_core::{CategoryId, Price, Product, ProductType};
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Bouquet {id}"),
            description: None,
            price: Price::new(Decimal::new(cents, 2)).unwrap(),
            stock_quantity: 10,
            image_url: None,
            category_id: CategoryId::new(1),
            category: None,
            product_type: ProductType::Bouquet,
        }
    }

    #[test]
    fn test_empty_summary() {
        let cart = CartStore::open(MemoryStorage::new());
        assert_eq!(summary(&cart), "Your cart is empty.\n");
    }

    #[test]
    fn test_summary_totals() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add(&product(1, 1000), 2);
        cart.add(&product(2, 550), 1);

        let text = summary(&cart);
        assert!(text.contains("Bouquet 1"));
        assert!(text.contains("$20.00"));
        assert!(text.ends_with("3 item(s), total $25.50\n"));
    }

    #[test]
    fn test_cart_survives_reopen_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();

        let mut cart = CartStore::open(FileStorage::new(dir.path()));
        cart.add(&product(4, 1299), 3);
        drop(cart);

        let cart = CartStore::open(FileStorage::new(dir.path()));
        assert_eq!(cart.quantity_of(ProductId::new(4)), 3);
        assert_eq!(cart.storage().dir(), dir.path());
    }
}
