//! Integration tests for the Flower Shop.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, then migrate, seed and run the API
//! cargo run -p flower-shop-cli -- migrate
//! cargo run -p flower-shop-cli -- seed
//! cargo run -p flower-shop-storefront
//!
//! # Run the ignored tests against it
//! cargo test -p flower-shop-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_api` - HTTP API tests (need a running server, ignored by default)
//! - `cart_storage` - File-backed cart tests (run everywhere)

use flower_shop_client::ShopClient;

/// Base URL of the storefront under test.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_TEST_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// API client for the storefront under test.
///
/// # Panics
///
/// Panics if `STOREFRONT_TEST_URL` is not a valid URL.
#[must_use]
#[allow(clippy::expect_used)]
pub fn shop_client() -> ShopClient {
    ShopClient::new(&storefront_base_url()).expect("STOREFRONT_TEST_URL must be a valid URL")
}

/// A name no other test run will have used.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix} {}", uuid::Uuid::new_v4().simple())
}
