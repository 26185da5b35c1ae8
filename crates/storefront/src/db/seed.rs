//! Demo catalog for development databases.

use rust_decimal::Decimal;
use sqlx::PgPool;

use flower_shop_core::ProductType;

use super::{CategoryRepository, RepositoryError};

/// What [`seed_demo_catalog`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The catalog already had categories; nothing was written.
    Skipped,
    Inserted { categories: usize, products: usize },
}

struct DemoProduct {
    name: &'static str,
    description: &'static str,
    /// Price in cents.
    cents: i64,
    stock: i32,
    /// Index into [`CATEGORIES`].
    category: usize,
    product_type: ProductType,
    image: &'static str,
}

const CATEGORIES: [(&str, &str, &str); 6] = [
    ("Roses", "roses", "Beautiful roses in various colors"),
    ("Tulips", "tulips", "Elegant tulips for any occasion"),
    ("Lilies", "lilies", "Fragrant lilies"),
    ("Mixed Bouquets", "mixed-bouquets", "Mixed flower arrangements"),
    ("Wedding Compositions", "wedding-compositions", "Special wedding arrangements"),
    ("Funeral Compositions", "funeral-compositions", "Sympathy arrangements"),
];

const PRODUCTS: [DemoProduct; 8] = [
    DemoProduct {
        name: "Red Roses Bouquet",
        description: "A beautiful bouquet of 12 red roses",
        cents: 4599,
        stock: 50,
        category: 0,
        product_type: ProductType::Bouquet,
        image: "red-roses.jpg",
    },
    DemoProduct {
        name: "White Lilies",
        description: "Elegant white lilies",
        cents: 3599,
        stock: 30,
        category: 2,
        product_type: ProductType::Flower,
        image: "white-lilies.jpg",
    },
    DemoProduct {
        name: "Spring Tulip Mix",
        description: "Colorful mix of spring tulips",
        cents: 2899,
        stock: 40,
        category: 1,
        product_type: ProductType::Bouquet,
        image: "tulips.jpg",
    },
    DemoProduct {
        name: "Wedding Centerpiece",
        description: "Elegant wedding table centerpiece",
        cents: 12000,
        stock: 15,
        category: 4,
        product_type: ProductType::Composition,
        image: "wedding-centerpiece.jpg",
    },
    DemoProduct {
        name: "Pink Roses",
        description: "Delicate pink roses",
        cents: 3899,
        stock: 35,
        category: 0,
        product_type: ProductType::Flower,
        image: "pink-roses.jpg",
    },
    DemoProduct {
        name: "Mixed Spring Bouquet",
        description: "Fresh spring flowers mix",
        cents: 4299,
        stock: 25,
        category: 3,
        product_type: ProductType::Bouquet,
        image: "spring-bouquet.jpg",
    },
    DemoProduct {
        name: "Sympathy Wreath",
        description: "Respectful funeral arrangement",
        cents: 8500,
        stock: 20,
        category: 5,
        product_type: ProductType::Composition,
        image: "sympathy-wreath.jpg",
    },
    DemoProduct {
        name: "Yellow Roses",
        description: "Bright yellow roses",
        cents: 3699,
        stock: 30,
        category: 0,
        product_type: ProductType::Flower,
        image: "yellow-roses.jpg",
    },
];

/// Insert the demo categories and products if the catalog is empty.
///
/// Runs in one transaction, so a failure leaves the database untouched.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any statement fails.
pub async fn seed_demo_catalog(pool: &PgPool) -> Result<SeedOutcome, RepositoryError> {
    if CategoryRepository::new(pool).any().await? {
        tracing::info!("Catalog already has categories, skipping seed");
        return Ok(SeedOutcome::Skipped);
    }

    let mut tx = pool.begin().await?;

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, slug, description) in CATEGORIES {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO category (name, slug, description) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;
        category_ids.push(id);
    }

    for product in &PRODUCTS {
        let category_id = category_ids.get(product.category).copied().ok_or_else(|| {
            RepositoryError::DataCorruption(format!("demo product {} has no category", product.name))
        })?;

        sqlx::query(
            r"
            INSERT INTO product
                (name, description, price, stock_quantity, image_url, category_id, product_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(Decimal::new(product.cents, 2))
        .bind(product.stock)
        .bind(format!("/images/{}", product.image))
        .bind(category_id)
        .bind(product.product_type.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let outcome = SeedOutcome::Inserted {
        categories: CATEGORIES.len(),
        products: PRODUCTS.len(),
    };
    tracing::info!(?outcome, "Demo catalog seeded");
    Ok(outcome)
}
