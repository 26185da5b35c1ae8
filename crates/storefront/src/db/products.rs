//! Product repository.
//!
//! Products are always read together with their category so responses can
//! embed it.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use flower_shop_core::{
    Category, CategoryId, Price, Product, ProductId, ProductQuery, SortKey, ValidProduct,
};

use super::{RepositoryError, like_pattern};

const SELECT_PRODUCT: &str = r"
    SELECT p.id, p.name, p.description, p.price, p.stock_quantity, p.image_url,
           p.category_id, p.product_type,
           c.name AS category_name, c.slug AS category_slug,
           c.description AS category_description
    FROM product p
    JOIN category c ON c.id = p.category_id
";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    stock_quantity: i32,
    image_url: Option<String>,
    category_id: i32,
    product_type: String,
    category_name: String,
    category_slug: String,
    category_description: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let corrupt = |what: String| {
            RepositoryError::DataCorruption(format!("product {}: {what}", row.id))
        };

        let price = Price::new(row.price).map_err(|e| corrupt(e.to_string()))?;
        let stock_quantity = u32::try_from(row.stock_quantity)
            .map_err(|_| corrupt(format!("negative stock {}", row.stock_quantity)))?;
        let product_type = row
            .product_type
            .parse()
            .map_err(|_| corrupt(format!("unknown type {:?}", row.product_type)))?;

        let category_id = CategoryId::new(row.category_id);
        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price,
            stock_quantity,
            image_url: row.image_url,
            category_id,
            category: Some(Category {
                id: category_id,
                name: row.category_name,
                slug: row.category_slug,
                description: row.category_description,
            }),
            product_type,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Products matching every filter in `query`, in the requested order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row violates the domain rules.
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let mut builder = list_query(query);
        let rows: Vec<ProductRow> = builder.build_query_as().fetch_all(self.pool).await?;
        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row violates the domain rules.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE p.id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Insert a validated product and return it with its category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category disappeared
    /// between validation and insert.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, product: &ValidProduct) -> Result<Product, RepositoryError> {
        let stock = i32::try_from(product.stock_quantity).map_err(|_| {
            RepositoryError::DataCorruption("stock quantity exceeds column range".to_owned())
        })?;

        let sql = format!(
            r"
            WITH p AS (
                INSERT INTO product
                    (name, description, price, stock_quantity, image_url, category_id, product_type)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            {}
            ",
            SELECT_PRODUCT.replace("FROM product p", "FROM p")
        );

        let row: ProductRow = sqlx::query_as(&sql)
            .bind(&product.name)
            .bind(product.description.as_deref())
            .bind(product.price.amount())
            .bind(stock)
            .bind(product.image_url.as_deref())
            .bind(product.category_id.as_i32())
            .bind(product.product_type.as_str())
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::NotFound;
                }
                RepositoryError::Database(e)
            })?;

        tracing::info!(product_id = row.id, name = %row.name, "Product created");
        Product::try_from(row)
    }
}

/// Build the listing query for `query`.
fn list_query(query: &ProductQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_PRODUCT);
    builder.push(" WHERE TRUE");

    if let Some(term) = query.search_term() {
        let pattern = like_pattern(term);
        builder
            .push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(category_id) = query.category_id {
        builder
            .push(" AND p.category_id = ")
            .push_bind(category_id.as_i32());
    }

    if let Some(category) = query.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        builder
            .push(" AND (c.slug = ")
            .push_bind(category.to_ascii_lowercase())
            .push(" OR c.name = ")
            .push_bind(category.to_owned())
            .push(")");
    }

    if let Some(product_type) = query.product_type {
        builder
            .push(" AND p.product_type = ")
            .push_bind(product_type.as_str());
    }

    builder.push(match query.sort {
        SortKey::PriceAscending => " ORDER BY p.price ASC, p.id ASC",
        SortKey::PriceDescending => " ORDER BY p.price DESC, p.id ASC",
        SortKey::Name => " ORDER BY p.name ASC, p.id ASC",
        SortKey::Default => " ORDER BY p.id ASC",
    });

    builder
}

#[cfg(test)]
mod tests {
    use flower_shop_core::ProductType;

    use super::*;

    fn sql(query: &ProductQuery) -> String {
        list_query(query).sql().to_owned()
    }

    #[test]
    fn test_unfiltered_listing_orders_by_id() {
        let sql = sql(&ProductQuery::default());
        assert!(sql.contains("WHERE TRUE ORDER BY p.id ASC"));
        assert!(!sql.contains('$'));
    }

    #[test]
    fn test_filters_are_bound() {
        let query = ProductQuery {
            search: Some(" rose ".into()),
            category_id: Some(CategoryId::new(2)),
            category: Some("Roses".into()),
            product_type: Some(ProductType::Bouquet),
            sort: SortKey::PriceDescending,
        };
        let sql = sql(&query);

        assert!(sql.contains("p.name ILIKE $1 OR p.description ILIKE $2"));
        assert!(sql.contains("p.category_id = $3"));
        assert!(sql.contains("c.slug = $4 OR c.name = $5"));
        assert!(sql.contains("p.product_type = $6"));
        assert!(sql.ends_with("ORDER BY p.price DESC, p.id ASC"));
    }

    #[test]
    fn test_blank_search_adds_no_filter() {
        let query = ProductQuery {
            search: Some("   ".into()),
            sort: SortKey::Name,
            ..ProductQuery::default()
        };
        let sql = sql(&query);
        assert!(!sql.contains("ILIKE"));
        assert!(sql.ends_with("ORDER BY p.name ASC, p.id ASC"));
    }
}
