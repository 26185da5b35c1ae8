//! Category repository.

use sqlx::PgPool;

use flower_shop_core::{Category, CategoryId, ValidCategory};

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    slug: String,
    description: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r"
            SELECT id, name, slug, description
            FROM category
            ORDER BY name, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Whether a category with `id` exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM category WHERE id = $1)")
            .bind(id.as_i32())
            .fetch_one(self.pool)
            .await?;
        Ok(exists)
    }

    /// Whether the table has any rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn any(&self) -> Result<bool, RepositoryError> {
        let any: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM category)")
            .fetch_one(self.pool)
            .await?;
        Ok(any)
    }

    /// Insert a validated category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, category: &ValidCategory) -> Result<Category, RepositoryError> {
        let row: CategoryRow = sqlx::query_as(
            r"
            INSERT INTO category (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, description
            ",
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.description.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::conflict_on_unique(e, "A category with this slug already exists.")
        })?;

        tracing::info!(category_id = row.id, slug = %row.slug, "Category created");
        Ok(row.into())
    }
}
