//! Forum post repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use flower_shop_core::{ForumCategory, ForumPost, ForumPostId, NewForumPost};

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct ForumPostRow {
    id: i32,
    title: String,
    content: Option<String>,
    category: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ForumPostRow> for ForumPost {
    type Error = RepositoryError;

    fn try_from(row: ForumPostRow) -> Result<Self, Self::Error> {
        let category = row.category.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "forum post {}: unknown category {:?}",
                row.id, row.category
            ))
        })?;

        Ok(Self {
            id: ForumPostId::new(row.id),
            title: row.title,
            content: row.content,
            category,
            created_at: row.created_at,
        })
    }
}

/// Repository for forum post database operations.
pub struct ForumRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ForumRepository<'a> {
    /// Create a new forum repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Posts newest first, optionally limited to one board.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category: Option<ForumCategory>,
    ) -> Result<Vec<ForumPost>, RepositoryError> {
        let rows: Vec<ForumPostRow> = sqlx::query_as(
            r"
            SELECT id, title, content, category, created_at
            FROM forum_post
            WHERE $1::text IS NULL OR category = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(category.map(|c| c.as_str()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ForumPost::try_from).collect()
    }

    /// Insert a validated post; the server assigns `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, post: &NewForumPost) -> Result<ForumPost, RepositoryError> {
        let row: ForumPostRow = sqlx::query_as(
            r"
            INSERT INTO forum_post (title, content, category)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, category, created_at
            ",
        )
        .bind(&post.title)
        .bind(post.content.as_deref())
        .bind(post.category.as_str())
        .fetch_one(self.pool)
        .await?;

        tracing::info!(post_id = row.id, category = %row.category, "Forum post created");
        ForumPost::try_from(row)
    }
}
