//! Forum route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use flower_shop_core::{ForumCategory, ForumPost, NewForumPost};

use crate::db::ForumRepository;
use crate::error::{Result, add_breadcrumb};
use crate::routes::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PostParams {
    pub category: Option<String>,
}

impl PostParams {
    /// The board to filter on; an unrecognised value means all boards.
    fn board(&self) -> Option<ForumCategory> {
        self.category.as_deref().and_then(|c| c.parse().ok())
    }
}

/// List posts newest first.
///
/// GET /api/forum/posts?category=
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PostParams>,
) -> Result<Json<Vec<ForumPost>>> {
    let posts = ForumRepository::new(state.pool())
        .list(params.board())
        .await?;
    Ok(Json(posts))
}

/// Create a post.
///
/// POST /api/forum/posts
#[instrument(skip(state, body), fields(category = %body.category))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewForumPost>,
) -> Result<(StatusCode, Json<ForumPost>)> {
    let post = body.validate()?;
    let created = ForumRepository::new(state.pool()).create(&post).await?;

    add_breadcrumb(
        "forum",
        "Forum post created",
        &[("post_id", created.id.to_string())],
    );

    Ok((StatusCode::CREATED, Json(created)))
}
