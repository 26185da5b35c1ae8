//! Category route handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use flower_shop_core::{Category, NewCategory};

use crate::db::CategoryRepository;
use crate::error::{Result, add_breadcrumb};
use crate::routes::extract::ApiJson;
use crate::state::AppState;

/// List categories ordered by name.
///
/// GET /api/categories
///
/// Served from the in-process cache when fresh.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Arc<Vec<Category>>>> {
    if let Some(categories) = state.cached_categories().await {
        return Ok(Json(categories));
    }

    let categories = Arc::new(CategoryRepository::new(state.pool()).list().await?);
    state.cache_categories(Arc::clone(&categories)).await;
    Ok(Json(categories))
}

/// Create a category.
///
/// POST /api/categories
#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewCategory>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = body.validate()?;
    let created = CategoryRepository::new(state.pool())
        .create(&category)
        .await?;
    state.invalidate_categories().await;

    add_breadcrumb(
        "catalog",
        "Category created",
        &[
            ("category_id", created.id.to_string()),
            ("slug", created.slug.clone()),
        ],
    );

    Ok((StatusCode::CREATED, Json(created)))
}
