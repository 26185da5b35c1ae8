//! Product catalog route handlers.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
};
use serde::Deserialize;
use tracing::instrument;

use flower_shop_core::{
    CategoryId, NewProduct, Product, ProductId, ProductQuery, SortKey, ValidationError,
};

use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// Raw query string of `GET /api/products`.
///
/// Everything arrives as text so that a bad `type` or `sort` token can be
/// ignored instead of rejecting the whole request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductParams {
    #[serde(alias = "q")]
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub sort: Option<String>,
}

impl ProductParams {
    /// Convert to a catalog query.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` when `categoryId` is present but not a
    /// number.
    pub fn into_query(self) -> Result<ProductQuery> {
        let category_id = match self.category_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<CategoryId>().map_err(|_| {
                AppError::BadRequest(format!("Invalid categoryId: {raw}"))
            })?),
        };

        Ok(ProductQuery {
            search: self.search,
            category_id,
            category: self.category,
            product_type: self
                .product_type
                .as_deref()
                .and_then(|t| t.parse().ok()),
            sort: self
                .sort
                .as_deref()
                .map_or(SortKey::Default, SortKey::from_token),
        })
    }
}

/// List products.
///
/// GET /api/products?search=&categoryId=&category=&type=&sort=
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProductParams>,
) -> Result<Json<Vec<Product>>> {
    let query = params.into_query()?;
    let products = ProductRepository::new(state.pool()).list(&query).await?;
    tracing::debug!(count = products.len(), "Products listed");
    Ok(Json(products))
}

/// Show one product.
///
/// GET /api/products/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))
}

/// Create a product from the admin entry form.
///
/// POST /api/products
#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewProduct>,
) -> Result<(StatusCode, HeaderMap, Json<Product>)> {
    let product = body.validate()?;

    if !CategoryRepository::new(state.pool())
        .exists(product.category_id)
        .await?
    {
        return Err(ValidationError::UnknownCategory.into());
    }

    let created = ProductRepository::new(state.pool()).create(&product).await?;

    add_breadcrumb(
        "catalog",
        "Product created",
        &[
            ("product_id", created.id.to_string()),
            ("category_id", created.category_id.to_string()),
        ],
    );

    Ok((
        StatusCode::CREATED,
        location(&format!("/api/products/{}", created.id)),
        Json(created),
    ))
}

/// `Location` header for a newly created resource.
fn location(path: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(path) {
        headers.insert(header::LOCATION, value);
    }
    headers
}
