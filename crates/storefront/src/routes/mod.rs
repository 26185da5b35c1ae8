//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/health             - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Catalog
//! GET  /api/products           - Product listing (search, filters, sort)
//! GET  /api/products/{id}      - Product detail
//! POST /api/products           - Create product (rate limited)
//! GET  /api/categories         - Category listing (cached)
//! POST /api/categories         - Create category (rate limited)
//!
//! # Contact
//! POST /api/contact            - Send a message to the shop (rate limited)
//!
//! # Forum
//! GET  /api/forum/posts        - Posts newest first, optional ?category=
//! POST /api/forum/posts        - Create post (rate limited)
//! ```

pub mod categories;
pub mod contact;
pub mod extract;
pub mod forum;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{MethodRouter, get, post},
};

use crate::middleware::rate_limit::RateLimiterLayer;
use crate::state::AppState;

/// Apply the write limiter to a method router when one is configured.
fn limited(
    route: MethodRouter<AppState>,
    limiter: Option<&RateLimiterLayer>,
) -> MethodRouter<AppState> {
    match limiter {
        Some(limiter) => route.layer(limiter.clone()),
        None => route,
    }
}

/// Create the catalog routes router.
fn catalog_routes(limiter: Option<&RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(products::index).merge(limited(post(products::create), limiter)),
        )
        .route("/products/{id}", get(products::show))
        .route(
            "/categories",
            get(categories::index).merge(limited(post(categories::create), limiter)),
        )
}

/// Create the forum routes router.
fn forum_routes(limiter: Option<&RateLimiterLayer>) -> Router<AppState> {
    Router::new().route(
        "/posts",
        get(forum::index).merge(limited(post(forum::create), limiter)),
    )
}

/// Create all routes for the storefront.
///
/// `write_limiter` guards every POST endpoint; pass `None` to disable rate
/// limiting (tests, local tooling).
pub fn routes(write_limiter: Option<&RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", catalog_routes(write_limiter))
        .route(
            "/api/contact",
            limited(post(contact::submit), write_limiter),
        )
        .nest("/api/forum", forum_routes(write_limiter))
}
