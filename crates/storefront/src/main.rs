//! Flower Shop Storefront - JSON API for the flower shop front end.
//!
//! This binary serves the storefront API on port 5000.
//!
//! # Architecture
//!
//! - Axum web framework serving JSON to a browser front end
//! - `PostgreSQL` for the catalog and forum
//! - SMTP (lettre) for contact form delivery
//!
//! Migrations are NOT run on startup. Run them explicitly via
//! `cargo run -p flower-shop-cli -- migrate`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Method, Request, header};
use axum::middleware as axum_middleware;
use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flower_shop_storefront::{
    config::{ConfigError, StorefrontConfig},
    db::{self, RepositoryError, seed::seed_demo_catalog},
    middleware::{REQUEST_ID_HEADER, request_id_middleware, write_rate_limiter},
    routes,
    services::email::EmailError,
    state::AppState,
};

/// Failures that stop the server from starting.
#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("demo seed failed: {0}")]
    Seed(#[from] RepositoryError),

    #[error("email setup failed: {0}")]
    Email(#[from] EmailError),

    #[error("invalid CORS origin: {0}")]
    CorsOrigin(String),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// CORS for the configured front-end origin.
fn cors_layer(origin: &str) -> Result<CorsLayer, StartupError> {
    let origin = HeaderValue::from_str(origin.trim_end_matches('/'))
        .map_err(|_| StartupError::CorsOrigin(origin.to_string()))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([header::LOCATION, HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(3600)))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Configuration is needed before Sentry, so report failures to stderr
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("flower-shop-storefront: {e}");
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "flower_shop_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Storefront failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: StorefrontConfig) -> Result<(), StartupError> {
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    if config.seed_on_start {
        seed_demo_catalog(&pool).await?;
    }

    let addr = config.socket_addr();
    let cors = cors_layer(&config.cors_origin)?;
    let state = AppState::new(&config, pool)?;

    let write_limiter = write_rate_limiter();
    if write_limiter.is_none() {
        tracing::warn!("Write rate limiter could not be built; running without it");
    }

    let app = routes::routes(write_limiter.as_ref())
        .with_state(state)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!("storefront listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
