//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 5000)
//! - `STOREFRONT_CORS_ORIGIN` - Front-end origin allowed by CORS (default: <http://localhost:4200>)
//! - `STOREFRONT_SEED_ON_START` - Insert the demo catalog when the database is empty (default: false)
//! - `SHOP_EMAIL_ENABLED` - Deliver contact messages over SMTP (default: false)
//! - `SMTP_HOST` - SMTP server hostname (default: localhost)
//! - `SMTP_PORT` - SMTP port (default: 25)
//! - `SMTP_STARTTLS` - Upgrade the connection with STARTTLS (default: false)
//! - `SMTP_USERNAME` / `SMTP_PASSWORD` - SMTP credentials
//! - `SHOP_EMAIL_TO` - Where contact messages go (default: owner@example.com)
//! - `SHOP_EMAIL_FROM` - Sender address (default: no-reply@example.com)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origin of the browser front end, e.g. `http://localhost:4200`
    pub cors_origin: String,
    /// Seed the demo catalog on startup
    pub seed_on_start: bool,
    /// Contact email delivery
    pub email: EmailConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// SMTP settings for contact form delivery.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// When false, contact messages are logged and reported as queued
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub starttls: bool,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<SecretString>,
    /// Shop inbox that receives contact messages
    pub to_address: String,
    /// Sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("enabled", &self.enabled)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("starttls", &self.starttls)
            .field("smtp_username", &self.smtp_username)
            .field(
                "smtp_password",
                &self.smtp_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("to_address", &self.to_address)
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Vars(&var);

        let database_url = env
            .optional("STOREFRONT_DATABASE_URL")
            .or_else(|| env.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("STOREFRONT_DATABASE_URL".to_string()))?;

        let host = env.parse_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parse_or("STOREFRONT_PORT", 5000)?;

        let cors_origin = env.or_default("STOREFRONT_CORS_ORIGIN", "http://localhost:4200");
        validate_origin(&cors_origin)?;

        let sentry_sample_rate = env.parse_or("SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = env.parse_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?;

        Ok(Self {
            database_url,
            host,
            port,
            cors_origin,
            seed_on_start: env.flag("STOREFRONT_SEED_ON_START")?,
            email: EmailConfig::from_vars(&env)?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EmailConfig {
    fn from_vars(env: &Vars<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            enabled: env.flag("SHOP_EMAIL_ENABLED")?,
            smtp_host: env.or_default("SMTP_HOST", "localhost"),
            smtp_port: env.parse_or("SMTP_PORT", 25)?,
            starttls: env.flag("SMTP_STARTTLS")?,
            smtp_username: env.optional("SMTP_USERNAME"),
            smtp_password: env.optional("SMTP_PASSWORD").map(SecretString::from),
            to_address: env.or_default("SHOP_EMAIL_TO", "owner@example.com"),
            from_address: env.or_default("SHOP_EMAIL_FROM", "no-reply@example.com"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Get an optional variable; blank counts as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Booleans accept `true/false`, `1/0`, `yes/no`.
    fn flag(&self, key: &str) -> Result<bool, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(false);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got {other:?}"),
            )),
        }
    }
}

fn validate_origin(origin: &str) -> Result<(), ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("STOREFRONT_CORS_ORIGIN".to_string(), msg);
    let url = Url::parse(origin).map_err(|e| invalid(e.to_string()))?;
    if url.host_str().is_none() {
        return Err(invalid("origin must include a host".to_string()));
    }
    Ok(())
}
