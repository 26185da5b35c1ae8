//! Async client for the storefront JSON API.
//!
//! Error bodies from the server have the shape `{"error": "..."}`; their
//! message is surfaced through [`ApiError::Rejected`] or
//! [`ApiError::Server`] so callers can show it verbatim.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use flower_shop_core::{
    Category, ContactReceipt, ContactRequest, ContactStatus, ForumCategory, ForumPost,
    NewCategory, NewForumPost, NewProduct, Product, ProductId, ProductQuery,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request was refused (4xx). `message` is the server's explanation.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// The server failed to handle the request (5xx).
    #[error("server error ({status}): {message}")]
    Server { status: StatusCode, message: String },

    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(StatusCode::TOO_MANY_REQUESTS),
            Self::Http(e) => e.status(),
            Self::Url(_) | Self::Parse(_) => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Result of submitting the contact form.
///
/// Only `Rejected` means the input needs to change; `Failed` is worth a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    Delivered(ContactStatus),
    Rejected(String),
    Failed(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone, Debug)]
pub struct ShopClient {
    inner: Arc<ShopClientInner>,
}

#[derive(Debug)]
struct ShopClientInner {
    client: reqwest::Client,
    base: Url,
}

impl ShopClient {
    /// Create a client for the API rooted at `base_url`, e.g.
    /// `http://localhost:5000`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Url`] if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            inner: Arc::new(ShopClientInner {
                client: reqwest::Client::new(),
                base,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base.join(path)?)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url("api/products")?)
            .query(&query.to_query_pairs());
        execute(request).await
    }

    /// Fetch one product; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason other than 404.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url(&format!("api/products/{id}"))?);
        match execute(request).await {
            Ok(product) => Ok(Some(product)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let request = self.inner.client.get(self.url("api/categories")?);
        execute(request).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the server's message for invalid
    /// input or a duplicate slug.
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("api/categories")?)
            .json(category);
        execute(request).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the server's message for invalid
    /// input.
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("api/products")?)
            .json(product);
        execute(request).await
    }

    // =========================================================================
    // Forum
    // =========================================================================

    /// Posts newest first, optionally limited to one board.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn forum_posts(
        &self,
        category: Option<ForumCategory>,
    ) -> Result<Vec<ForumPost>, ApiError> {
        let mut request = self.inner.client.get(self.url("api/forum/posts")?);
        if let Some(category) = category {
            request = request.query(&[("category", category.as_str())]);
        }
        execute(request).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the server's message for invalid
    /// input.
    pub async fn create_forum_post(&self, post: &NewForumPost) -> Result<ForumPost, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("api/forum/posts")?)
            .json(post);
        execute(request).await
    }

    // =========================================================================
    // Contact
    // =========================================================================

    /// Submit the contact form. Never fails; transport and server errors
    /// come back as [`ContactOutcome::Failed`].
    pub async fn send_contact(&self, request: &ContactRequest) -> ContactOutcome {
        let result = match self.url("api/contact") {
            Ok(url) => execute::<ContactReceipt>(self.inner.client.post(url).json(request)).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(receipt) => ContactOutcome::Delivered(receipt.status),
            Err(ApiError::Rejected { message, .. }) => ContactOutcome::Rejected(message),
            Err(e) => {
                tracing::warn!(error = %e, "Contact form submission failed");
                ContactOutcome::Failed(
                    "Your message could not be sent right now. Please try again.".to_string(),
                )
            }
        }
    }

    /// `true` when `GET /api/health` answers with a success status.
    pub async fn health(&self) -> bool {
        let Ok(url) = self.url("api/health") else {
            return false;
        };
        self.inner
            .client
            .get(url)
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }
}

/// Send a request and decode a JSON success body, mapping error statuses.
async fn execute<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ApiError::RateLimited(retry_after));
    }

    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |b| b.error,
        );
        tracing::debug!(status = %status, message = %message, "API returned error status");
        return Err(if status.is_client_error() {
            ApiError::Rejected { status, message }
        } else {
            ApiError::Server { status, message }
        });
    }

    Ok(serde_json::from_str(&body)?)
}
