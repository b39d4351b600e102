//! Client for the backend REST API.
//!
//! # Architecture
//!
//! - One `reqwest::Client` shared by every handler (cheap `Arc` clone)
//! - JSON in, JSON out; every request carries `Content-Type: application/json`
//! - No retries and no caching: each view issues its one or two requests and
//!   renders whatever comes back
//!
//! # Example
//!
//! ```rust,ignore
//! use emporium_storefront::api::ApiClient;
//!
//! let api = ApiClient::new(config.api_url.clone());
//! let product = api.product("42").await?;
//! let related = api.related_products("42", 4).await.unwrap_or_default();
//! ```

pub mod types;

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use types::{ErrorBody, Listing, LoginRequest, LoginResponse, LogoutRequest, ProductDto};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        /// Message extracted from the error body, if the backend sent one.
        message: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The human-readable message the backend attached to its error, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status the backend answered with, if it answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:8080/api`).
    ///
    /// The URL should be `http`/`https`; see [`crate::config::parse_api_url`].
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// Build an endpoint URL by appending path segments to the base.
    ///
    /// Segments are percent-encoded, so ids taken from request paths cannot
    /// escape the API prefix.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        decode(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        decode(response).await
    }

    /// Fetch the "new arrivals" listing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body is not a product listing.
    #[instrument(skip(self))]
    pub async fn new_arrivals(&self) -> Result<Vec<ProductDto>, ApiError> {
        let listing: Listing<ProductDto> =
            self.get(self.endpoint(&["products", "new-arrivals"])).await?;
        Ok(listing.into_items())
    }

    /// Fetch the "deals" listing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body is not a product listing.
    #[instrument(skip(self))]
    pub async fn deals(&self) -> Result<Vec<ProductDto>, ApiError> {
        let listing: Listing<ProductDto> = self.get(self.endpoint(&["products", "deals"])).await?;
        Ok(listing.into_items())
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` when the backend rejects the id, or another
    /// variant when the request or decoding fails.
    #[instrument(skip(self))]
    pub async fn product(&self, id: &str) -> Result<ProductDto, ApiError> {
        self.get(self.endpoint(&["products", id])).await
    }

    /// Fetch up to `limit` products related to `id`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body is not a product listing.
    #[instrument(skip(self))]
    pub async fn related_products(
        &self,
        id: &str,
        limit: usize,
    ) -> Result<Vec<ProductDto>, ApiError> {
        let mut url = self.endpoint(&["products", id, "related"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let listing: Listing<ProductDto> = self.get(url).await?;
        let mut items = listing.into_items();
        // Not every backend honours the limit parameter.
        items.truncate(limit);
        Ok(items)
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for rejected credentials, or another variant
    /// when the request or decoding fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        self.post(self.endpoint(&["auth", "login"]), &body).await
    }

    /// Invalidate a refresh token on the backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the backend rejects it.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &SecretString) -> Result<(), ApiError> {
        let body = LogoutRequest {
            refresh_token: refresh_token.expose_secret(),
        };
        let response = self
            .inner
            .client
            .post(self.endpoint(&["auth", "logout"]))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await?;
        Err(ApiError::Status {
            status,
            message: extract_message(&text),
        })
    }
}

/// Turn a response into `T`, or into `ApiError::Status` carrying the
/// backend's message.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        debug!(
            status = %status,
            body = %text.chars().take(500).collect::<String>(),
            "backend returned non-success status"
        );
        return Err(ApiError::Status {
            status,
            message: extract_message(&text),
        });
    }

    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(500).collect::<String>(),
            "failed to parse backend response"
        );
        ApiError::Parse(e)
    })
}

/// Pull `message` (or `error`) out of an error body.
fn extract_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Json, Router, extract::Path, http::StatusCode as AxumStatus, routing::get};
    use serde_json::json;

    use super::*;
    use crate::test_support::{product_json, spawn_backend};

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_segments() {
        let api = ApiClient::new(Url::parse("http://localhost:8080/api/").unwrap());
        assert_eq!(
            api.endpoint(&["products", "42"]).as_str(),
            "http://localhost:8080/api/products/42"
        );
        assert_eq!(
            api.endpoint(&["products", "../admin"]).as_str(),
            "http://localhost:8080/api/products/..%2Fadmin"
        );
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(r#"{"message": "Product 9 does not exist"}"#).as_deref(),
            Some("Product 9 does not exist")
        );
        assert_eq!(
            extract_message(r#"{"error": "Not Found"}"#).as_deref(),
            Some("Not Found")
        );
        assert_eq!(extract_message(r#"{"message": "  "}"#), None);
        assert_eq!(extract_message("<html>502</html>"), None);
    }

    #[tokio::test]
    async fn test_product_success_and_rejection() {
        let backend = Router::new().route(
            "/api/products/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "1" {
                    Ok(Json(product_json(1)))
                } else {
                    Err((
                        AxumStatus::NOT_FOUND,
                        Json(json!({"message": format!("Product {id} not found")})),
                    ))
                }
            }),
        );
        let api = ApiClient::new(spawn_backend(backend).await);

        let product = api.product("1").await.unwrap();
        assert_eq!(product.name, "Trail Runner");

        let err = api.product("9").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.server_message(), Some("Product 9 not found"));
    }

    #[tokio::test]
    async fn test_related_products_truncates_to_limit() {
        let backend = Router::new().route(
            "/api/products/{id}/related",
            get(|| async {
                Json(json!({"content": (2..9).map(product_json).collect::<Vec<_>>()}))
            }),
        );
        let api = ApiClient::new(spawn_backend(backend).await);

        let related = api.related_products("1", 4).await.unwrap();
        assert_eq!(related.len(), 4);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        let api = ApiClient::new(crate::test_support::unreachable_backend().await);
        let err = api.new_arrivals().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
        assert_eq!(err.server_message(), None);
    }
}
