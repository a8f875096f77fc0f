//! Remote catalog service client.
//!
//! JSON over HTTP via `reqwest`. Every call is a single request/response
//! round trip: no retry, no caching, no batching. Every response body is
//! an [`ApiEnvelope`] with a `data` field on success and a `message` field
//! on failure; non-2xx status is always a failure regardless of body
//! shape, with the error message derived from the body when present.
//!
//! The storefront surface is read-mostly: list/fetch products plus order
//! submission at checkout. Product and order management lives in the
//! admin crate.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use thistle_core::{ApiEnvelope, NewOrder, Order, Product, ProductId};

/// Errors that can occur when calling the remote catalog service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connection, DNS, timeout at the
    /// transport level).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// The response body was not a well-formed envelope, or a success
    /// envelope arrived without a `data` payload.
    #[error("invalid response from catalog service: {0}")]
    Decode(String),

    /// A request path could not be joined onto the base URL.
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

/// Client for the remote catalog service.
///
/// Cheaply cloneable; holds a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

#[derive(Debug)]
struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a new client for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// Execute one round trip and unwrap the response envelope.
    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.inner.base_url.join(path)?;

        let mut request = self.inner.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Prefer the service's own message when the body is an envelope.
            let message = ApiEnvelope::<serde_json::Value>::from_body(&text)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| format!("catalog service request failed ({status})"));
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiEnvelope<T> =
            ApiEnvelope::from_body(&text).map_err(|e| ApiError::Decode(e.to_string()))?;

        envelope
            .data
            .ok_or_else(|| ApiError::Decode("success response without data".to_string()))
    }

    /// Fetch the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response decoding fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.send(Method::GET, "products", None::<&()>).await
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.send(Method::GET, &format!("products/{id}"), None::<&()>)
            .await
    }

    /// Submit a checkout order.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the order or the request
    /// fails; the caller's cart is untouched in that case.
    #[instrument(skip(self, order), fields(line_count = order.lines.len()))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.send(Method::POST, "orders", Some(order)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 404,
            message: "Product not found".to_string(),
        };
        assert_eq!(err.to_string(), "Product not found (HTTP 404)");
    }

    #[test]
    fn test_decode_error_display() {
        let err = ApiError::Decode("success response without data".to_string());
        assert_eq!(
            err.to_string(),
            "invalid response from catalog service: success response without data"
        );
    }
}
