//! Admin client for the remote catalog service.
//!
//! Same wire contract as the storefront client (JSON envelope, one round
//! trip per call, non-2xx is always a failure) plus write access: full
//! product CRUD and order management, authenticated with a bearer token.

use std::sync::Arc;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use thistle_core::{
    ApiEnvelope, Order, OrderId, OrderUpdate, Product, ProductId, ProductInput,
};

use crate::config::AdminConfig;

/// Errors that can occur when calling the admin API.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// The request never completed.
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

/// Client for the admin surface of the remote catalog service.
#[derive(Debug, Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl std::fmt::Debug for AdminClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClientInner")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Deleted-resource acknowledgements carry an empty data payload.
#[derive(Debug, serde::Deserialize)]
struct Deleted {}

impl AdminClient {
    /// Create a new admin client.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                token: config.admin_token.clone(),
            }),
        }
    }

    /// Execute one round trip and unwrap the response envelope.
    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, AdminApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.inner.base_url.join(path)?;

        let mut request = self
            .inner
            .client
            .request(method, url)
            .bearer_auth(self.inner.token.expose_secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = ApiEnvelope::<serde_json::Value>::from_body(&text)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| format!("admin request failed ({status})"));
            return Err(AdminApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiEnvelope<T> =
            ApiEnvelope::from_body(&text).map_err(|e| AdminApiError::Decode(e.to_string()))?;

        envelope
            .data
            .ok_or_else(|| AdminApiError::Decode("success response without data".to_string()))
    }

    // =========================================================================
    // Product Management
    // =========================================================================

    /// Fetch all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response decoding fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, AdminApiError> {
        self.send(Method::GET, "products", None::<&()>).await
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, AdminApiError> {
        self.send(Method::GET, &format!("products/{id}"), None::<&()>)
            .await
    }

    /// Create a product; the service assigns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the input or the request
    /// fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, AdminApiError> {
        self.send(Method::POST, "products", Some(input)).await
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist, the service
    /// rejects the input, or the request fails.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<Product, AdminApiError> {
        self.send(Method::PUT, &format!("products/{id}"), Some(input))
            .await
    }

    /// Delete a product.
    ///
    /// Storefront carts referencing it heal themselves on their next
    /// reconciliation.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), AdminApiError> {
        self.send::<Deleted, ()>(Method::DELETE, &format!("products/{id}"), None)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Order Management
    // =========================================================================

    /// Fetch all orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response decoding fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, AdminApiError> {
        self.send(Method::GET, "orders", None::<&()>).await
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, AdminApiError> {
        self.send(Method::GET, &format!("orders/{id}"), None::<&()>)
            .await
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the request fails.
    #[instrument(skip(self, update), fields(order_id = %id))]
    pub async fn update_order(
        &self,
        id: &OrderId,
        update: &OrderUpdate,
    ) -> Result<Order, AdminApiError> {
        self.send(Method::PUT, &format!("orders/{id}"), Some(update))
            .await
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: &OrderId) -> Result<(), AdminApiError> {
        self.send::<Deleted, ()>(Method::DELETE, &format!("orders/{id}"), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_api_error_display() {
        let err = AdminApiError::Status {
            status: 401,
            message: "Invalid token".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid token (HTTP 401)");
    }
}
