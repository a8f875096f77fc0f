//! Shared context passed explicitly to every component.
//!
//! There is no global shop instance: a host shell builds the context in
//! an explicit initialization step and hands it to the controller and to
//! any other component that needs it.

use std::sync::Arc;

use crate::api::CatalogClient;
use crate::cart::CartService;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Shared storefront context.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the catalog
/// client, and the cart service.
#[derive(Clone)]
pub struct ShopContext {
    inner: Arc<ShopContextInner>,
}

struct ShopContextInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cart: CartService,
}

impl ShopContext {
    /// Create a context over an explicit key-value store.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let catalog = CatalogClient::new(config.api_base_url.clone());
        let cart = CartService::new(store);

        Self {
            inner: Arc::new(ShopContextInner {
                config,
                catalog,
                cart,
            }),
        }
    }

    /// Create a context, choosing the store from the configuration:
    /// file-backed when a data directory is configured, in-memory
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn initialize(config: StorefrontConfig) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.data_dir {
            Some(dir) => Arc::new(FileStore::open(dir).map_err(|e| {
                crate::config::ConfigError::InvalidEnvVar(
                    "THISTLE_DATA_DIR".to_string(),
                    e.to_string(),
                )
            })?),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(Self::new(config, store))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog service client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }
}
