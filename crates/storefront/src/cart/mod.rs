//! The cart-consistency core: persisted cart storage, reconciliation
//! against the live catalog, and stock-checked mutations.
//!
//! The cart occupies a single key in the blob store. It is loaded before
//! every cart-dependent page, reconciled against the catalog fetched for
//! that page, and written back after every mutation, so a subsequent read
//! always observes a consistent state.

mod mutate;
mod reconcile;

pub use mutate::{CartError, CartService};
pub use reconcile::{ReconcileOutcome, reconcile};

use std::sync::Arc;

use tracing::warn;

use thistle_core::Cart;

use crate::storage::KeyValueStore;

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Persisted cart access on top of a generic key-value store.
///
/// Corruption is self-healing: a blob that fails to parse is erased and
/// treated as an empty cart, never surfaced to the caller.
#[derive(Clone)]
pub struct CartStore {
    store: Arc<dyn KeyValueStore>,
}

impl CartStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted cart.
    ///
    /// An absent blob yields an empty cart. A malformed blob yields an
    /// empty cart and erases the blob so the corruption cannot recur.
    #[must_use]
    pub fn load(&self) -> Cart {
        let Some(blob) = self.store.get(CART_KEY) else {
            return Cart::empty();
        };

        match serde_json::from_str(&blob) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(error = %e, "persisted cart is unreadable, resetting to empty");
                self.store.remove(CART_KEY);
                Cart::empty()
            }
        }
    }

    /// Write the full cart, replacing the prior blob.
    ///
    /// An empty cart erases the blob instead of writing an empty list;
    /// absence and emptiness load identically.
    pub fn save(&self, cart: &Cart) {
        if cart.is_empty() {
            self.store.remove(CART_KEY);
            return;
        }

        match serde_json::to_string(cart) {
            Ok(blob) => self.store.set(CART_KEY, &blob),
            // Serialization of plain cart lines cannot realistically fail,
            // but a lost write must not take the process down.
            Err(e) => warn!(error = %e, "failed to serialize cart"),
        }
    }

    /// Erase the persisted cart.
    pub fn clear(&self) {
        self.store.remove(CART_KEY);
    }
}
