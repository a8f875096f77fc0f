//! Stock-checked cart mutations.
//!
//! Every successful mutation writes the full cart back to storage before
//! returning, so a subsequent read always observes a consistent state.
//! Constraint violations leave both the in-memory and persisted cart
//! untouched.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use thistle_core::{Cart, CartLine, Product, ProductId, find_product};

use super::reconcile::{ReconcileOutcome, reconcile};
use super::CartStore;
use crate::storage::KeyValueStore;

/// Cart constraint violations. User-facing; never corrupt persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The referenced product is not in the current catalog.
    #[error("product {0} is no longer available")]
    NotFound(ProductId),

    /// The product has zero units available.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    /// The requested quantity exceeds available stock.
    #[error("only {stock} of product {id} available")]
    StockExceeded { id: ProductId, stock: u32 },
}

/// Cart operations over a persisted cart.
///
/// Stock constraints are checked against the catalog supplied by the
/// caller, looked up fresh on every call; the service holds no catalog
/// state of its own.
#[derive(Clone)]
pub struct CartService {
    store: CartStore,
}

impl CartService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store: CartStore::new(store),
        }
    }

    /// Load the persisted cart without reconciling.
    #[must_use]
    pub fn load(&self) -> Cart {
        self.store.load()
    }

    /// Load, reconcile against `catalog`, and eagerly persist the result.
    ///
    /// Called on every catalog load, every navigation to a cart-dependent
    /// page, and immediately before checkout submission.
    #[instrument(skip(self, catalog), fields(catalog_len = catalog.len()))]
    pub fn load_reconciled(&self, catalog: &[Product]) -> ReconcileOutcome {
        let persisted = self.store.load();
        let outcome = reconcile(&persisted, catalog);
        // Prune stale entries eagerly rather than on next mutation.
        self.store.save(&outcome.cart);
        outcome
    }

    /// Add one unit of a product to the cart.
    ///
    /// Inserts a new line with quantity 1 (snapshotting current name,
    /// price, and image) or increments the existing line.
    ///
    /// # Errors
    ///
    /// `NotFound` if the product is not in `catalog`, `OutOfStock` if it
    /// has no stock, `StockExceeded` if incrementing would exceed stock.
    /// The cart is unchanged on error.
    #[instrument(skip(self, catalog), fields(product_id = %id))]
    pub fn add_line(&self, id: &ProductId, catalog: &[Product]) -> Result<Cart, CartError> {
        let product = find_product(catalog, id).ok_or_else(|| CartError::NotFound(id.clone()))?;
        if !product.in_stock() {
            return Err(CartError::OutOfStock(id.clone()));
        }

        let mut cart = self.store.load();
        match cart.line_mut(id) {
            Some(line) => {
                if line.quantity + 1 > product.stock {
                    return Err(CartError::StockExceeded {
                        id: id.clone(),
                        stock: product.stock,
                    });
                }
                line.quantity += 1;
            }
            None => cart.push(CartLine {
                id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                quantity: 1,
            }),
        }

        self.store.save(&cart);
        Ok(cart)
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line. Setting a quantity on a
    /// product with no line is a no-op, not an error: quantity can only
    /// be adjusted on an existing line.
    ///
    /// # Errors
    ///
    /// `StockExceeded` if `quantity` exceeds the product's current stock
    /// (looked up fresh from `catalog`). The cart is unchanged on error.
    #[instrument(skip(self, catalog), fields(product_id = %id, quantity))]
    pub fn set_quantity(
        &self,
        id: &ProductId,
        quantity: u32,
        catalog: &[Product],
    ) -> Result<Cart, CartError> {
        if quantity == 0 {
            return Ok(self.remove_line(id));
        }

        let product = find_product(catalog, id).ok_or_else(|| CartError::NotFound(id.clone()))?;
        if quantity > product.stock {
            return Err(CartError::StockExceeded {
                id: id.clone(),
                stock: product.stock,
            });
        }

        let mut cart = self.store.load();
        if let Some(line) = cart.line_mut(id) {
            line.quantity = quantity;
            self.store.save(&cart);
        }
        Ok(cart)
    }

    /// Remove the line for a product. Idempotent; always succeeds.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove_line(&self, id: &ProductId) -> Cart {
        let mut cart = self.store.load();
        cart.remove(id);
        self.store.save(&cart);
        cart
    }

    /// Empty the cart and erase its persisted state. Always succeeds.
    ///
    /// Invocation is the confirmation: callers gate this behind their own
    /// explicit user confirmation.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Cart {
        self.store.clear();
        Cart::empty()
    }
}
