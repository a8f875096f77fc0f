//! Cart reconciliation against the live catalog.
//!
//! A persisted cart line references its product weakly; the product may
//! have been repriced, renamed, or deleted remotely since the line was
//! written. Reconciliation walks the persisted lines in order and, for
//! each one, either re-snapshots it from the current catalog or drops it.

use tracing::debug;

use thistle_core::{Cart, CartLine, Product, find_product};

/// Result of reconciling a persisted cart against a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The reconciled cart: only lines whose product still exists.
    pub cart: Cart,
    /// Number of persisted lines dropped because their product vanished.
    /// A non-zero count should surface as an informational notice.
    pub dropped: usize,
}

/// Cross-check a persisted cart against the current catalog.
///
/// Surviving lines carry the *current* product name, price, and image
/// (never the stale persisted snapshot) and the *persisted* quantity,
/// unchanged even if it now exceeds stock: stock violations surface at
/// mutation time, not here. Lines whose product is gone are dropped; that
/// is a normal outcome, not a failure. Relative order of survivors is
/// preserved.
#[must_use]
pub fn reconcile(persisted: &Cart, catalog: &[Product]) -> ReconcileOutcome {
    let mut lines = Vec::with_capacity(persisted.len());
    let mut dropped = 0;

    for line in persisted.lines() {
        match find_product(catalog, &line.id) {
            Some(product) => lines.push(CartLine {
                id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                quantity: line.quantity,
            }),
            None => {
                debug!(product_id = %line.id, "dropping cart line for vanished product");
                dropped += 1;
            }
        }
    }

    ReconcileOutcome {
        cart: Cart::from_lines(lines),
        dropped,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use thistle_core::ProductId;

    fn product(id: &str, price_cents: i64, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(price_cents, 2),
            stock,
            category: "misc".to_string(),
            description: String::new(),
            image: format!("/img/{id}.png"),
        }
    }

    fn stale_line(id: &str, quantity: u32) -> CartLine {
        CartLine {
            id: ProductId::new(id),
            name: "old name".to_string(),
            price: Decimal::new(1, 2),
            image: "old.png".to_string(),
            quantity,
        }
    }

    #[test]
    fn test_survivors_take_current_snapshot_and_persisted_quantity() {
        let persisted = Cart::from_lines(vec![stale_line("a", 3)]);
        let catalog = vec![product("a", 1299, 10)];

        let outcome = reconcile(&persisted, &catalog);
        let line = outcome.cart.line(&ProductId::new("a")).unwrap();
        assert_eq!(line.name, "Product a");
        assert_eq!(line.price, Decimal::new(1299, 2));
        assert_eq!(line.image, "/img/a.png");
        assert_eq!(line.quantity, 3);
        assert_eq!(outcome.dropped, 0);
    }

    #[test]
    fn test_vanished_product_drops_line() {
        let persisted = Cart::from_lines(vec![stale_line("x", 3)]);
        let outcome = reconcile(&persisted, &[]);
        assert!(outcome.cart.is_empty());
        assert_eq!(outcome.dropped, 1);
    }

    #[test]
    fn test_quantity_above_stock_is_not_clamped() {
        // Stock dropped to 1 server-side; the persisted quantity of 5
        // survives reconciliation and is caught at mutation time instead.
        let persisted = Cart::from_lines(vec![stale_line("a", 5)]);
        let catalog = vec![product("a", 1000, 1)];
        let outcome = reconcile(&persisted, &catalog);
        assert_eq!(outcome.cart.line(&ProductId::new("a")).unwrap().quantity, 5);
    }

    #[test]
    fn test_preserves_persisted_order_not_catalog_order() {
        let persisted = Cart::from_lines(vec![stale_line("b", 1), stale_line("a", 1)]);
        let catalog = vec![product("a", 1000, 5), product("b", 1000, 5)];
        let outcome = reconcile(&persisted, &catalog);
        let ids: Vec<&str> = outcome.cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_output_ids_subset_of_catalog_and_count_monotone() {
        let persisted = Cart::from_lines(vec![
            stale_line("a", 1),
            stale_line("gone", 2),
            stale_line("b", 3),
        ]);
        let catalog = vec![product("a", 1000, 5), product("b", 1000, 5)];
        let outcome = reconcile(&persisted, &catalog);

        assert!(outcome.cart.len() <= persisted.len());
        for line in outcome.cart.lines() {
            assert!(find_product(&catalog, &line.id).is_some());
        }
        assert_eq!(outcome.dropped, 1);
    }

    #[test]
    fn test_reconcile_twice_is_idempotent() {
        let persisted = Cart::from_lines(vec![stale_line("a", 2), stale_line("gone", 1)]);
        let catalog = vec![product("a", 1500, 4)];

        let once = reconcile(&persisted, &catalog);
        let twice = reconcile(&once.cart, &catalog);
        assert_eq!(twice.cart, once.cart);
        assert_eq!(twice.dropped, 0);
    }
}
