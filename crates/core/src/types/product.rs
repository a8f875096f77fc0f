//! Product catalog types.
//!
//! Products are owned by the remote service; the storefront holds a
//! read-only cached copy per page load.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A catalog product as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned opaque identifier.
    pub id: ProductId,
    pub name: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    /// Units currently available.
    pub stock: u32,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Image reference (URL or asset key).
    #[serde(default)]
    pub image: String,
}

impl Product {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Payload for creating or replacing a product via the admin panel.
///
/// Identifiers are server-assigned, so the input carries no id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

/// Look a product up by exact identifier match.
#[must_use]
pub fn find_product<'a>(catalog: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    catalog.iter().find(|p| &p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(1000, 2),
            stock,
            category: "misc".to_string(),
            description: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn test_in_stock() {
        assert!(product("a", 1).in_stock());
        assert!(!product("b", 0).in_stock());
    }

    #[test]
    fn test_find_product_exact_match() {
        let catalog = vec![product("a", 1), product("b", 2)];
        assert_eq!(
            find_product(&catalog, &ProductId::new("b")).map(|p| p.stock),
            Some(2)
        );
        assert!(find_product(&catalog, &ProductId::new("B")).is_none());
    }
}
