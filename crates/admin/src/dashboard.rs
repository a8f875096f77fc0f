//! Dashboard aggregation over products and orders.
//!
//! Products and orders are fetched concurrently; the two awaits share no
//! mutable state, so the fan-out is a pure parallel await. Aggregation
//! itself is plain linear summation over the fetched lists.

use rust_decimal::Decimal;
use tracing::instrument;

use thistle_core::{Order, OrderStatus, Product};

use crate::api::{AdminApiError, AdminClient};

/// Products at or below this stock level are flagged for restocking.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Aggregated dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub product_count: usize,
    pub order_count: usize,
    /// Sum of order totals, excluding cancelled orders.
    pub revenue: Decimal,
    /// Orders still awaiting fulfilment.
    pub pending_orders: usize,
    /// Products with stock at or below [`LOW_STOCK_THRESHOLD`].
    pub low_stock: Vec<Product>,
}

/// Fetch products and orders in parallel and aggregate them.
///
/// # Errors
///
/// Returns the first error from either fetch; no partial stats are
/// produced.
#[instrument(skip(client))]
pub async fn load(client: &AdminClient) -> Result<DashboardStats, AdminApiError> {
    let (products, orders) = tokio::try_join!(client.list_products(), client.list_orders())?;
    Ok(compute(products, &orders))
}

/// Aggregate fetched products and orders into dashboard figures.
#[must_use]
pub fn compute(products: Vec<Product>, orders: &[Order]) -> DashboardStats {
    let revenue = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| o.total)
        .sum();

    let pending_orders = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .count();

    let order_count = orders.len();
    let product_count = products.len();
    let low_stock: Vec<Product> = products
        .into_iter()
        .filter(|p| p.stock <= LOW_STOCK_THRESHOLD)
        .collect();

    DashboardStats {
        product_count,
        order_count,
        revenue,
        pending_orders,
        low_stock,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use thistle_core::{Customer, OrderId, ProductId};

    fn product(id: &str, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_string(),
            price: Decimal::new(1000, 2),
            stock,
            category: "misc".to_string(),
            description: String::new(),
            image: String::new(),
        }
    }

    fn order(id: &str, total_cents: i64, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            customer: Customer {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                address: "1 Engine Way".to_string(),
                city: "London".to_string(),
                postal_code: "N1".to_string(),
            },
            lines: Vec::new(),
            subtotal: Decimal::new(total_cents - 999, 2),
            shipping: Decimal::new(999, 2),
            total: Decimal::new(total_cents, 2),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_revenue_excludes_cancelled_orders() {
        let orders = vec![
            order("1", 3499, OrderStatus::Pending),
            order("2", 2000, OrderStatus::Shipped),
            order("3", 9999, OrderStatus::Cancelled),
        ];
        let stats = compute(vec![], &orders);
        assert_eq!(stats.revenue, Decimal::new(5499, 2));
        assert_eq!(stats.order_count, 3);
        assert_eq!(stats.pending_orders, 1);
    }

    #[test]
    fn test_low_stock_uses_threshold_inclusively() {
        let products = vec![product("a", 0), product("b", 5), product("c", 6)];
        let stats = compute(products, &[]);
        assert_eq!(stats.product_count, 3);
        let ids: Vec<&str> = stats.low_stock.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
