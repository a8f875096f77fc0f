//! Checkout: totals and order submission.
//!
//! The cart is reconciled immediately before submission, so an order is
//! never built from a cart loaded more than one catalog refresh ago. The
//! cart is cleared only after the service accepts the order; a transport
//! failure leaves cart and storage untouched for retry.

use rust_decimal::Decimal;
use tracing::{info, instrument};

use thistle_core::{Cart, Customer, NewOrder, Order, Product};

use crate::api::CatalogClient;
use crate::cart::CartService;
use crate::error::{AppError, Result};

/// Flat shipping surcharge applied to every order.
#[must_use]
pub fn shipping_fee() -> Decimal {
    Decimal::new(999, 2)
}

/// Computed order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// Compute totals for a cart: subtotal plus the flat shipping fee.
#[must_use]
pub fn totals(cart: &Cart) -> CheckoutTotals {
    let subtotal = cart.subtotal();
    let shipping = shipping_fee();
    CheckoutTotals {
        subtotal,
        shipping,
        total: subtotal + shipping,
    }
}

/// Build the order payload for a reconciled cart.
#[must_use]
pub fn build_order(cart: &Cart, customer: Customer) -> NewOrder {
    let CheckoutTotals {
        subtotal,
        shipping,
        total,
    } = totals(cart);

    NewOrder {
        customer,
        lines: cart.lines().to_vec(),
        subtotal,
        shipping,
        total,
    }
}

/// Reconcile, submit the order, and clear the cart on acceptance.
///
/// # Errors
///
/// `EmptyCart` if nothing survives reconciliation; any `ApiError` from
/// submission, in which case the cart is left intact.
#[instrument(skip_all, fields(customer_email = %customer.email))]
pub async fn submit(
    client: &CatalogClient,
    cart: &CartService,
    catalog: &[Product],
    customer: Customer,
) -> Result<Order> {
    let reconciled = cart.load_reconciled(catalog).cart;
    if reconciled.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let order = build_order(&reconciled, customer);
    let accepted = client.create_order(&order).await?;

    // Only a committed order empties the cart.
    cart.clear();
    info!(order_id = %accepted.id, total = %accepted.total, "order submitted");
    Ok(accepted)
}
