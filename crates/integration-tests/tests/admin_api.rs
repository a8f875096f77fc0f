//! Admin panel flows: product CRUD, order management, dashboard.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::SecretString;
use url::Url;

use thistle_admin::config::AdminConfig;
use thistle_admin::dashboard;
use thistle_admin::{AdminApiError, AdminClient};
use thistle_core::{CurrencyCode, OrderStatus, OrderUpdate, ProductId};
use thistle_integration_tests::{StubApi, TEST_ADMIN_TOKEN, product_input, test_customer};
use thistle_storefront::checkout;
use thistle_storefront::config::StorefrontConfig;
use thistle_storefront::state::ShopContext;
use thistle_storefront::storage::MemoryStore;

fn admin(base_url: Url) -> AdminClient {
    AdminClient::new(&AdminConfig::new(
        base_url,
        SecretString::from(TEST_ADMIN_TOKEN),
    ))
}

/// Place one order through the storefront path so the admin side has
/// something real to manage.
async fn place_order(stub: &StubApi) -> thistle_core::Order {
    let tea = stub.seed_product(product_input("Green Tea", 1000, 20));
    let config = StorefrontConfig::new(stub.base_url.clone(), None, CurrencyCode::USD);
    let ctx = ShopContext::new(config, Arc::new(MemoryStore::new()));
    let catalog = ctx.catalog().list_products().await.unwrap();
    ctx.cart().add_line(&tea.id, &catalog).unwrap();
    checkout::submit(ctx.catalog(), ctx.cart(), &catalog, test_customer())
        .await
        .unwrap()
}

#[tokio::test]
async fn product_crud_roundtrip() {
    let stub = StubApi::start().await;
    let client = admin(stub.base_url.clone());

    let created = client
        .create_product(&product_input("Green Tea", 1000, 5))
        .await
        .unwrap();
    assert!(!created.id.as_str().is_empty());

    let listed = client.list_products().await.unwrap();
    assert_eq!(listed.len(), 1);

    let mut input = product_input("Green Tea", 1000, 5);
    input.price = Decimal::new(1250, 2);
    input.stock = 9;
    let updated = client.update_product(&created.id, &input).await.unwrap();
    assert_eq!(updated.price, Decimal::new(1250, 2));

    let fetched = client.get_product(&created.id).await.unwrap();
    assert_eq!(fetched.stock, 9);

    client.delete_product(&created.id).await.unwrap();
    let err = client.get_product(&created.id).await.unwrap_err();
    assert!(matches!(
        err,
        AdminApiError::Status { status: 404, .. }
    ));
}

#[tokio::test]
async fn deleting_a_missing_product_carries_the_service_message() {
    let stub = StubApi::start().await;
    let client = admin(stub.base_url.clone());

    let err = client
        .delete_product(&ProductId::new("ghost"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Product not found (HTTP 404)");
}

#[tokio::test]
async fn order_status_can_be_advanced_and_orders_deleted() {
    let stub = StubApi::start().await;
    let order = place_order(&stub).await;
    let client = admin(stub.base_url.clone());

    let orders = client.list_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders.first().unwrap().status, OrderStatus::Pending);

    let shipped = client
        .update_order(
            &order.id,
            &OrderUpdate {
                status: OrderStatus::Shipped,
            },
        )
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let fetched = client.get_order(&order.id).await.unwrap();
    assert_eq!(fetched.status, OrderStatus::Shipped);

    client.delete_order(&order.id).await.unwrap();
    assert!(client.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn dashboard_aggregates_products_and_orders() {
    let stub = StubApi::start().await;
    let order = place_order(&stub).await;
    stub.seed_product(product_input("Oolong", 1500, 2));
    let client = admin(stub.base_url.clone());

    let stats = dashboard::load(&client).await.unwrap();
    assert_eq!(stats.product_count, 2);
    assert_eq!(stats.order_count, 1);
    assert_eq!(stats.pending_orders, 1);
    // One order: 10.00 + 9.99 shipping.
    assert_eq!(stats.revenue, order.total);
    // Oolong has stock 2, at or below the restock threshold.
    assert_eq!(stats.low_stock.len(), 1);

    // Cancelled orders stop counting toward revenue.
    client
        .update_order(
            &order.id,
            &OrderUpdate {
                status: OrderStatus::Cancelled,
            },
        )
        .await
        .unwrap();
    let stats = dashboard::load(&client).await.unwrap();
    assert_eq!(stats.revenue, Decimal::ZERO);
    assert_eq!(stats.pending_orders, 0);
}

#[tokio::test]
async fn a_bad_token_is_rejected_with_the_service_message() {
    let stub = StubApi::start().await;
    let client = AdminClient::new(&AdminConfig::new(
        stub.base_url.clone(),
        SecretString::from("wrong-token"),
    ));

    let err = client
        .create_product(&product_input("Green Tea", 1000, 5))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid token (HTTP 401)");
}
