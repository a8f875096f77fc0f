//! Integration test support for Thistle.
//!
//! Provides an in-process stub of the remote catalog service (the same
//! wire contract the real service speaks: JSON envelope, REST paths,
//! bearer auth on the admin surface) plus a recording [`ShopView`] for
//! controller tests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p thistle-integration-tests
//! ```

// Test support code; unwraps abort the test, which is the right failure mode.
#![allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::missing_errors_doc)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use url::Url;

use thistle_core::{
    ApiEnvelope, NewOrder, Order, OrderId, OrderStatus, OrderUpdate, Product, ProductId,
    ProductInput,
};
use thistle_storefront::controller::{CartView, Notice, ShopView};

/// Bearer token the stub accepts on its admin surface.
pub const TEST_ADMIN_TOKEN: &str = "it-admin-token";

// =============================================================================
// Stub catalog service
// =============================================================================

#[derive(Default)]
struct StubState {
    products: Vec<Product>,
    orders: Vec<Order>,
    next_product: u32,
    next_order: u32,
}

type SharedState = Arc<Mutex<StubState>>;

/// An in-process stub of the remote catalog service.
///
/// State is directly inspectable and seedable from tests, so server-side
/// events (a product deleted behind the storefront's back) are one call
/// away.
pub struct StubApi {
    pub base_url: Url,
    state: SharedState,
}

impl StubApi {
    /// Bind the stub to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state: SharedState = Arc::new(Mutex::new(StubState::default()));

        let app = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route(
                "/products/{id}",
                get(get_product).put(update_product).delete(delete_product),
            )
            .route("/orders", get(list_orders).post(create_order))
            .route(
                "/orders/{id}",
                get(get_order).put(update_order).delete(delete_order),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
            state,
        }
    }

    /// Seed a product, assigning it a server-side id.
    pub fn seed_product(&self, input: ProductInput) -> Product {
        let mut state = self.state.lock().unwrap();
        state.next_product += 1;
        let product = Product {
            id: ProductId::new(format!("prod-{}", state.next_product)),
            name: input.name,
            price: input.price,
            stock: input.stock,
            category: input.category,
            description: input.description,
            image: input.image,
        };
        state.products.push(product.clone());
        product
    }

    /// Delete a product server-side, as if another session removed it.
    pub fn remove_product(&self, id: &ProductId) {
        self.state
            .lock()
            .unwrap()
            .products
            .retain(|p| &p.id != id);
    }

    /// Overwrite a product's stock server-side.
    pub fn set_stock(&self, id: &ProductId, stock: u32) {
        let mut state = self.state.lock().unwrap();
        if let Some(product) = state.products.iter_mut().find(|p| &p.id == id) {
            product.stock = stock;
        }
    }

    /// Overwrite a product's price server-side.
    pub fn set_price(&self, id: &ProductId, price: rust_decimal::Decimal) {
        let mut state = self.state.lock().unwrap();
        if let Some(product) = state.products.iter_mut().find(|p| &p.id == id) {
            product.price = price;
        }
    }

    /// Snapshot of all submitted orders.
    pub fn orders(&self) -> Vec<Order> {
        self.state.lock().unwrap().orders.clone()
    }
}

fn success<T: serde::Serialize>(data: T) -> Response {
    Json(ApiEnvelope::success(data)).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiEnvelope::<()>::failure(message))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {TEST_ADMIN_TOKEN}"))
}

async fn list_products(State(state): State<SharedState>) -> Response {
    success(state.lock().unwrap().products.clone())
}

async fn get_product(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let id = ProductId::new(id);
    let state = state.lock().unwrap();
    match state.products.iter().find(|p| p.id == id) {
        Some(product) => success(product.clone()),
        None => failure(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn create_product(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(input): Json<ProductInput>,
) -> Response {
    if !authorized(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let mut state = state.lock().unwrap();
    state.next_product += 1;
    let product = Product {
        id: ProductId::new(format!("prod-{}", state.next_product)),
        name: input.name,
        price: input.price,
        stock: input.stock,
        category: input.category,
        description: input.description,
        image: input.image,
    };
    state.products.push(product.clone());
    success(product)
}

async fn update_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<ProductInput>,
) -> Response {
    if !authorized(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let id = ProductId::new(id);
    let mut state = state.lock().unwrap();
    match state.products.iter_mut().find(|p| p.id == id) {
        Some(product) => {
            product.name = input.name;
            product.price = input.price;
            product.stock = input.stock;
            product.category = input.category;
            product.description = input.description;
            product.image = input.image;
            success(product.clone())
        }
        None => failure(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn delete_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let id = ProductId::new(id);
    let mut state = state.lock().unwrap();
    let before = state.products.len();
    state.products.retain(|p| p.id != id);
    if state.products.len() == before {
        failure(StatusCode::NOT_FOUND, "Product not found")
    } else {
        success(serde_json::json!({}))
    }
}

async fn list_orders(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    success(state.lock().unwrap().orders.clone())
}

async fn create_order(State(state): State<SharedState>, Json(input): Json<NewOrder>) -> Response {
    if input.lines.is_empty() {
        return failure(StatusCode::UNPROCESSABLE_ENTITY, "Order has no lines");
    }
    let mut state = state.lock().unwrap();
    state.next_order += 1;
    let order = Order {
        id: OrderId::new(format!("ord-{}", state.next_order)),
        customer: input.customer,
        lines: input.lines,
        subtotal: input.subtotal,
        shipping: input.shipping,
        total: input.total,
        status: OrderStatus::Pending,
        created_at: Utc::now(),
    };
    state.orders.push(order.clone());
    success(order)
}

async fn get_order(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let id = OrderId::new(id);
    let state = state.lock().unwrap();
    match state.orders.iter().find(|o| o.id == id) {
        Some(order) => success(order.clone()),
        None => failure(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn update_order(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(update): Json<OrderUpdate>,
) -> Response {
    if !authorized(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let id = OrderId::new(id);
    let mut state = state.lock().unwrap();
    match state.orders.iter_mut().find(|o| o.id == id) {
        Some(order) => {
            order.status = update.status;
            success(order.clone())
        }
        None => failure(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn delete_order(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let id = OrderId::new(id);
    let mut state = state.lock().unwrap();
    let before = state.orders.len();
    state.orders.retain(|o| o.id != id);
    if state.orders.len() == before {
        failure(StatusCode::NOT_FOUND, "Order not found")
    } else {
        success(serde_json::json!({}))
    }
}

// =============================================================================
// Recording view
// =============================================================================

/// One observed render or notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Home { featured: usize, cart_count: u32 },
    Products { count: usize, cart_count: u32 },
    ProductDetail { id: ProductId, cart_count: u32 },
    Cart { item_count: u32, total: String },
    Checkout { total: String },
    Notice(Notice),
}

/// A [`ShopView`] that records everything it is asked to render.
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    /// All notices observed so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ShopView for RecordingView {
    fn render_home(&self, featured: &[Product], cart_count: u32) {
        self.record(ViewEvent::Home {
            featured: featured.len(),
            cart_count,
        });
    }

    fn render_products(&self, products: &[&Product], cart_count: u32) {
        self.record(ViewEvent::Products {
            count: products.len(),
            cart_count,
        });
    }

    fn render_product_detail(&self, product: &Product, cart_count: u32) {
        self.record(ViewEvent::ProductDetail {
            id: product.id.clone(),
            cart_count,
        });
    }

    fn render_cart(&self, cart: &CartView) {
        self.record(ViewEvent::Cart {
            item_count: cart.item_count,
            total: cart.total.clone(),
        });
    }

    fn render_checkout(&self, cart: &CartView) {
        self.record(ViewEvent::Checkout {
            total: cart.total.clone(),
        });
    }

    fn notify(&self, notice: &Notice) {
        self.record(ViewEvent::Notice(notice.clone()));
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// A product input with sensible defaults for seeding.
#[must_use]
pub fn product_input(name: &str, price_cents: i64, stock: u32) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        price: rust_decimal::Decimal::new(price_cents, 2),
        stock,
        category: "tea".to_string(),
        description: format!("{name} description"),
        image: format!("/img/{name}.png"),
    }
}

/// A checkout customer for tests.
#[must_use]
pub fn test_customer() -> thistle_core::Customer {
    thistle_core::Customer {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        address: "1 Engine Way".to_string(),
        city: "London".to_string(),
        postal_code: "N1 9GU".to_string(),
    }
}
