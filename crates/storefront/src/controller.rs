//! Navigation and view control.
//!
//! The controller drives which logical page is active and runs the load +
//! render sequence for it: fetch the catalog, reconcile the persisted
//! cart, then hand plain view-model data to a [`ShopView`]. It never
//! touches any concrete rendering technology; a host shell implements
//! [`ShopView`] with whatever UI it has and registers its input handlers
//! against the controller's entry points.

use rust_decimal::Decimal;
use tracing::instrument;

use thistle_core::{Cart, CurrencyCode, Customer, Order, Price, Product, ProductId};

use crate::cart::CartError;
use crate::checkout;
use crate::error::Result;
use crate::state::ShopContext;

/// Logical pages of the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Products {
        category: Option<String>,
        search: Option<String>,
    },
    ProductDetail(ProductId),
    Cart,
    Checkout,
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A user-visible notice. Display chrome (toasts, banners, dismissal
/// timers) is the host's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Abstract rendering surface. Implementations receive plain data only.
pub trait ShopView: Send + Sync {
    fn render_home(&self, featured: &[Product], cart_count: u32);
    fn render_products(&self, products: &[&Product], cart_count: u32);
    fn render_product_detail(&self, product: &Product, cart_count: u32);
    fn render_cart(&self, cart: &CartView);
    fn render_checkout(&self, cart: &CartView);
    fn notify(&self, notice: &Notice);
}

// =============================================================================
// View models
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: String,
}

/// Cart display data with formatted totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Build display data for a cart in the given currency.
    #[must_use]
    pub fn build(cart: &Cart, currency: CurrencyCode) -> Self {
        let format = |amount: Decimal| Price::new(amount, currency).display();
        let totals = checkout::totals(cart);

        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView {
                    id: line.id.clone(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                    price: format(line.price),
                    line_price: format(line.line_total()),
                    image: line.image.clone(),
                })
                .collect(),
            subtotal: format(totals.subtotal),
            shipping: format(totals.shipping),
            total: format(totals.total),
            item_count: cart.item_count(),
        }
    }
}

/// Number of products featured on the home page.
const FEATURED_COUNT: usize = 4;

/// Filter the catalog by exact category and case-insensitive substring
/// search over name and description. Both filters are optional; order is
/// preserved.
#[must_use]
pub fn filter_products<'a>(
    catalog: &'a [Product],
    category: Option<&str>,
    search: Option<&str>,
) -> Vec<&'a Product> {
    let needle = search.map(str::to_lowercase);
    catalog
        .iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .filter(|p| {
            needle.as_deref().is_none_or(|n| {
                p.name.to_lowercase().contains(n) || p.description.to_lowercase().contains(n)
            })
        })
        .collect()
}

// =============================================================================
// Controller
// =============================================================================

/// Drives page loads and cart mutations against a [`ShopView`].
///
/// Holds the catalog fetched by the most recent navigation; cart
/// mutations check stock against that copy, and the next navigation
/// refreshes it.
pub struct ShopController<V: ShopView> {
    ctx: ShopContext,
    view: V,
    catalog: Vec<Product>,
    cart: Cart,
}

impl<V: ShopView> ShopController<V> {
    #[must_use]
    pub fn new(ctx: ShopContext, view: V) -> Self {
        Self {
            ctx,
            view,
            catalog: Vec::new(),
            cart: Cart::empty(),
        }
    }

    /// The catalog from the most recent navigation.
    #[must_use]
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// The reconciled cart from the most recent load.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Fetch the catalog and reconcile the persisted cart against it,
    /// surfacing a notice if any lines were dropped.
    async fn refresh(&mut self) -> Result<()> {
        self.catalog = self.ctx.catalog().list_products().await?;

        let outcome = self.ctx.cart().load_reconciled(&self.catalog);
        if outcome.dropped > 0 {
            self.view.notify(&Notice::info(format!(
                "{} item(s) were removed from your cart because they are no longer available",
                outcome.dropped
            )));
        }
        self.cart = outcome.cart;
        Ok(())
    }

    fn cart_view(&self) -> CartView {
        CartView::build(&self.cart, self.ctx.config().currency)
    }

    /// Navigate to a page: load what it needs, then render it.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote call fails; committed cart state is
    /// untouched and the navigation can simply be retried.
    #[instrument(skip(self))]
    pub async fn navigate(&mut self, page: Page) -> Result<()> {
        self.refresh().await?;
        let cart_count = self.cart.item_count();

        match page {
            Page::Home => {
                let featured: Vec<Product> = self
                    .catalog
                    .iter()
                    .filter(|p| p.in_stock())
                    .take(FEATURED_COUNT)
                    .cloned()
                    .collect();
                self.view.render_home(&featured, cart_count);
            }
            Page::Products { category, search } => {
                let products =
                    filter_products(&self.catalog, category.as_deref(), search.as_deref());
                self.view.render_products(&products, cart_count);
            }
            Page::ProductDetail(id) => {
                // Fetched fresh: the detail page must reflect the product
                // even when the list endpoint paginates it away.
                let product = self.ctx.catalog().get_product(&id).await?;
                self.view.render_product_detail(&product, cart_count);
            }
            Page::Cart => self.view.render_cart(&self.cart_view()),
            Page::Checkout => {
                if self.cart.is_empty() {
                    self.view
                        .notify(&Notice::error("Your cart is empty".to_string()));
                    self.view.render_cart(&self.cart_view());
                } else {
                    self.view.render_checkout(&self.cart_view());
                }
            }
        }

        Ok(())
    }

    /// Handle a cart constraint violation by notifying the shopper.
    fn notify_cart_error(&self, err: &CartError) {
        self.view.notify(&Notice::error(err.to_string()));
    }

    /// Add one unit of a product, checking stock against the current
    /// catalog. Constraint violations surface as an error notice and
    /// leave the cart unchanged.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn add_to_cart(&mut self, id: &ProductId) {
        match self.ctx.cart().add_line(id, &self.catalog) {
            Ok(cart) => {
                self.cart = cart;
                self.view.notify(&Notice::success("Added to cart"));
            }
            Err(e) => self.notify_cart_error(&e),
        }
    }

    /// Set a line's quantity (zero removes it) and re-render the cart.
    #[instrument(skip(self), fields(product_id = %id, quantity))]
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) {
        match self.ctx.cart().set_quantity(id, quantity, &self.catalog) {
            Ok(cart) => {
                self.cart = cart;
                self.view.render_cart(&self.cart_view());
            }
            Err(e) => self.notify_cart_error(&e),
        }
    }

    /// Remove a line and re-render the cart. Idempotent.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        self.cart = self.ctx.cart().remove_line(id);
        self.view.render_cart(&self.cart_view());
    }

    /// Empty the cart and re-render it. The host gates this behind its
    /// own explicit user confirmation; calling it is the confirmation.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.cart = self.ctx.cart().clear();
        self.view.render_cart(&self.cart_view());
    }

    /// Reconcile, submit the order, and clear the cart on acceptance.
    ///
    /// # Errors
    ///
    /// `EmptyCart` if nothing survives reconciliation; any `ApiError`
    /// from submission, leaving the cart intact for retry.
    #[instrument(skip(self, customer))]
    pub async fn submit_checkout(&mut self, customer: Customer) -> Result<Order> {
        // Refresh so the pre-submission reconcile runs against a catalog
        // no older than this call, and drop notices still surface.
        self.refresh().await?;

        match checkout::submit(self.ctx.catalog(), self.ctx.cart(), &self.catalog, customer).await {
            Ok(order) => {
                self.cart = Cart::empty();
                self.view
                    .notify(&Notice::success(format!("Order {} placed", order.id)));
                Ok(order)
            }
            Err(e) => {
                if e.is_user_facing() {
                    self.view.notify(&Notice::error(e.to_string()));
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, category: &str, name: &str, description: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(1000, 2),
            stock: 3,
            category: category.to_string(),
            description: description.to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn test_filter_by_category_is_exact() {
        let catalog = vec![
            product("a", "tea", "Green Tea", ""),
            product("b", "teaware", "Teapot", ""),
        ];
        let filtered = filter_products(&catalog, Some("tea"), None);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().id.as_str(), "a");
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let catalog = vec![
            product("a", "tea", "Green Tea", ""),
            product("b", "tea", "Oolong", "a GREEN-ish roast"),
            product("c", "tea", "Earl Grey", ""),
        ];
        let filtered = filter_products(&catalog, None, Some("green"));
        let ids: Vec<&str> = filtered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_no_filters_returns_all_in_order() {
        let catalog = vec![product("a", "t", "A", ""), product("b", "t", "B", "")];
        assert_eq!(filter_products(&catalog, None, None).len(), 2);
    }

    #[test]
    fn test_cart_view_formats_prices() {
        use thistle_core::CartLine;

        let cart = Cart::from_lines(vec![CartLine {
            id: ProductId::new("a"),
            name: "Green Tea".to_string(),
            price: Decimal::new(1000, 2),
            image: String::new(),
            quantity: 2,
        }]);

        let view = CartView::build(&cart, CurrencyCode::USD);
        assert_eq!(view.item_count, 2);
        let item = view.items.first().unwrap();
        assert_eq!(item.price, "$10.00");
        assert_eq!(item.line_price, "$20.00");
        assert_eq!(view.subtotal, "$20.00");
        assert_eq!(view.shipping, "$9.99");
        assert_eq!(view.total, "$29.99");
    }
}
