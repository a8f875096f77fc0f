//! Shared data types for products, carts, and orders.

mod cart;
mod id;
mod order;
mod price;
mod product;

pub use cart::{Cart, CartLine};
pub use id::{OrderId, ProductId};
pub use order::{Customer, NewOrder, Order, OrderStatus, OrderUpdate};
pub use price::{CurrencyCode, Price};
pub use product::{Product, ProductInput, find_product};
