//! Thistle Core - Shared types library.
//!
//! This crate provides common types used across all Thistle components:
//! - `storefront` - Shopper-facing catalog, cart, and checkout controller
//! - `admin` - Product and order management panel
//!
//! # Architecture
//!
//! The core crate contains only plain data types - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere, including inside test harnesses that stub the remote API.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, products, cart lines, and orders
//! - [`api`] - The JSON response envelope used by the remote service

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod types;

pub use api::ApiEnvelope;
pub use types::*;
