//! Thistle Storefront - shopper-facing controller library.
//!
//! This crate keeps a locally persisted shopping cart consistent with a
//! remote product catalog across page loads and mutations, and drives the
//! load + render sequence for each logical page.
//!
//! # Architecture
//!
//! - [`api::CatalogClient`] - one round trip per call against the remote
//!   REST service, no retry, no caching, no batching
//! - [`storage`] - generic key-value blob store (file-backed or in-memory)
//! - [`cart`] - the reconciler and mutator, the stateful core
//! - [`controller::ShopController`] - navigation, rendering through the
//!   [`controller::ShopView`] trait, never any concrete UI technology
//! - [`state::ShopContext`] - explicit shared context; no global state
//!
//! The crate has no process boundary of its own: a host shell builds a
//! [`state::ShopContext`] and embeds the controller.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod storage;
pub mod telemetry;

pub use error::{AppError, Result};
