//! Thistle Admin - product and order management panel.
//!
//! This crate drives the admin side of the same remote REST service the
//! storefront reads from: full product CRUD, order review and status
//! updates, and a dashboard aggregating both. Rendering is out of scope
//! here exactly as it is for the storefront; the panel consumes and
//! returns plain data structures.
//!
//! The admin client authenticates with a bearer token; keep it out of
//! logs and host it in `secrecy::SecretString`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod dashboard;

pub use api::{AdminApiError, AdminClient};
