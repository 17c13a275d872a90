//! Bobr headless storefront client.
//!
//! This crate talks to the Bobr marketplace backend over its REST API and
//! owns the only state that lives on the client side: the session token
//! and the pre-checkout cart. Everything else (products, orders, users)
//! is backend-authoritative and fetched on demand.
//!
//! # Architecture
//!
//! - [`api::ApiClient`] - single typed REST client for every backend operation
//! - [`store::StateDir`] - local snapshot persistence for token and cart
//! - [`session::SessionManager`] - token + identity, gates everything else
//! - [`cart::CartStore`] - client-held cart with immediate atomic persistence
//! - [`orders::OrderTracker`] - checkout and order status lifecycle
//! - [`catalog`] - ownership-derived per-product capabilities
//! - [`shop::Shop`] - facade wiring the above together
//!
//! # Example
//!
//! ```rust,ignore
//! use bobr_client::{config::ClientConfig, shop::Shop};
//!
//! let config = ClientConfig::from_env()?;
//! let mut shop = Shop::new(&config)?;
//!
//! shop.login("bobr", "secret").await?;
//! shop.cart_add(product_id, 2).await?;
//! let order = shop.checkout().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod orders;
pub mod session;
pub mod shop;
pub mod store;

pub use error::{ApiError, ClientError};
pub use shop::Shop;
