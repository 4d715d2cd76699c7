//! Core cart state for the GoMarketplace mobile storefront.
//! Owns the cart model, its device-local persistence and the session store.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::cart_item::{
    decode_cart, encode_cart, CartItem, CartList, NewCartItem, ProductId,
};
pub use repo::kv_repo::{KeyValueStore, RepoError, RepoResult, SqliteKeyValueStore};
pub use service::cart_service::{
    CartError, CartResult, CartState, CartStore, PersistTask, CART_STORAGE_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
