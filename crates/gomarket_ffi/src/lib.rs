//! Flutter-facing bindings for GoMarketplace cart core.

pub mod api;
