//! Cart line item model and persisted blob codec.
//!
//! # Responsibility
//! - Define `CartItem` and its quantity-less input shape `NewCartItem`.
//! - Encode/decode the whole cart as one JSON array.
//!
//! # Invariants
//! - Field names on the wire are `id`, `title`, `image_url`, `price`,
//!   `quantity`.
//! - Insertion order of the list is preserved through encode/decode.
//! - Decoding checks JSON shape only; stored duplicates or negative
//!   quantities are returned as-is.

use serde::{Deserialize, Serialize};

/// Stable external product identifier.
pub type ProductId = String;

/// Ordered cart contents. New items append at the end.
pub type CartList = Vec<CartItem>;

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier, unique within one cart.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display image reference.
    pub image_url: String,
    /// Unit price. Currency semantics belong to the catalog.
    pub price: f64,
    /// Units in the cart. May reach zero or go negative.
    pub quantity: i64,
}

/// Product description accepted by `add_to_cart`; quantity is assigned by
/// the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

impl NewCartItem {
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Builds a cart line from this product with the given quantity.
    pub fn into_cart_item(self, quantity: i64) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

/// Serializes the full cart into the persisted JSON array form.
pub fn encode_cart(items: &[CartItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Parses a persisted JSON array back into a cart list.
pub fn decode_cart(raw: &str) -> Result<CartList, serde_json::Error> {
    serde_json::from_str(raw)
}
