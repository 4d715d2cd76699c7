//! Cart domain model.
//!
//! # Responsibility
//! - Define the canonical cart line item shared by core and UI layers.
//! - Own the JSON wire shape used for the persisted cart blob.
//!
//! # Invariants
//! - Every line item is identified by a stable external product `id`.
//! - Quantity has no enforced lower or upper bound.

pub mod cart_item;
