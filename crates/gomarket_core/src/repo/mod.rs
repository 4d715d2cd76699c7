//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable key-value contract the cart persists through.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Keys are non-blank strings; one key addresses one value.
//! - `set` replaces any previous value for the key.

pub mod kv_repo;
