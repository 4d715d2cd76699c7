//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate in-memory cart state and key-value persistence.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod cart_service;
