//! Cart state container.
//!
//! # Responsibility
//! - Hold the authoritative in-memory cart for one app session.
//! - Rehydrate it once from the durable key-value slot.
//! - Hand back a persist task for every mutation.
//!
//! # Invariants
//! - No two items share the same `id`; new ids append at the end.
//! - Mutations are only accepted after `initialize()` succeeded.
//! - A persist task carries the list serialized at commit time; running it
//!   never re-reads in-memory state.
//! - Quantity is neither floored nor capped; it saturates at the `i64`
//!   bounds instead of overflowing.
//! - Prices are finite so every snapshot decodes again.

use crate::model::cart_item::{decode_cart, encode_cart, CartItem, CartList, NewCartItem};
use crate::repo::kv_repo::{KeyValueStore, RepoError, RepoResult};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized cart blob.
pub const CART_STORAGE_KEY: &str = "@GoMarketplace:cart";

pub type CartResult<T> = Result<T, CartError>;

/// Cart service error.
#[derive(Debug)]
pub enum CartError {
    /// A mutation or read-modify call arrived before `initialize()`.
    NotInitialized,
    /// `initialize()` was called on a store that already loaded.
    AlreadyInitialized,
    /// Price is NaN or infinite and cannot be stored as a JSON number.
    InvalidPrice(f64),
    Storage(RepoError),
    /// Stored blob is not a valid serialized cart.
    Decode(serde_json::Error),
    Encode(serde_json::Error),
}

impl Display for CartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "cart store used before initialize()"),
            Self::AlreadyInitialized => write!(f, "cart store already initialized"),
            Self::InvalidPrice(price) => write!(f, "cart price must be finite, got {price}"),
            Self::Storage(err) => write!(f, "cart storage failed: {err}"),
            Self::Decode(err) => write!(f, "stored cart is not valid: {err}"),
            Self::Encode(err) => write!(f, "cart could not be serialized: {err}"),
        }
    }
}

impl Error for CartError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotInitialized | Self::AlreadyInitialized | Self::InvalidPrice(_) => None,
            Self::Storage(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for CartError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Lifecycle of a cart store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartState {
    /// Constructed, persisted cart not yet loaded.
    Loading,
    /// Loaded; mutations accepted.
    Ready,
}

/// Pending write of one committed cart snapshot.
///
/// Returned by every mutation. The caller runs it, queues it, or drops it;
/// dropping means the mutation is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a cart mutation is not persisted until its PersistTask runs"]
pub struct PersistTask {
    key: String,
    payload: String,
}

impl PersistTask {
    /// Storage key this task writes to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialized cart captured at commit time.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Writes the captured snapshot to `store`.
    pub fn run<S: KeyValueStore + ?Sized>(self, store: &S) -> RepoResult<()> {
        store.set(&self.key, &self.payload)
    }
}

/// Session cart backed by a durable key-value store.
///
/// Constructed explicitly and passed to whichever component needs it.
pub struct CartStore<S: KeyValueStore> {
    store: S,
    key: String,
    items: CartList,
    state: CartState,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Creates an empty, not yet loaded cart using `CART_STORAGE_KEY`.
    pub fn new(store: S) -> Self {
        Self::with_key(store, CART_STORAGE_KEY)
    }

    /// Creates an empty, not yet loaded cart persisted under `key`.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            items: CartList::new(),
            state: CartState::Loading,
        }
    }

    /// Loads the persisted cart and moves the store to `Ready`.
    ///
    /// An absent slot leaves the cart empty. A present slot replaces the
    /// in-memory list wholesale without further validation.
    ///
    /// # Errors
    /// - `AlreadyInitialized` on a second call.
    /// - `Storage` when the read fails; the store stays `Loading`.
    /// - `Decode` when the blob is malformed; the store stays `Loading`.
    pub fn initialize(&mut self) -> CartResult<()> {
        if self.state == CartState::Ready {
            return Err(CartError::AlreadyInitialized);
        }

        if let Some(raw) = self.store.get(&self.key)? {
            self.items = decode_cart(&raw).map_err(CartError::Decode)?;
        }
        self.state = CartState::Ready;

        info!(
            "event=cart_load module=service status=ok items={}",
            self.items.len()
        );
        Ok(())
    }

    /// Adds one unit of `product`.
    ///
    /// Appends a new line with quantity 1 when the id is unknown, otherwise
    /// bumps the existing line.
    ///
    /// # Errors
    /// - `NotInitialized` before `initialize()`.
    /// - `InvalidPrice` for a NaN or infinite price; the cart is untouched.
    pub fn add_to_cart(&mut self, product: NewCartItem) -> CartResult<PersistTask> {
        self.ensure_ready()?;
        if !product.price.is_finite() {
            return Err(CartError::InvalidPrice(product.price));
        }

        match self.position(&product.id) {
            Some(index) => {
                let line = &mut self.items[index];
                line.quantity = line.quantity.saturating_add(1);
                debug!("event=cart_add module=service status=ok outcome=incremented");
            }
            None => {
                self.items.push(product.into_cart_item(1));
                debug!("event=cart_add module=service status=ok outcome=appended");
            }
        }

        self.snapshot()
    }

    /// Adds one unit to the line with `id`.
    ///
    /// Unknown ids leave the list unchanged but still yield a persist task.
    pub fn increment(&mut self, id: &str) -> CartResult<PersistTask> {
        self.adjust(id, 1)
    }

    /// Removes one unit from the line with `id`. Quantity may reach zero or
    /// go negative; the line is kept.
    ///
    /// Unknown ids leave the list unchanged but still yield a persist task.
    pub fn decrement(&mut self, id: &str) -> CartResult<PersistTask> {
        self.adjust(id, -1)
    }

    /// Writes `task` to this cart's backing store.
    pub fn persist(&self, task: PersistTask) -> RepoResult<()> {
        task.run(&self.store)
    }

    /// Current cart contents in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up one line by product id.
    pub fn find(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn state(&self) -> CartState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == CartState::Ready
    }

    /// Storage key this cart persists under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn adjust(&mut self, id: &str, delta: i64) -> CartResult<PersistTask> {
        self.ensure_ready()?;

        let found = match self.position(id) {
            Some(index) => {
                let line = &mut self.items[index];
                line.quantity = line.quantity.saturating_add(delta);
                true
            }
            None => false,
        };
        debug!("event=cart_adjust module=service status=ok delta={delta} found={found}");

        self.snapshot()
    }

    fn ensure_ready(&self) -> CartResult<()> {
        match self.state {
            CartState::Ready => Ok(()),
            CartState::Loading => Err(CartError::NotInitialized),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn snapshot(&self) -> CartResult<PersistTask> {
        let payload = encode_cart(&self.items).map_err(CartError::Encode)?;
        Ok(PersistTask {
            key: self.key.clone(),
            payload,
        })
    }
}
