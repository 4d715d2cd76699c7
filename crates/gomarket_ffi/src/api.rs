//! FFI use-case API for Flutter-facing cart calls.
//!
//! # Responsibility
//! - Expose the mounted session cart to Dart via FRB.
//! - Act as the provider context: cart calls only work between
//!   `cart_mount` and `cart_unmount`.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every mutation persists its own snapshot before returning.
//! - Calls without a mounted cart fail with a context-misuse message.

use gomarket_core::db::open_db;
use gomarket_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CartItem, CartResult, CartStore, KeyValueStore, NewCartItem, PersistTask, RepoResult,
    SqliteKeyValueStore,
};
use log::{info, warn};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

const CART_DB_FILE_NAME: &str = "gomarket_cart.sqlite3";
const CART_DB_PATH_ENV: &str = "GOMARKET_DB_PATH";
const OUTSIDE_PROVIDER_MESSAGE: &str = "cart used outside an active provider; call cart_mount first";

// Replaceable slot: mount swaps the session in, unmount takes it out.
static CART_SESSION: Mutex<Option<CartStore<ConnectionStore>>> = Mutex::new(None);

/// Key-value store that owns its SQLite connection so the session can
/// outlive the mount call.
struct ConnectionStore {
    conn: Connection,
}

impl KeyValueStore for ConnectionStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        SqliteKeyValueStore::new(&self.conn).get(key)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        SqliteKeyValueStore::new(&self.conn).set(key, value)
    }
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One cart line as seen by Dart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: i64,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            image_url: item.image_url.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Response envelope for cart calls.
#[derive(Debug, Clone, PartialEq)]
pub struct CartResponse {
    /// Whether the call reached a mounted cart and was applied in memory.
    pub ok: bool,
    /// Whether the resulting snapshot reached durable storage.
    pub persisted: bool,
    /// Cart contents after the call; empty on failure.
    pub items: Vec<CartItemView>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl CartResponse {
    fn success(items: &[CartItem], persisted: bool, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            persisted,
            items: items.iter().map(CartItemView::from).collect(),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            persisted: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

/// Opens the cart database, loads the persisted cart and mounts it as the
/// active session.
///
/// `db_path` falls back to `GOMARKET_DB_PATH`, then to a file in the temp
/// directory. Mounting again replaces the previous session.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_mount(db_path: Option<String>) -> CartResponse {
    let path = resolve_cart_db_path(db_path);
    let conn = match open_db(&path) {
        Ok(conn) => conn,
        Err(err) => return CartResponse::failure(format!("cart_mount failed: {err}")),
    };

    let mut cart = CartStore::new(ConnectionStore { conn });
    if let Err(err) = cart.initialize() {
        return CartResponse::failure(format!("cart_mount failed: {err}"));
    }

    let mut session = match lock_session() {
        Ok(session) => session,
        Err(message) => return CartResponse::failure(message),
    };
    let response = CartResponse::success(cart.items(), true, "Cart mounted.");
    *session = Some(cart);
    info!("event=cart_mount module=ffi status=ok");
    response
}

/// Drops the active session. Later cart calls fail until the next mount.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_unmount() -> CartResponse {
    match lock_session() {
        Ok(mut session) => match session.take() {
            Some(_) => CartResponse::success(&[], true, "Cart unmounted."),
            None => CartResponse::failure(OUTSIDE_PROVIDER_MESSAGE),
        },
        Err(message) => CartResponse::failure(message),
    }
}

/// Returns current cart contents.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_items() -> CartResponse {
    with_cart(|cart| Ok(CartResponse::success(cart.items(), true, "OK")))
}

/// Adds one unit of a product, appending it when not yet in the cart.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_add(id: String, title: String, image_url: String, price: f64) -> CartResponse {
    let product = NewCartItem::new(id, title, image_url, price);
    with_cart(|cart| {
        let task = cart.add_to_cart(product)?;
        Ok(apply_persist(cart, task, "Added to cart."))
    })
}

/// Adds one unit to an existing line. Unknown ids leave the cart unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_increment(id: String) -> CartResponse {
    with_cart(|cart| {
        let task = cart.increment(&id)?;
        Ok(apply_persist(cart, task, "Quantity increased."))
    })
}

/// Removes one unit from an existing line without a zero floor.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_decrement(id: String) -> CartResponse {
    with_cart(|cart| {
        let task = cart.decrement(&id)?;
        Ok(apply_persist(cart, task, "Quantity decreased."))
    })
}

fn apply_persist(
    cart: &CartStore<ConnectionStore>,
    task: PersistTask,
    message: &str,
) -> CartResponse {
    match cart.persist(task) {
        Ok(()) => CartResponse::success(cart.items(), true, message),
        Err(err) => {
            warn!("event=cart_persist module=ffi status=error error={err}");
            CartResponse::success(cart.items(), false, format!("{message} Not saved: {err}"))
        }
    }
}

fn with_cart(
    f: impl FnOnce(&mut CartStore<ConnectionStore>) -> CartResult<CartResponse>,
) -> CartResponse {
    let mut session = match lock_session() {
        Ok(session) => session,
        Err(message) => return CartResponse::failure(message),
    };
    let Some(cart) = session.as_mut() else {
        warn!("event=cart_call module=ffi status=error error_code=outside_provider");
        return CartResponse::failure(OUTSIDE_PROVIDER_MESSAGE);
    };
    f(cart).unwrap_or_else(|err| CartResponse::failure(format!("cart call failed: {err}")))
}

fn lock_session() -> Result<MutexGuard<'static, Option<CartStore<ConnectionStore>>>, String> {
    CART_SESSION
        .lock()
        .map_err(|_| "cart session lock poisoned".to_string())
}

fn resolve_cart_db_path(explicit: Option<String>) -> PathBuf {
    let from_env = std::env::var(CART_DB_PATH_ENV).ok();
    [explicit, from_env]
        .into_iter()
        .flatten()
        .map(|raw| raw.trim().to_string())
        .find(|trimmed| !trimmed.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(CART_DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::{
        cart_add, cart_decrement, cart_increment, cart_items, cart_mount, cart_unmount,
        core_version, init_logging, ping, resolve_cart_db_path, OUTSIDE_PROVIDER_MESSAGE,
    };
    use std::sync::Mutex;

    // Session is process-global; tests touching it run one at a time.
    static SESSION_GUARD: Mutex<()> = Mutex::new(());

    fn mount_fresh(dir: &tempfile::TempDir) {
        let path = dir.path().join("cart.sqlite3");
        let mounted = cart_mount(Some(path.to_string_lossy().into_owned()));
        assert!(mounted.ok, "{}", mounted.message);
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn explicit_db_path_wins_over_fallbacks() {
        let path = resolve_cart_db_path(Some("  /data/cart.db ".to_string()));
        assert_eq!(path.to_str(), Some("/data/cart.db"));
    }

    #[test]
    fn calls_without_mounted_cart_fail_loudly() {
        let _guard = SESSION_GUARD.lock().unwrap_or_else(|err| err.into_inner());
        let _ = cart_unmount();

        let response = cart_increment("p1".to_string());
        assert!(!response.ok);
        assert_eq!(response.message, OUTSIDE_PROVIDER_MESSAGE);
        assert!(!cart_items().ok);
    }

    #[test]
    fn mounted_cart_applies_and_persists_mutations() {
        let _guard = SESSION_GUARD.lock().unwrap_or_else(|err| err.into_inner());
        let dir = tempfile::tempdir().unwrap();
        mount_fresh(&dir);

        let added = cart_add("p1".to_string(), "T".to_string(), "u".to_string(), 10.0);
        assert!(added.ok, "{}", added.message);
        assert!(added.persisted);
        assert_eq!(added.items.len(), 1);
        assert_eq!(added.items[0].quantity, 1);

        assert_eq!(cart_increment("p1".to_string()).items[0].quantity, 2);
        cart_decrement("p1".to_string());
        let last = cart_decrement("p1".to_string());
        assert_eq!(last.items[0].quantity, 0);

        assert!(cart_unmount().ok);
    }

    #[test]
    fn non_finite_price_fails_and_keeps_cart_loadable() {
        let _guard = SESSION_GUARD.lock().unwrap_or_else(|err| err.into_inner());
        let dir = tempfile::tempdir().unwrap();
        mount_fresh(&dir);

        let rejected = cart_add("p1".to_string(), "T".to_string(), "u".to_string(), f64::NAN);
        assert!(!rejected.ok);
        assert!(rejected.message.contains("finite"));
        assert!(cart_unmount().ok);

        mount_fresh(&dir);
        assert!(cart_items().items.is_empty());
        assert!(cart_unmount().ok);
    }

    #[test]
    fn remount_rehydrates_persisted_cart() {
        let _guard = SESSION_GUARD.lock().unwrap_or_else(|err| err.into_inner());
        let dir = tempfile::tempdir().unwrap();
        mount_fresh(&dir);
        cart_add("p1".to_string(), "T".to_string(), "u".to_string(), 10.0);
        cart_add("p2".to_string(), "U".to_string(), "v".to_string(), 5.5);
        cart_add("p1".to_string(), "T".to_string(), "u".to_string(), 10.0);
        assert!(cart_unmount().ok);

        mount_fresh(&dir);
        let items = cart_items().items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "p1");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].id, "p2");
        assert_eq!(items[1].price, 5.5);

        assert!(cart_unmount().ok);
    }
}
