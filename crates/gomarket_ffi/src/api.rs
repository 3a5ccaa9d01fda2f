//! FFI use-case API for Flutter-facing cart calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level cart functions to Dart via FRB.
//! - Translate core cart errors into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every cart call goes through an explicitly opened `CartHandle`.
//! - A closed handle rejects every call with the not-open error.

use gomarket_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_cart,
    ping as ping_inner, CartChange, CartEntry, CartError, CartResult, CartStore,
    SqliteSlotRepository,
};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

const CART_DB_FILE_NAME: &str = "gomarket_cart.sqlite3";
const CART_DB_PATH_ENV: &str = "GOMARKET_DB_PATH";

type Store = CartStore<SqliteSlotRepository>;

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

/// Open cart session owned by the UI layer.
///
/// Created by `cart_open` and passed to every cart call. Dropping or closing
/// it ends the session.
#[flutter_rust_bridge::frb(opaque)]
pub struct CartHandle {
    session: Mutex<Option<Store>>,
}

/// Cart line as rendered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

/// Response envelope for cart calls.
#[derive(Debug, Clone, PartialEq)]
pub struct CartActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// User-facing warning to show as an alert, if any.
    pub alert: Option<String>,
    /// Human-readable message for diagnostics.
    pub message: String,
    /// Cart contents after the call (empty when the session is not open).
    pub items: Vec<CartItem>,
}

impl CartActionResponse {
    fn success(message: impl Into<String>, items: Vec<CartItem>) -> Self {
        Self {
            ok: true,
            alert: None,
            message: message.into(),
            items,
        }
    }

    fn failure(action: &str, err: &CartError, items: Vec<CartItem>) -> Self {
        Self {
            ok: false,
            alert: err.user_alert().map(str::to_string),
            message: format!("{action} failed: {err}"),
            items,
        }
    }
}

/// Totals envelope for cart badge and checkout views.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummaryResponse {
    pub ok: bool,
    pub message: String,
    pub distinct_items: u64,
    pub total_quantity: u64,
    pub subtotal: f64,
}

/// Opens the cart database and loads the persisted cart.
///
/// Path resolution: `db_path` when non-blank, else `GOMARKET_DB_PATH`, else
/// a file in the OS temp directory.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; returns the load failure message on error.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_open(db_path: Option<String>) -> Result<CartHandle, String> {
    let path = resolve_cart_db_path(db_path);
    let (store, outcome) =
        open_cart(&path).map_err(|err| format!("cart_open failed: {err}"))?;
    info!(
        "event=cart_open module=ffi status=ok outcome={:?} items={}",
        outcome,
        store.entries().len()
    );
    Ok(CartHandle {
        session: Mutex::new(Some(store)),
    })
}

/// Returns current cart contents.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_entries(handle: &CartHandle) -> CartActionResponse {
    run_action(handle, "cart_entries", |_| Ok(CartChange::Unchanged))
}

/// Returns cart totals.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_summary(handle: &CartHandle) -> CartSummaryResponse {
    let session = lock_session(handle);
    match session.as_ref() {
        Some(store) => {
            let summary = store.summary();
            CartSummaryResponse {
                ok: true,
                message: String::new(),
                distinct_items: summary.distinct_items,
                total_quantity: summary.total_quantity,
                subtotal: summary.subtotal,
            }
        }
        None => {
            log_not_open("cart_summary");
            CartSummaryResponse {
                ok: false,
                message: format!("cart_summary failed: {}", CartError::NotOpen),
                distinct_items: 0,
                total_quantity: 0,
                subtotal: 0.0,
            }
        }
    }
}

/// Adds one product to the cart, or bumps its quantity when already present.
///
/// Product fields are validated only when `id` is new to the cart; for a
/// known id they are ignored.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; invalid data for a new product yields `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_add(
    handle: &CartHandle,
    id: String,
    title: String,
    image_url: String,
    price: f64,
) -> CartActionResponse {
    let candidate = CartEntry {
        id: id.trim().to_string(),
        title,
        image_url,
        price,
        quantity: 1,
    };
    run_action(handle, "cart_add", |store| store.add_to_cart(candidate))
}

/// Raises one product's quantity by one. Unknown ids are ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_increment(handle: &CartHandle, id: String) -> CartActionResponse {
    run_action(handle, "cart_increment", |store| store.increment(id.trim()))
}

/// Lowers one product's quantity by one.
///
/// A product already at zero is refused with `alert` set for the UI.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_decrement(handle: &CartHandle, id: String) -> CartActionResponse {
    run_action(handle, "cart_decrement", |store| store.decrement(id.trim()))
}

/// Ends the cart session; later calls on this handle fail with not-open.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_close(handle: &CartHandle) -> CartActionResponse {
    let mut session = lock_session(handle);
    match session.take() {
        Some(_) => {
            info!("event=cart_close module=ffi status=ok");
            CartActionResponse::success("Cart closed.", Vec::new())
        }
        None => {
            log_not_open("cart_close");
            CartActionResponse::failure("cart_close", &CartError::NotOpen, Vec::new())
        }
    }
}

fn run_action(
    handle: &CartHandle,
    action: &'static str,
    f: impl FnOnce(&mut Store) -> CartResult<CartChange>,
) -> CartActionResponse {
    let mut session = lock_session(handle);
    let Some(store) = session.as_mut() else {
        log_not_open(action);
        return CartActionResponse::failure(action, &CartError::NotOpen, Vec::new());
    };

    let result = f(store);
    let items = to_items(store.entries());
    match result {
        Ok(change) => CartActionResponse::success(change_message(change), items),
        Err(err) => CartActionResponse::failure(action, &err, items),
    }
}

fn lock_session(handle: &CartHandle) -> MutexGuard<'_, Option<Store>> {
    // Mutators keep `entries` consistent at every step.
    handle.session.lock().unwrap_or_else(|poisoned| {
        warn!("event=cart_lock module=ffi status=recovered reason=poisoned");
        PoisonError::into_inner(poisoned)
    })
}

fn log_not_open(action: &str) {
    warn!("event=cart_api module=ffi status=error action={action} error_code=not_open");
}

fn change_message(change: CartChange) -> String {
    match change {
        CartChange::Added => "Added to cart.".to_string(),
        CartChange::Incremented { quantity } | CartChange::Decremented { quantity } => {
            format!("Quantity is now {quantity}.")
        }
        CartChange::Unchanged => "Cart unchanged.".to_string(),
    }
}

fn to_items(entries: &[CartEntry]) -> Vec<CartItem> {
    entries
        .iter()
        .map(|entry| CartItem {
            id: entry.id.clone(),
            title: entry.title.clone(),
            image_url: entry.image_url.clone(),
            price: entry.price,
            quantity: entry.quantity,
        })
        .collect()
}

fn resolve_cart_db_path(db_path: Option<String>) -> PathBuf {
    let explicit = db_path
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    if let Some(path) = explicit {
        return path;
    }

    if let Ok(raw) = std::env::var(CART_DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(CART_DB_FILE_NAME)
}
