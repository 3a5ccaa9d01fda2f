//! Core cart logic for the GoMarketplace app.
//! This crate is the single source of truth for cart invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::cart_entry::{CartEntry, CartEntryValidationError, CartSummary, ProductId};
pub use repo::slot_repo::{RepoError, RepoResult, SlotRepository, SqliteSlotRepository};
pub use store::cart_store::{
    CartChange, CartError, CartResult, CartStore, LoadOutcome, QUANTITY_BELOW_ZERO_ALERT,
};
pub use store::config::{CartConfig, CART_SLOT_KEY, LEGACY_CART_SLOT_KEY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Opens the cart database at `path` and loads the cart with default config.
///
/// Convenience for callers that do not need a custom slot layout.
pub fn open_cart(
    path: impl AsRef<std::path::Path>,
) -> CartResult<(CartStore<SqliteSlotRepository>, LoadOutcome)> {
    let conn = db::open_db(path).map_err(RepoError::from)?;
    CartStore::load(SqliteSlotRepository::new(conn), CartConfig::default())
}
