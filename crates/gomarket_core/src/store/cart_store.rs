//! Persisted cart store.
//!
//! # Responsibility
//! - Load the cart from its storage slot exactly once, at construction.
//! - Apply add/increment/decrement and write the whole cart back afterward.
//! - Migrate carts saved under legacy slot keys.
//!
//! # Invariants
//! - `entries` never holds two lines with the same id.
//! - Decrement never drives a quantity below zero; zero-quantity lines stay.
//! - Every successful mutation is followed by a full-snapshot write.
//! - A failed write keeps the in-memory change and reports the storage error.
//! - An undecodable slot is dropped on load instead of failing startup.

use crate::model::cart_entry::{CartEntry, CartEntryValidationError, CartSummary};
use crate::repo::slot_repo::{RepoError, SlotRepository};
use crate::store::config::CartConfig;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Warning shown to the user when a decrement is refused.
pub const QUANTITY_BELOW_ZERO_ALERT: &str =
    "Operation not permitted: quantity cannot go below zero.";

pub type CartResult<T> = Result<T, CartError>;

/// Error taxonomy for cart operations.
#[derive(Debug)]
pub enum CartError {
    /// New cart line failed validation.
    Validation(CartEntryValidationError),
    /// Slot storage failure.
    Repo(RepoError),
    /// Persisted slot content cannot be turned back into a cart.
    CorruptSlot { key: String, message: String },
    /// Cart could not be serialized for persistence.
    Encode(serde_json::Error),
    /// Decrement refused because the line is already at zero.
    QuantityBelowZero { id: String },
    /// Cart API used outside an open cart session.
    NotOpen,
}

impl CartError {
    /// User-facing alert text for recoverable, user-triggered conditions.
    ///
    /// Returns `None` for storage and programming errors.
    pub fn user_alert(&self) -> Option<&'static str> {
        match self {
            Self::QuantityBelowZero { .. } => Some(QUANTITY_BELOW_ZERO_ALERT),
            _ => None,
        }
    }
}

impl Display for CartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::CorruptSlot { key, message } => {
                write!(f, "cart slot `{key}` holds invalid data: {message}")
            }
            Self::Encode(err) => write!(f, "failed to encode cart: {err}"),
            Self::QuantityBelowZero { id } => write!(
                f,
                "operation not permitted: quantity of `{id}` cannot go below zero"
            ),
            Self::NotOpen => write!(f, "cart used outside an open cart session"),
        }
    }
}

impl Error for CartError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::CorruptSlot { .. } | Self::QuantityBelowZero { .. } | Self::NotOpen => None,
        }
    }
}

impl From<CartEntryValidationError> for CartError {
    fn from(value: CartEntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CartError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// What `CartStore::load` found in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No cart was persisted; the store starts empty.
    Empty,
    /// Cart restored from the current slot.
    Restored { count: usize },
    /// Cart restored from a legacy slot and moved to the current one.
    Migrated { from_key: String, count: usize },
    /// Stored cart was unreadable and dropped; the store starts empty.
    Discarded { key: String, reason: String },
}

/// Effect of a successful mutator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Added,
    /// Existing line quantity went up; carries the new quantity.
    Incremented { quantity: u32 },
    /// Existing line quantity went down; carries the new quantity.
    Decremented { quantity: u32 },
    /// Target id is not in the cart; nothing changed.
    Unchanged,
}

/// Cart state container persisted through a `SlotRepository`.
pub struct CartStore<R: SlotRepository> {
    repo: R,
    config: CartConfig,
    entries: Vec<CartEntry>,
}

impl<R: SlotRepository> CartStore<R> {
    /// Builds a store by loading its slot.
    ///
    /// The loaded cart fully replaces in-memory state and is written back to
    /// `config.slot_key`. When the current slot is empty, legacy slots are
    /// tried in order; the first one found is moved to the current slot.
    /// A slot that cannot be decoded is dropped and reported as
    /// `LoadOutcome::Discarded`, so a damaged cart never blocks startup.
    ///
    /// # Errors
    /// - `Repo` on storage failures.
    pub fn load(repo: R, config: CartConfig) -> CartResult<(Self, LoadOutcome)> {
        let started_at = Instant::now();

        let (entries, outcome) = match repo.read_slot(&config.slot_key)? {
            Some(raw) => restore_slot(&config.slot_key, &raw, false),
            None => match read_legacy_slot(&repo, &config)? {
                Some((from_key, raw)) => restore_slot(&from_key, &raw, true),
                None => (Vec::new(), LoadOutcome::Empty),
            },
        };

        let store = Self {
            repo,
            config,
            entries,
        };
        store.persist()?;

        let stale_key = match &outcome {
            LoadOutcome::Migrated { from_key, .. } => Some(from_key),
            LoadOutcome::Discarded { key, .. } if key != &store.config.slot_key => Some(key),
            _ => None,
        };
        if let Some(key) = stale_key {
            store.repo.remove_slot(key)?;
        }

        info!(
            "event=cart_load module=store status=ok outcome={} items={} duration_ms={}",
            outcome_label(&outcome),
            store.entries.len(),
            started_at.elapsed().as_millis()
        );
        Ok((store, outcome))
    }

    /// Adds one product to the cart.
    ///
    /// New ids are appended with the candidate's own quantity. Known ids get
    /// their quantity bumped by one and the candidate's fields are dropped.
    pub fn add_to_cart(&mut self, candidate: CartEntry) -> CartResult<CartChange> {
        let change = match self.position(&candidate.id) {
            Some(index) => CartChange::Incremented {
                quantity: self.bump(index),
            },
            None => {
                candidate.validate()?;
                self.entries.push(candidate);
                CartChange::Added
            }
        };

        debug!(
            "event=cart_add module=store status=ok change={:?} items={}",
            change,
            self.entries.len()
        );
        self.persist()?;
        Ok(change)
    }

    /// Raises the quantity of `id` by one; unknown ids are ignored.
    pub fn increment(&mut self, id: &str) -> CartResult<CartChange> {
        let Some(index) = self.position(id) else {
            debug!("event=cart_increment module=store status=skipped reason=not_found");
            return Ok(CartChange::Unchanged);
        };

        let quantity = self.bump(index);
        self.persist()?;
        Ok(CartChange::Incremented { quantity })
    }

    /// Lowers the quantity of `id` by one; unknown ids are ignored.
    ///
    /// # Errors
    /// - `QuantityBelowZero` when the line is already at zero. State is left
    ///   untouched and nothing is written.
    pub fn decrement(&mut self, id: &str) -> CartResult<CartChange> {
        let Some(index) = self.position(id) else {
            debug!("event=cart_decrement module=store status=skipped reason=not_found");
            return Ok(CartChange::Unchanged);
        };
        let Some(entry) = self.entries.get_mut(index) else {
            return Ok(CartChange::Unchanged);
        };

        if entry.quantity == 0 {
            warn!("event=cart_decrement module=store status=refused reason=quantity_zero");
            return Err(CartError::QuantityBelowZero { id: id.to_string() });
        }

        entry.quantity -= 1;
        let quantity = entry.quantity;
        self.persist()?;
        Ok(CartChange::Decremented { quantity })
    }

    /// Current cart lines in insertion order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Owned copy of the current cart lines.
    pub fn snapshot(&self) -> Vec<CartEntry> {
        self.entries.clone()
    }

    /// Looks up one cart line by id.
    pub fn get(&self, id: &str) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Totals over the current cart.
    pub fn summary(&self) -> CartSummary {
        CartSummary::from_entries(&self.entries)
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Storage backing this store.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    fn bump(&mut self, index: usize) -> u32 {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.quantity = entry.quantity.saturating_add(1);
                entry.quantity
            }
            None => 0,
        }
    }

    fn persist(&self) -> CartResult<()> {
        let payload = serde_json::to_string(&self.entries).map_err(CartError::Encode)?;
        if let Err(err) = self.repo.write_slot(&self.config.slot_key, &payload) {
            error!(
                "event=cart_persist module=store status=error items={} error={}",
                self.entries.len(),
                err
            );
            return Err(err.into());
        }
        Ok(())
    }
}

fn read_legacy_slot<R: SlotRepository>(
    repo: &R,
    config: &CartConfig,
) -> CartResult<Option<(String, String)>> {
    for key in &config.legacy_slot_keys {
        if key == &config.slot_key {
            continue;
        }
        if let Some(raw) = repo.read_slot(key)? {
            return Ok(Some((key.clone(), raw)));
        }
    }
    Ok(None)
}

fn restore_slot(key: &str, raw: &str, legacy: bool) -> (Vec<CartEntry>, LoadOutcome) {
    match decode_entries(key, raw) {
        Ok(entries) => {
            let count = entries.len();
            let outcome = if legacy {
                LoadOutcome::Migrated {
                    from_key: key.to_string(),
                    count,
                }
            } else {
                LoadOutcome::Restored { count }
            };
            (entries, outcome)
        }
        Err(err) => {
            warn!(
                "event=cart_load module=store status=discarded legacy={legacy} error={err}"
            );
            (
                Vec::new(),
                LoadOutcome::Discarded {
                    key: key.to_string(),
                    reason: err.to_string(),
                },
            )
        }
    }
}

fn decode_entries(key: &str, raw: &str) -> CartResult<Vec<CartEntry>> {
    let entries: Vec<CartEntry> =
        serde_json::from_str(raw).map_err(|err| CartError::CorruptSlot {
            key: key.to_string(),
            message: err.to_string(),
        })?;

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in &entries {
        if !seen.insert(entry.id.as_str()) {
            return Err(CartError::CorruptSlot {
                key: key.to_string(),
                message: format!("duplicate cart entry id `{}`", entry.id),
            });
        }
    }

    Ok(entries)
}

fn outcome_label(outcome: &LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Empty => "empty",
        LoadOutcome::Restored { .. } => "restored",
        LoadOutcome::Migrated { .. } => "migrated",
        LoadOutcome::Discarded { .. } => "discarded",
    }
}
