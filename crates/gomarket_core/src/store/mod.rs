//! Cart state container.
//!
//! # Responsibility
//! - Own the ordered list of cart lines for one device.
//! - Persist the full list to a storage slot after every change.
//!
//! # Invariants
//! - No two cart lines share an id.
//! - A store only exists after its slot has been loaded.

pub mod cart_store;
pub mod config;
