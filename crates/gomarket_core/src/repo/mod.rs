//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value slot contract the cart store persists through.
//! - Isolate SQLite query details from cart orchestration.
//!
//! # Invariants
//! - Slot keys are trimmed and never empty.
//! - Slot writes replace the whole stored value.

pub mod slot_repo;
