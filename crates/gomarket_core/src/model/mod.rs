//! Cart domain model.
//!
//! # Responsibility
//! - Define the product line shape kept in the cart and persisted to storage.
//! - Provide read-only projections derived from cart contents.
//!
//! # Invariants
//! - Every cart line is identified by a non-empty product id.
//! - Quantities are unsigned; a line can reach zero but never go below it.

pub mod cart_entry;
