//! Cart line domain model.
//!
//! # Responsibility
//! - Define the canonical cart line shared by storage and UI projections.
//! - Validate product identity and pricing before a line enters the cart.
//!
//! # Invariants
//! - `id` is non-empty after trimming.
//! - `price` is finite and never negative.
//! - Deserialized lines go through the same validation as constructed ones.
//! - Stored negative quantities are read back as zero.

use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Product identifier as supplied by the catalog.
pub type ProductId = String;

/// Validation errors for cart line invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEntryValidationError {
    /// Product id is empty or whitespace only.
    EmptyId,
    /// Price is negative, NaN or infinite.
    InvalidPrice { id: ProductId, price: f64 },
}

impl Display for CartEntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "cart entry id must not be empty"),
            Self::InvalidPrice { id, price } => write!(
                f,
                "cart entry `{id}` has invalid price {price}; expected a finite value >= 0"
            ),
        }
    }
}

impl Error for CartEntryValidationError {}

/// One product line in the cart.
///
/// Serialized with the field names the device storage slot has always used,
/// so previously persisted carts stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CartEntryWire")]
pub struct CartEntry {
    /// Catalog product id; unique within a cart.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display image reference.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
    /// Units of this product in the cart.
    pub quantity: u32,
}

#[derive(Deserialize)]
struct CartEntryWire {
    id: ProductId,
    title: String,
    #[serde(alias = "imageUrl")]
    image_url: String,
    price: f64,
    quantity: i64,
}

impl TryFrom<CartEntryWire> for CartEntry {
    type Error = CartEntryValidationError;

    fn try_from(wire: CartEntryWire) -> Result<Self, Self::Error> {
        let entry = Self {
            id: wire.id,
            title: wire.title,
            image_url: wire.image_url,
            price: wire.price,
            quantity: clamp_stored_quantity(wire.quantity),
        };
        entry.validate()?;
        Ok(entry)
    }
}

fn clamp_stored_quantity(quantity: i64) -> u32 {
    if quantity < 0 {
        warn!("event=cart_entry_decode module=model status=repaired reason=negative_quantity");
        return 0;
    }
    u32::try_from(quantity).unwrap_or(u32::MAX)
}

impl CartEntry {
    /// Creates a validated cart line with quantity `1`.
    ///
    /// # Errors
    /// - Returns `EmptyId` when `id` is blank.
    /// - Returns `InvalidPrice` when `price` is negative or not finite.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Result<Self, CartEntryValidationError> {
        let entry = Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
            quantity: 1,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Returns this line with an explicit starting quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Checks line invariants.
    pub fn validate(&self) -> Result<(), CartEntryValidationError> {
        if self.id.trim().is_empty() {
            return Err(CartEntryValidationError::EmptyId);
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CartEntryValidationError::InvalidPrice {
                id: self.id.clone(),
                price: self.price,
            });
        }
        Ok(())
    }

    /// Unit price multiplied by quantity.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Read-only totals shown by cart and checkout screens.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CartSummary {
    /// Number of lines in the cart, including zero-quantity lines.
    pub distinct_items: u64,
    /// Sum of all line quantities.
    pub total_quantity: u64,
    /// Sum of all line totals.
    pub subtotal: f64,
}

impl CartSummary {
    /// Computes totals over an ordered slice of cart lines.
    pub fn from_entries(entries: &[CartEntry]) -> Self {
        entries.iter().fold(
            Self {
                distinct_items: entries.len() as u64,
                ..Self::default()
            },
            |mut acc, entry| {
                acc.total_quantity += u64::from(entry.quantity);
                acc.subtotal += entry.line_total();
                acc
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_stored_quantity, CartEntry, CartEntryValidationError, CartSummary};

    #[test]
    fn new_defaults_quantity_to_one() {
        let entry = CartEntry::new("p-1", "Mug", "https://img/mug.png", 12.5).unwrap();
        assert_eq!(entry.quantity, 1);
        assert_eq!(entry.line_total(), 12.5);
    }

    #[test]
    fn validate_rejects_blank_id_and_negative_price() {
        let err = CartEntry::new("  ", "Mug", "", 1.0).unwrap_err();
        assert_eq!(err, CartEntryValidationError::EmptyId);

        let err = CartEntry::new("p-1", "Mug", "", -0.5).unwrap_err();
        assert!(matches!(err, CartEntryValidationError::InvalidPrice { .. }));

        let err = CartEntry::new("p-1", "Mug", "", f64::NAN).unwrap_err();
        assert!(err.to_string().contains("invalid price"));
    }

    #[test]
    fn stored_quantity_is_clamped_into_range() {
        assert_eq!(clamp_stored_quantity(-4), 0);
        assert_eq!(clamp_stored_quantity(3), 3);
        assert_eq!(clamp_stored_quantity(i64::MAX), u32::MAX);
    }

    #[test]
    fn summary_counts_zero_quantity_lines() {
        let entries = vec![
            CartEntry::new("a", "A", "", 10.0).unwrap().with_quantity(2),
            CartEntry::new("b", "B", "", 3.0).unwrap().with_quantity(0),
        ];
        let summary = CartSummary::from_entries(&entries);
        assert_eq!(summary.distinct_items, 2);
        assert_eq!(summary.total_quantity, 2);
        assert_eq!(summary.subtotal, 20.0);
    }
}
