//! Cart persistence configuration.

/// Storage slot currently used for the serialized cart.
pub const CART_SLOT_KEY: &str = "@gomarketplace:2";
/// Slot written by earlier app releases; migrated on first load.
pub const LEGACY_CART_SLOT_KEY: &str = "@gomarketplace";

/// Where a `CartStore` reads and writes its serialized entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Slot holding the JSON array of cart entries.
    pub slot_key: String,
    /// Older slots checked, in order, when `slot_key` is empty.
    pub legacy_slot_keys: Vec<String>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            slot_key: CART_SLOT_KEY.to_string(),
            legacy_slot_keys: vec![LEGACY_CART_SLOT_KEY.to_string()],
        }
    }
}

impl CartConfig {
    /// Config with a custom slot and no legacy fallbacks.
    pub fn with_slot_key(slot_key: impl Into<String>) -> Self {
        Self {
            slot_key: slot_key.into(),
            legacy_slot_keys: Vec::new(),
        }
    }
}
