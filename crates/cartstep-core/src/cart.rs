//! # Cart Items
//!
//! The item shape shared by quote contents and proposed cart changes.
//!
//! ## Dual-Key Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sku        - product identity: policy lookup, current-quantity lookup  │
//! │  group_key  - line identity: the same SKU in two cart configurations    │
//! │               (gift-wrapped vs plain) gets two group keys               │
//! │                                                                         │
//! │  group_key falls back to sku when absent.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A cart line: either an item already in the quote or a proposed change.
///
/// For changes, `quantity` is the magnitude of the delta. The validator
/// applies the sign (add vs remove), never the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Stock Keeping Unit.
    pub sku: String,

    /// Line-item identifier, defaults to the SKU.
    #[serde(default)]
    pub group_key: Option<String>,

    /// Quantity in the quote, or requested delta for a change.
    pub quantity: f64,
}

impl CartItem {
    /// Creates an item addressed by SKU only.
    pub fn new(sku: impl Into<String>, quantity: f64) -> Self {
        CartItem {
            sku: sku.into(),
            group_key: None,
            quantity,
        }
    }

    /// Creates an item with an explicit group key.
    pub fn with_group_key(sku: impl Into<String>, group_key: impl Into<String>, quantity: f64) -> Self {
        CartItem {
            sku: sku.into(),
            group_key: Some(group_key.into()),
            quantity,
        }
    }

    /// The line identifier: the group key, or the SKU when none is set.
    pub fn group_key(&self) -> &str {
        self.group_key.as_deref().unwrap_or(&self.sku)
    }
}
