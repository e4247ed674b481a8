//! Clothing items: the catalog of garment types and their default prices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry. `name` is unique across the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
  pub name:                  String,
  /// Whether the shop stitches this item (as opposed to only selling cloth).
  pub stitching:             bool,
  pub default_stitching_amt: f64,
  pub default_cutting_amt:   f64,
  pub created_at:            DateTime<Utc>,
}

/// Input to [`crate::store::Store::add_clothing_item`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewClothingItem {
  pub name:                  String,
  pub stitching:             bool,
  pub default_stitching_amt: f64,
  pub default_cutting_amt:   f64,
}

/// New defaults for an existing item. Price maps already seeded from the old
/// defaults are not touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClothingItemPatch {
  pub stitching:             Option<bool>,
  pub default_stitching_amt: Option<f64>,
  pub default_cutting_amt:   Option<f64>,
}

impl ClothingItemPatch {
  pub fn apply(self, item: &mut ClothingItem) {
    if let Some(stitching) = self.stitching {
      item.stitching = stitching;
    }
    if let Some(amt) = self.default_stitching_amt {
      item.default_stitching_amt = amt;
    }
    if let Some(amt) = self.default_cutting_amt {
      item.default_cutting_amt = amt;
    }
  }
}
