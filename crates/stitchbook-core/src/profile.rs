//! Role profiles: the per-role extension of an identity.
//!
//! Staff (helpers, cutting masters, tailors) share one profile shape and
//! differ only in how their price map is seeded. Customers own ordered lists
//! of measurement and stitched-bill ids.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{catalog::ClothingItem, identity::Role};

/// Clothing-item name → amount an operator charges for it.
pub type PriceMap = BTreeMap<String, f64>;

// ─── Staff ───────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffKind {
  Helper,
  #[strum(to_string = "Cutting Master")]
  CuttingMaster,
  Tailor,
}

impl StaffKind {
  pub fn role(self) -> Role {
    match self {
      Self::Helper => Role::Helper,
      Self::CuttingMaster => Role::CuttingMaster,
      Self::Tailor => Role::Tailor,
    }
  }

  /// Parse a role tag as sent by clients. Only staff roles are accepted.
  pub fn from_role_tag(tag: &str) -> Option<Self> {
    tag.trim().parse::<Role>().ok().and_then(Role::staff_kind)
  }

  /// Seed a price map from the catalog as it stands now.
  ///
  /// Cutting masters take each item's default cutting amount, tailors the
  /// default stitching amount. Helpers carry no prices. An empty catalog
  /// yields an empty map.
  pub fn seed_prices(self, catalog: &[ClothingItem]) -> PriceMap {
    let pick: fn(&ClothingItem) -> f64 = match self {
      Self::Helper => return PriceMap::new(),
      Self::CuttingMaster => |item| item.default_cutting_amt,
      Self::Tailor => |item| item.default_stitching_amt,
    };
    catalog
      .iter()
      .map(|item| (item.name.clone(), pick(item)))
      .collect()
  }
}

/// A helper, cutting master or tailor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
  #[serde(rename = "_id")]
  pub profile_id:    Uuid,
  /// Back-reference to the owning [`crate::identity::Identity`].
  pub user_document: Uuid,
  pub kind:          StaffKind,
  pub name:          String,
  pub phone_number:  String,
  pub avatar:        String,
  pub monthly:       f64,
  pub advance:       f64,
  pub earned:        f64,
  pub price_map:     PriceMap,
  pub created_at:    DateTime<Utc>,
}

/// Fields of a staff profile that may be patched. `None` means "leave alone";
/// `Some(0.0)` is applied like any other value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffPatch {
  pub name:         Option<String>,
  pub phone_number: Option<String>,
  pub avatar:       Option<String>,
  pub advance:      Option<f64>,
  pub earned:       Option<f64>,
  pub monthly:      Option<f64>,
}

impl StaffPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  pub fn apply(self, profile: &mut StaffProfile) {
    if let Some(name) = self.name {
      profile.name = name;
    }
    if let Some(phone) = self.phone_number {
      profile.phone_number = phone;
    }
    if let Some(avatar) = self.avatar {
      profile.avatar = avatar;
    }
    if let Some(advance) = self.advance {
      profile.advance = advance;
    }
    if let Some(earned) = self.earned {
      profile.earned = earned;
    }
    if let Some(monthly) = self.monthly {
      profile.monthly = monthly;
    }
  }
}

// ─── Customer ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
  #[serde(rename = "_id")]
  pub customer_id:    Uuid,
  #[serde(rename = "user_id")]
  pub user_id:        Uuid,
  pub name:           String,
  /// Measurement ids, oldest first.
  pub measurements:   Vec<Uuid>,
  /// Stitch-bill ids, oldest first.
  #[serde(rename = "stitchedBill")]
  pub stitched_bills: Vec<Uuid>,
  pub created_at:     DateTime<Utc>,
}

/// A customer joined with its identity, as shown in customer listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
  pub customer_id:  Uuid,
  pub name:         String,
  pub phone_number: String,
  pub avatar:       String,
}

// ─── NewProfile ──────────────────────────────────────────────────────────────

/// The profile half of [`crate::store::Store::register`].
#[derive(Debug, Clone)]
pub enum NewProfile {
  Staff(NewStaffProfile),
  Customer { name: String },
}

#[derive(Debug, Clone)]
pub struct NewStaffProfile {
  pub kind:         StaffKind,
  pub name:         String,
  pub phone_number: String,
  pub avatar:       String,
  pub monthly:      f64,
  pub price_map:    PriceMap,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(name: &str, stitching: f64, cutting: f64) -> ClothingItem {
    ClothingItem {
      name: name.into(),
      stitching: true,
      default_stitching_amt: stitching,
      default_cutting_amt: cutting,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn cutting_master_prices_follow_cutting_defaults() {
    let catalog = vec![item("Shirt", 300.0, 80.0), item("Kurta", 450.0, 120.0)];
    let prices = StaffKind::CuttingMaster.seed_prices(&catalog);
    assert_eq!(prices.len(), 2);
    assert_eq!(prices["Shirt"], 80.0);
    assert_eq!(prices["Kurta"], 120.0);
  }

  #[test]
  fn tailor_prices_follow_stitching_defaults() {
    let catalog = vec![item("Shirt", 300.0, 80.0)];
    let prices = StaffKind::Tailor.seed_prices(&catalog);
    assert_eq!(prices["Shirt"], 300.0);
  }

  #[test]
  fn empty_catalog_gives_empty_map() {
    assert!(StaffKind::Tailor.seed_prices(&[]).is_empty());
    assert!(StaffKind::Helper.seed_prices(&[item("Shirt", 1.0, 1.0)]).is_empty());
  }

  #[test]
  fn role_tags_map_to_staff_kinds() {
    assert_eq!(StaffKind::from_role_tag("HELPER"), Some(StaffKind::Helper));
    assert_eq!(
      StaffKind::from_role_tag("CUTTING MASTER"),
      Some(StaffKind::CuttingMaster)
    );
    assert_eq!(StaffKind::from_role_tag("TAILOR"), Some(StaffKind::Tailor));
    assert_eq!(StaffKind::from_role_tag("ADMIN"), None);
    assert_eq!(StaffKind::from_role_tag("CUSTOMER"), None);
    assert_eq!(StaffKind::from_role_tag("JANITOR"), None);
  }

  #[test]
  fn patch_applies_zero_values() {
    let mut profile = StaffProfile {
      profile_id:    Uuid::new_v4(),
      user_document: Uuid::new_v4(),
      kind:          StaffKind::Helper,
      name:          "Anil".into(),
      phone_number:  "111".into(),
      avatar:        "a.png".into(),
      monthly:       5000.0,
      advance:       200.0,
      earned:        0.0,
      price_map:     PriceMap::new(),
      created_at:    Utc::now(),
    };
    StaffPatch { advance: Some(0.0), ..Default::default() }.apply(&mut profile);
    assert_eq!(profile.advance, 0.0);
    assert_eq!(profile.monthly, 5000.0);
    assert_eq!(profile.name, "Anil");
  }
}
