//! Sold and stitch bills.
//!
//! Bill numbers are unique within a [`BillKind`]; the same number may appear
//! once as a sold bill and once as a stitch bill.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

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
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BillKind {
  Stitched,
  Sold,
}

/// One garment line on a stitch bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothLine {
  pub item:     String,
  #[serde(default = "one")]
  pub quantity: u32,
  pub amount:   f64,
}

fn one() -> u32 { 1 }

// ─── Sold bill ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldBill {
  #[serde(rename = "_id")]
  pub bill_id:      Uuid,
  pub name:         String,
  /// The operator who raised the bill.
  #[serde(rename = "user_id")]
  pub user_id:      Uuid,
  #[serde(rename = "customer_id")]
  pub customer_id:  Uuid,
  pub bill_number:  String,
  pub phone_number: String,
  pub cloth_amt:    f64,
  pub total_amt:    f64,
  pub created_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSoldBill {
  pub name:         String,
  pub user_id:      Uuid,
  pub customer_id:  Uuid,
  pub bill_number:  String,
  pub phone_number: String,
  pub cloth_amt:    f64,
  pub total_amt:    f64,
}

// ─── Stitch bill ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StitchBill {
  #[serde(rename = "_id")]
  pub bill_id:       Uuid,
  pub name:          String,
  #[serde(rename = "user_id")]
  pub user_id:       Uuid,
  #[serde(rename = "customer_id")]
  pub customer_id:   Uuid,
  pub bill_number:   String,
  pub phone_number:  String,
  pub delivery_date: NaiveDate,
  pub cloth_amt:     f64,
  pub clothes:       Vec<ClothLine>,
  pub sub_total:     f64,
  pub advance_amt:   f64,
  /// Always `sub_total - advance_amt`.
  pub total_amt:     f64,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStitchBill {
  pub name:          String,
  pub user_id:       Uuid,
  pub customer_id:   Uuid,
  pub bill_number:   String,
  pub phone_number:  String,
  pub delivery_date: NaiveDate,
  pub cloth_amt:     f64,
  pub clothes:       Vec<ClothLine>,
  pub sub_total:     f64,
  pub advance_amt:   f64,
  pub total_amt:     f64,
}
