//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, dates are `YYYY-MM-DD`, UUIDs are
//! hyphenated lowercase strings. Structured fields (price maps, body
//! measurements, cloth lines) are compact JSON.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use stitchbook_core::{
  bill::{ClothLine, SoldBill, StitchBill},
  catalog::ClothingItem,
  identity::{Identity, Role},
  measurement::{BodyMeasurements, Measurement, MeasurementHistory},
  profile::{PriceMap, StaffKind, StaffProfile},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> &'static str { role.into() }

pub fn decode_role(s: &str) -> Result<Role> {
  s.parse().map_err(|_| Error::UnknownTag { what: "role", value: s.to_owned() })
}

pub fn encode_staff_kind(kind: StaffKind) -> &'static str { encode_role(kind.role()) }

pub fn decode_staff_kind(s: &str) -> Result<StaffKind> {
  decode_role(s)?
    .staff_kind()
    .ok_or_else(|| Error::UnknownTag { what: "staff kind", value: s.to_owned() })
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_price_map(map: &PriceMap) -> Result<String> { Ok(serde_json::to_string(map)?) }

pub fn encode_measurements(m: &BodyMeasurements) -> Result<String> {
  Ok(serde_json::to_string(m)?)
}

pub fn encode_clothes(lines: &[ClothLine]) -> Result<String> {
  Ok(serde_json::to_string(lines)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "user_id, name, phone_number, password_hash, avatar, role, refresh_token, created_at";

/// Raw strings read directly from a `users` row.
pub struct RawIdentity {
  pub user_id:       String,
  pub name:          String,
  pub phone_number:  String,
  pub password_hash: String,
  pub avatar:        String,
  pub role:          String,
  pub refresh_token: Option<String>,
  pub created_at:    String,
}

impl RawIdentity {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      name:          row.get(1)?,
      phone_number:  row.get(2)?,
      password_hash: row.get(3)?,
      avatar:        row.get(4)?,
      role:          row.get(5)?,
      refresh_token: row.get(6)?,
      created_at:    row.get(7)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      user_id:       decode_uuid(&self.user_id)?,
      name:          self.name,
      phone_number:  self.phone_number,
      password_hash: self.password_hash,
      avatar:        self.avatar,
      role:          decode_role(&self.role)?,
      refresh_token: self.refresh_token,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const STAFF_COLUMNS: &str = "profile_id, user_document, kind, name, phone_number, avatar, \
                                 monthly, advance, earned, price_map, created_at";

pub struct RawStaffProfile {
  pub profile_id:    String,
  pub user_document: String,
  pub kind:          String,
  pub name:          String,
  pub phone_number:  String,
  pub avatar:        String,
  pub monthly:       f64,
  pub advance:       f64,
  pub earned:        f64,
  pub price_map:     String,
  pub created_at:    String,
}

impl RawStaffProfile {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id:    row.get(0)?,
      user_document: row.get(1)?,
      kind:          row.get(2)?,
      name:          row.get(3)?,
      phone_number:  row.get(4)?,
      avatar:        row.get(5)?,
      monthly:       row.get(6)?,
      advance:       row.get(7)?,
      earned:        row.get(8)?,
      price_map:     row.get(9)?,
      created_at:    row.get(10)?,
    })
  }

  pub fn into_profile(self) -> Result<StaffProfile> {
    Ok(StaffProfile {
      profile_id:    decode_uuid(&self.profile_id)?,
      user_document: decode_uuid(&self.user_document)?,
      kind:          decode_staff_kind(&self.kind)?,
      name:          self.name,
      phone_number:  self.phone_number,
      avatar:        self.avatar,
      monthly:       self.monthly,
      advance:       self.advance,
      earned:        self.earned,
      price_map:     serde_json::from_str(&self.price_map)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// A `customers` row plus its two ordered id lists.
pub struct RawCustomer {
  pub customer_id:    String,
  pub user_id:        String,
  pub name:           String,
  pub created_at:     String,
  pub measurements:   Vec<String>,
  pub stitched_bills: Vec<String>,
}

impl RawCustomer {
  pub fn into_customer(self) -> Result<stitchbook_core::profile::Customer> {
    Ok(stitchbook_core::profile::Customer {
      customer_id:    decode_uuid(&self.customer_id)?,
      user_id:        decode_uuid(&self.user_id)?,
      name:           self.name,
      measurements:   self
        .measurements
        .iter()
        .map(|s| decode_uuid(s))
        .collect::<Result<_>>()?,
      stitched_bills: self
        .stitched_bills
        .iter()
        .map(|s| decode_uuid(s))
        .collect::<Result<_>>()?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

pub const CLOTHING_COLUMNS: &str =
  "name, stitching, default_stitching_amt, default_cutting_amt, created_at";

pub struct RawClothingItem {
  pub name:                  String,
  pub stitching:             bool,
  pub default_stitching_amt: f64,
  pub default_cutting_amt:   f64,
  pub created_at:            String,
}

impl RawClothingItem {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name:                  row.get(0)?,
      stitching:             row.get(1)?,
      default_stitching_amt: row.get(2)?,
      default_cutting_amt:   row.get(3)?,
      created_at:            row.get(4)?,
    })
  }

  pub fn into_item(self) -> Result<ClothingItem> {
    Ok(ClothingItem {
      name:                  self.name,
      stitching:             self.stitching,
      default_stitching_amt: self.default_stitching_amt,
      default_cutting_amt:   self.default_cutting_amt,
      created_at:            decode_dt(&self.created_at)?,
    })
  }
}

pub const MEASUREMENT_COLUMNS: &str =
  "measurement_id, customer_id, measurements, customer_requirements, drawing, created_at";

pub struct RawMeasurement {
  pub measurement_id:        String,
  pub customer_id:           String,
  pub measurements:          String,
  pub customer_requirements: Option<String>,
  pub drawing:               Option<String>,
  pub created_at:            String,
}

impl RawMeasurement {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      measurement_id:        row.get(0)?,
      customer_id:           row.get(1)?,
      measurements:          row.get(2)?,
      customer_requirements: row.get(3)?,
      drawing:               row.get(4)?,
      created_at:            row.get(5)?,
    })
  }

  pub fn into_measurement(self) -> Result<Measurement> {
    Ok(Measurement {
      measurement_id:        decode_uuid(&self.measurement_id)?,
      customer_id:           decode_uuid(&self.customer_id)?,
      measurements:          serde_json::from_str(&self.measurements)?,
      customer_requirements: self.customer_requirements,
      drawing:               self.drawing,
      created_at:            decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawHistory {
  pub history_id:     String,
  pub measurement_id: String,
  pub customer_id:    String,
  pub recorded_at:    String,
}

impl RawHistory {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      history_id:     row.get(0)?,
      measurement_id: row.get(1)?,
      customer_id:    row.get(2)?,
      recorded_at:    row.get(3)?,
    })
  }

  pub fn into_history(self) -> Result<MeasurementHistory> {
    Ok(MeasurementHistory {
      history_id:     decode_uuid(&self.history_id)?,
      measurement_id: decode_uuid(&self.measurement_id)?,
      customer_id:    decode_uuid(&self.customer_id)?,
      recorded_at:    decode_dt(&self.recorded_at)?,
    })
  }
}

pub const SOLD_BILL_COLUMNS: &str = "bill_id, name, user_id, customer_id, bill_number, \
                                     phone_number, cloth_amt, total_amt, created_at";

pub struct RawSoldBill {
  pub bill_id:      String,
  pub name:         String,
  pub user_id:      String,
  pub customer_id:  String,
  pub bill_number:  String,
  pub phone_number: String,
  pub cloth_amt:    f64,
  pub total_amt:    f64,
  pub created_at:   String,
}

impl RawSoldBill {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      bill_id:      row.get(0)?,
      name:         row.get(1)?,
      user_id:      row.get(2)?,
      customer_id:  row.get(3)?,
      bill_number:  row.get(4)?,
      phone_number: row.get(5)?,
      cloth_amt:    row.get(6)?,
      total_amt:    row.get(7)?,
      created_at:   row.get(8)?,
    })
  }

  pub fn into_bill(self) -> Result<SoldBill> {
    Ok(SoldBill {
      bill_id:      decode_uuid(&self.bill_id)?,
      name:         self.name,
      user_id:      decode_uuid(&self.user_id)?,
      customer_id:  decode_uuid(&self.customer_id)?,
      bill_number:  self.bill_number,
      phone_number: self.phone_number,
      cloth_amt:    self.cloth_amt,
      total_amt:    self.total_amt,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

pub const STITCH_BILL_COLUMNS: &str =
  "bill_id, name, user_id, customer_id, bill_number, phone_number, delivery_date, \
   cloth_amt, clothes, sub_total, advance_amt, total_amt, created_at";

pub struct RawStitchBill {
  pub bill_id:       String,
  pub name:          String,
  pub user_id:       String,
  pub customer_id:   String,
  pub bill_number:   String,
  pub phone_number:  String,
  pub delivery_date: String,
  pub cloth_amt:     f64,
  pub clothes:       String,
  pub sub_total:     f64,
  pub advance_amt:   f64,
  pub total_amt:     f64,
  pub created_at:    String,
}

impl RawStitchBill {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      bill_id:       row.get(0)?,
      name:          row.get(1)?,
      user_id:       row.get(2)?,
      customer_id:   row.get(3)?,
      bill_number:   row.get(4)?,
      phone_number:  row.get(5)?,
      delivery_date: row.get(6)?,
      cloth_amt:     row.get(7)?,
      clothes:       row.get(8)?,
      sub_total:     row.get(9)?,
      advance_amt:   row.get(10)?,
      total_amt:     row.get(11)?,
      created_at:    row.get(12)?,
    })
  }

  pub fn into_bill(self) -> Result<StitchBill> {
    Ok(StitchBill {
      bill_id:       decode_uuid(&self.bill_id)?,
      name:          self.name,
      user_id:       decode_uuid(&self.user_id)?,
      customer_id:   decode_uuid(&self.customer_id)?,
      bill_number:   self.bill_number,
      phone_number:  self.phone_number,
      delivery_date: decode_date(&self.delivery_date)?,
      cloth_amt:     self.cloth_amt,
      clothes:       serde_json::from_str(&self.clothes)?,
      sub_total:     self.sub_total,
      advance_amt:   self.advance_amt,
      total_amt:     self.total_amt,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
