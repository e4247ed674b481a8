//! [`SqliteStore`]: the SQLite implementation of [`Store`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use stitchbook_core::{
  Error as CoreError,
  bill::{BillKind, NewSoldBill, NewStitchBill, SoldBill, StitchBill},
  catalog::{ClothingItem, ClothingItemPatch, NewClothingItem},
  identity::{Identity, NewIdentity},
  measurement::{Measurement, MeasurementHistory, NewMeasurement},
  profile::{Customer, CustomerSummary, NewProfile, StaffKind, StaffProfile},
  store::Store,
};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    CLOTHING_COLUMNS, MEASUREMENT_COLUMNS, RawClothingItem, RawCustomer, RawHistory,
    RawIdentity, RawMeasurement, RawSoldBill, RawStaffProfile, RawStitchBill,
    SOLD_BILL_COLUMNS, STAFF_COLUMNS, STITCH_BILL_COLUMNS, USER_COLUMNS, decode_uuid,
    encode_clothes, encode_date, encode_dt, encode_measurements, encode_price_map,
    encode_role, encode_staff_kind, encode_uuid,
  },
  schema::SCHEMA,
};

/// Outcome of a write closure: the database call itself succeeded, but the
/// write may have been refused for a domain reason.
type Outcome<T = ()> = std::result::Result<T, CoreError>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Stitchbook store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SQL helpers ─────────────────────────────────────────────────────────────

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
  )
}

fn row_exists(conn: &rusqlite::Connection, sql: &str, id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(sql, rusqlite::params![id], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

fn collect_ids(conn: &rusqlite::Connection, sql: &str, id: &str) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(sql)?;
  let ids = stmt
    .query_map(rusqlite::params![id], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(ids)
}

fn bill_table(kind: BillKind) -> &'static str {
  match kind {
    BillKind::Sold => "sold_bills",
    BillKind::Stitched => "stitch_bills",
  }
}

/// Checks shared by both bill kinds, run inside the insert transaction.
fn bill_references(
  conn: &rusqlite::Connection,
  customer_id: Uuid,
  user_id: Uuid,
) -> rusqlite::Result<Outcome> {
  if !row_exists(
    conn,
    "SELECT 1 FROM customers WHERE customer_id = ?1",
    &encode_uuid(customer_id),
  )? {
    return Ok(Err(CoreError::CustomerNotFound(customer_id)));
  }
  if !row_exists(conn, "SELECT 1 FROM users WHERE user_id = ?1", &encode_uuid(user_id))? {
    return Ok(Err(CoreError::IdentityNotFound(user_id)));
  }
  Ok(Ok(()))
}

// ─── Pending profile ─────────────────────────────────────────────────────────

/// A [`NewProfile`] encoded into column values, ready to move into a
/// connection closure.
enum PendingProfile {
  Staff {
    profile_id:   String,
    kind:         &'static str,
    name:         String,
    phone_number: String,
    avatar:       String,
    monthly:      f64,
    price_map:    String,
  },
  Customer {
    customer_id: String,
    name:        String,
  },
}

impl PendingProfile {
  fn encode(profile: NewProfile) -> Result<Self> {
    Ok(match profile {
      NewProfile::Staff(staff) => Self::Staff {
        profile_id:   encode_uuid(Uuid::new_v4()),
        kind:         encode_staff_kind(staff.kind),
        price_map:    encode_price_map(&staff.price_map)?,
        name:         staff.name,
        phone_number: staff.phone_number,
        avatar:       staff.avatar,
        monthly:      staff.monthly,
      },
      NewProfile::Customer { name } => Self::Customer {
        customer_id: encode_uuid(Uuid::new_v4()),
        name,
      },
    })
  }

  fn insert(&self, conn: &rusqlite::Connection, user_id: &str, created_at: &str) -> rusqlite::Result<()> {
    match self {
      Self::Staff { profile_id, kind, name, phone_number, avatar, monthly, price_map } => {
        conn.execute(
          "INSERT INTO staff_profiles (
             profile_id, user_document, kind, name, phone_number, avatar,
             monthly, price_map, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            profile_id,
            user_id,
            kind,
            name,
            phone_number,
            avatar,
            monthly,
            price_map,
            created_at,
          ],
        )?;
      }
      Self::Customer { customer_id, name } => {
        conn.execute(
          "INSERT INTO customers (customer_id, user_id, name, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![customer_id, user_id, name, created_at],
        )?;
      }
    }
    Ok(())
  }
}

// ─── Store impl ──────────────────────────────────────────────────────────────

impl Store for SqliteStore {
  type Error = crate::Error;

  // ── Identities ────────────────────────────────────────────────────────────

  async fn find_identity_by_name_or_phone<'a>(
    &'a self,
    name: &'a str,
    phone_number: &'a str,
  ) -> Result<Option<Identity>> {
    let name = name.to_owned();
    let phone = phone_number.to_owned();
    let sql = format!(
      "SELECT {USER_COLUMNS} FROM users WHERE name = ?1 OR phone_number = ?2 LIMIT 1"
    );

    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![name, phone], RawIdentity::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  async fn register(
    &self,
    identity: NewIdentity,
    profile: Option<NewProfile>,
  ) -> Result<Identity> {
    let record = Identity {
      user_id:       Uuid::new_v4(),
      name:          identity.name,
      phone_number:  identity.phone_number,
      password_hash: identity.password_hash,
      avatar:        identity.avatar,
      role:          identity.role,
      refresh_token: None,
      created_at:    Utc::now(),
    };

    let user_id_str = encode_uuid(record.user_id);
    let name        = record.name.clone();
    let phone       = record.phone_number.clone();
    let hash        = record.password_hash.clone();
    let avatar      = record.avatar.clone();
    let role_str    = encode_role(record.role);
    let at_str      = encode_dt(record.created_at);
    let pending     = profile.map(PendingProfile::encode).transpose()?;

    let outcome: Outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let inserted = tx.execute(
          "INSERT INTO users (
             user_id, name, phone_number, password_hash, avatar, role, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![user_id_str, name, phone, hash, avatar, role_str, at_str],
        );
        match inserted {
          Err(e) if is_unique_violation(&e) => return Ok(Err(CoreError::DuplicateIdentity)),
          other => {
            other?;
          }
        }
        if let Some(profile) = &pending {
          profile.insert(&tx, &user_id_str, &at_str)?;
        }
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;
    outcome?;

    tracing::debug!(user_id = %record.user_id, role = %record.role, "registered identity");
    Ok(record)
  }

  async fn get_identity(&self, user_id: Uuid) -> Result<Option<Identity>> {
    let id_str = encode_uuid(user_id);
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1");

    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawIdentity::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  // ── Role profiles ─────────────────────────────────────────────────────────

  async fn get_staff_profile(
    &self,
    kind: StaffKind,
    user_id: Uuid,
  ) -> Result<Option<StaffProfile>> {
    let id_str   = encode_uuid(user_id);
    let kind_str = encode_staff_kind(kind);
    let sql = format!(
      "SELECT {STAFF_COLUMNS} FROM staff_profiles WHERE user_document = ?1 AND kind = ?2"
    );

    let raw: Option<RawStaffProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str, kind_str], RawStaffProfile::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStaffProfile::into_profile).transpose()
  }

  async fn save_staff_profile(
    &self,
    profile: StaffProfile,
    password_hash: Option<String>,
  ) -> Result<StaffProfile> {
    let id_str    = encode_uuid(profile.profile_id);
    let user_str  = encode_uuid(profile.user_document);
    let name      = profile.name.clone();
    let phone     = profile.phone_number.clone();
    let avatar    = profile.avatar.clone();
    let price_map = encode_price_map(&profile.price_map)?;
    let (monthly, advance, earned) = (profile.monthly, profile.advance, profile.earned);
    let (kind, user_id) = (profile.kind, profile.user_document);

    let outcome: Outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let updated = tx.execute(
          "UPDATE staff_profiles
             SET name = ?2, phone_number = ?3, avatar = ?4,
                 monthly = ?5, advance = ?6, earned = ?7, price_map = ?8
           WHERE profile_id = ?1",
          rusqlite::params![id_str, name, phone, avatar, monthly, advance, earned, price_map],
        )?;
        if updated == 0 {
          return Ok(Err(CoreError::ProfileNotFound { kind, user_id }));
        }
        if let Some(hash) = password_hash {
          let updated = tx.execute(
            "UPDATE users SET password_hash = ?2 WHERE user_id = ?1",
            rusqlite::params![user_str, hash],
          )?;
          if updated == 0 {
            return Ok(Err(CoreError::IdentityNotFound(user_id)));
          }
        }
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;
    outcome?;

    Ok(profile)
  }

  async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>> {
    let id_str = encode_uuid(customer_id);

    let raw: Option<RawCustomer> = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT customer_id, user_id, name, created_at FROM customers WHERE customer_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
              ))
            },
          )
          .optional()?;
        let Some((customer_id, user_id, name, created_at)) = row else {
          return Ok(None);
        };

        let measurements = collect_ids(
          conn,
          "SELECT measurement_id FROM customer_measurements WHERE customer_id = ?1 ORDER BY seq",
          &id_str,
        )?;
        let stitched_bills = collect_ids(
          conn,
          "SELECT bill_id FROM customer_stitched_bills WHERE customer_id = ?1 ORDER BY seq",
          &id_str,
        )?;

        Ok(Some(RawCustomer {
          customer_id,
          user_id,
          name,
          created_at,
          measurements,
          stitched_bills,
        }))
      })
      .await?;

    raw.map(RawCustomer::into_customer).transpose()
  }

  async fn list_customers(&self) -> Result<Vec<CustomerSummary>> {
    let rows: Vec<(String, String, String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT c.customer_id, u.name, u.phone_number, u.avatar
           FROM customers c
           JOIN users u ON u.user_id = c.user_id
           ORDER BY c.created_at, c.rowid",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(customer_id, name, phone_number, avatar)| {
        Ok(CustomerSummary {
          customer_id: decode_uuid(&customer_id)?,
          name,
          phone_number,
          avatar,
        })
      })
      .collect()
  }

  // ── Catalog ───────────────────────────────────────────────────────────────

  async fn add_clothing_item(&self, item: NewClothingItem) -> Result<ClothingItem> {
    let item = ClothingItem {
      name:                  item.name,
      stitching:             item.stitching,
      default_stitching_amt: item.default_stitching_amt,
      default_cutting_amt:   item.default_cutting_amt,
      created_at:            Utc::now(),
    };

    let name     = item.name.clone();
    let at_str   = encode_dt(item.created_at);
    let (stitching, stitching_amt, cutting_amt) =
      (item.stitching, item.default_stitching_amt, item.default_cutting_amt);

    let outcome: Outcome = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO clothing_items (
             name, stitching, default_stitching_amt, default_cutting_amt, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![name, stitching, stitching_amt, cutting_amt, at_str],
        );
        match inserted {
          Err(e) if is_unique_violation(&e) => Ok(Err(CoreError::DuplicateClothingItem(name))),
          other => {
            other?;
            Ok(Ok(()))
          }
        }
      })
      .await?;
    outcome?;

    Ok(item)
  }

  async fn get_clothing_item<'a>(&'a self, name: &'a str) -> Result<Option<ClothingItem>> {
    let name = name.to_owned();
    let sql = format!("SELECT {CLOTHING_COLUMNS} FROM clothing_items WHERE name = ?1");

    let raw: Option<RawClothingItem> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![name], RawClothingItem::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawClothingItem::into_item).transpose()
  }

  async fn list_clothing_items(&self) -> Result<Vec<ClothingItem>> {
    let sql = format!("SELECT {CLOTHING_COLUMNS} FROM clothing_items ORDER BY name");

    let raws: Vec<RawClothingItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawClothingItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClothingItem::into_item).collect()
  }

  async fn update_clothing_item<'a>(
    &'a self,
    name: &'a str,
    patch: ClothingItemPatch,
  ) -> Result<ClothingItem> {
    let name = name.to_owned();
    let sql = format!("SELECT {CLOTHING_COLUMNS} FROM clothing_items WHERE name = ?1");

    let outcome: Outcome<RawClothingItem> = self
      .conn
      .call(move |conn| {
        let updated = conn.execute(
          "UPDATE clothing_items
             SET stitching             = COALESCE(?2, stitching),
                 default_stitching_amt = COALESCE(?3, default_stitching_amt),
                 default_cutting_amt   = COALESCE(?4, default_cutting_amt)
           WHERE name = ?1",
          rusqlite::params![
            name,
            patch.stitching,
            patch.default_stitching_amt,
            patch.default_cutting_amt,
          ],
        )?;
        if updated == 0 {
          return Ok(Err(CoreError::ClothingItemNotFound(name)));
        }
        let raw = conn.query_row(&sql, rusqlite::params![name], RawClothingItem::from_row)?;
        Ok(Ok(raw))
      })
      .await?;

    outcome?.into_item()
  }

  // ── Measurements ──────────────────────────────────────────────────────────

  async fn add_measurement(
    &self,
    input: NewMeasurement,
  ) -> Result<(Measurement, MeasurementHistory)> {
    let now = Utc::now();
    let measurement = Measurement {
      measurement_id:        Uuid::new_v4(),
      customer_id:           input.customer_id,
      measurements:          input.measurements,
      customer_requirements: input.customer_requirements,
      drawing:               input.drawing,
      created_at:            now,
    };
    let history = MeasurementHistory {
      history_id:     Uuid::new_v4(),
      measurement_id: measurement.measurement_id,
      customer_id:    measurement.customer_id,
      recorded_at:    now,
    };

    let customer_id      = measurement.customer_id;
    let customer_id_str  = encode_uuid(customer_id);
    let measurement_str  = encode_uuid(measurement.measurement_id);
    let history_str      = encode_uuid(history.history_id);
    let body_json        = encode_measurements(&measurement.measurements)?;
    let requirements     = measurement.customer_requirements.clone();
    let drawing          = measurement.drawing.clone();
    let at_str           = encode_dt(now);

    let outcome: Outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !row_exists(&tx, "SELECT 1 FROM customers WHERE customer_id = ?1", &customer_id_str)? {
          return Ok(Err(CoreError::CustomerNotFound(customer_id)));
        }
        tx.execute(
          "INSERT INTO measurements (
             measurement_id, customer_id, measurements, customer_requirements, drawing, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![measurement_str, customer_id_str, body_json, requirements, drawing, at_str],
        )?;
        tx.execute(
          "INSERT INTO customer_measurements (customer_id, measurement_id) VALUES (?1, ?2)",
          rusqlite::params![customer_id_str, measurement_str],
        )?;
        tx.execute(
          "INSERT INTO measurement_history (history_id, measurement_id, customer_id, recorded_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![history_str, measurement_str, customer_id_str, at_str],
        )?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;
    outcome?;

    tracing::debug!(
      measurement_id = %measurement.measurement_id,
      customer_id = %customer_id,
      "recorded measurement"
    );
    Ok((measurement, history))
  }

  async fn get_measurement(&self, measurement_id: Uuid) -> Result<Option<Measurement>> {
    let id_str = encode_uuid(measurement_id);
    let sql = format!("SELECT {MEASUREMENT_COLUMNS} FROM measurements WHERE measurement_id = ?1");

    let raw: Option<RawMeasurement> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawMeasurement::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMeasurement::into_measurement).transpose()
  }

  async fn measurement_history(&self, customer_id: Uuid) -> Result<Vec<MeasurementHistory>> {
    let id_str = encode_uuid(customer_id);

    let raws: Vec<RawHistory> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT history_id, measurement_id, customer_id, recorded_at
           FROM measurement_history
           WHERE customer_id = ?1
           ORDER BY recorded_at, rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawHistory::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistory::into_history).collect()
  }

  // ── Bills ─────────────────────────────────────────────────────────────────

  async fn bill_number_taken<'a>(&'a self, kind: BillKind, bill_number: &'a str) -> Result<bool> {
    let number = bill_number.to_owned();
    let sql = format!("SELECT 1 FROM {} WHERE bill_number = ?1", bill_table(kind));

    let taken = self
      .conn
      .call(move |conn| Ok(row_exists(conn, &sql, &number)?))
      .await?;
    Ok(taken)
  }

  async fn add_sold_bill(&self, input: NewSoldBill) -> Result<SoldBill> {
    let bill = SoldBill {
      bill_id:      Uuid::new_v4(),
      name:         input.name,
      user_id:      input.user_id,
      customer_id:  input.customer_id,
      bill_number:  input.bill_number,
      phone_number: input.phone_number,
      cloth_amt:    input.cloth_amt,
      total_amt:    input.total_amt,
      created_at:   Utc::now(),
    };

    let (customer_id, user_id) = (bill.customer_id, bill.user_id);
    let bill_id_str  = encode_uuid(bill.bill_id);
    let name         = bill.name.clone();
    let number       = bill.bill_number.clone();
    let phone        = bill.phone_number.clone();
    let (cloth_amt, total_amt) = (bill.cloth_amt, bill.total_amt);
    let at_str       = encode_dt(bill.created_at);

    let outcome: Outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if let Err(e) = bill_references(&tx, customer_id, user_id)? {
          return Ok(Err(e));
        }
        let inserted = tx.execute(
          "INSERT INTO sold_bills (
             bill_id, name, user_id, customer_id, bill_number, phone_number,
             cloth_amt, total_amt, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            bill_id_str,
            name,
            encode_uuid(user_id),
            encode_uuid(customer_id),
            number,
            phone,
            cloth_amt,
            total_amt,
            at_str,
          ],
        );
        match inserted {
          Err(e) if is_unique_violation(&e) => {
            return Ok(Err(CoreError::DuplicateBillNumber { kind: BillKind::Sold, number }));
          }
          other => {
            other?;
          }
        }
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;
    outcome?;

    Ok(bill)
  }

  async fn add_stitch_bill(&self, input: NewStitchBill) -> Result<StitchBill> {
    let bill = StitchBill {
      bill_id:       Uuid::new_v4(),
      name:          input.name,
      user_id:       input.user_id,
      customer_id:   input.customer_id,
      bill_number:   input.bill_number,
      phone_number:  input.phone_number,
      delivery_date: input.delivery_date,
      cloth_amt:     input.cloth_amt,
      clothes:       input.clothes,
      sub_total:     input.sub_total,
      advance_amt:   input.advance_amt,
      total_amt:     input.total_amt,
      created_at:    Utc::now(),
    };

    let (customer_id, user_id) = (bill.customer_id, bill.user_id);
    let bill_id_str   = encode_uuid(bill.bill_id);
    let customer_str  = encode_uuid(customer_id);
    let name          = bill.name.clone();
    let number        = bill.bill_number.clone();
    let phone         = bill.phone_number.clone();
    let delivery      = encode_date(bill.delivery_date);
    let clothes       = encode_clothes(&bill.clothes)?;
    let amounts       = (bill.cloth_amt, bill.sub_total, bill.advance_amt, bill.total_amt);
    let at_str        = encode_dt(bill.created_at);

    let outcome: Outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if let Err(e) = bill_references(&tx, customer_id, user_id)? {
          return Ok(Err(e));
        }
        let (cloth_amt, sub_total, advance_amt, total_amt) = amounts;
        let inserted = tx.execute(
          "INSERT INTO stitch_bills (
             bill_id, name, user_id, customer_id, bill_number, phone_number, delivery_date,
             cloth_amt, clothes, sub_total, advance_amt, total_amt, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            bill_id_str,
            name,
            encode_uuid(user_id),
            customer_str,
            number,
            phone,
            delivery,
            cloth_amt,
            clothes,
            sub_total,
            advance_amt,
            total_amt,
            at_str,
          ],
        );
        match inserted {
          Err(e) if is_unique_violation(&e) => {
            return Ok(Err(CoreError::DuplicateBillNumber {
              kind: BillKind::Stitched,
              number,
            }));
          }
          other => {
            other?;
          }
        }
        tx.execute(
          "INSERT INTO customer_stitched_bills (customer_id, bill_id) VALUES (?1, ?2)",
          rusqlite::params![customer_str, bill_id_str],
        )?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;
    outcome?;

    Ok(bill)
  }

  async fn sold_bills_for(&self, customer_id: Uuid) -> Result<Vec<SoldBill>> {
    let id_str = encode_uuid(customer_id);
    let sql = format!(
      "SELECT {SOLD_BILL_COLUMNS} FROM sold_bills WHERE customer_id = ?1 ORDER BY created_at, rowid"
    );

    let raws: Vec<RawSoldBill> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawSoldBill::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSoldBill::into_bill).collect()
  }

  async fn stitch_bills_for(&self, customer_id: Uuid) -> Result<Vec<StitchBill>> {
    let id_str = encode_uuid(customer_id);
    let sql = format!(
      "SELECT {STITCH_BILL_COLUMNS} FROM stitch_bills b
       WHERE b.customer_id = ?1
       ORDER BY (SELECT l.seq FROM customer_stitched_bills l WHERE l.bill_id = b.bill_id)"
    );

    let raws: Vec<RawStitchBill> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawStitchBill::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStitchBill::into_bill).collect()
  }
}
