//! The `Store` trait: everything the workflow needs from persistence.
//!
//! Backends (e.g. `stitchbook-store-sqlite`) implement it; the workflow layer
//! depends only on this abstraction. Operations that touch more than one
//! collection (`register`, `add_measurement`, `add_stitch_bill`) must be
//! all-or-nothing, and list appends must not be read-modify-write.

use std::future::Future;

use uuid::Uuid;

use crate::{
  bill::{BillKind, NewSoldBill, NewStitchBill, SoldBill, StitchBill},
  catalog::{ClothingItem, ClothingItemPatch, NewClothingItem},
  identity::{Identity, NewIdentity},
  measurement::{Measurement, MeasurementHistory, NewMeasurement},
  profile::{Customer, CustomerSummary, NewProfile, StaffKind, StaffProfile},
};

/// Abstraction over a Stitchbook storage backend.
///
/// The associated error converts into [`crate::Error`] so that unique
/// constraint violations and missing references surface with the same
/// classification whichever backend raised them.
pub trait Store: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Identities ────────────────────────────────────────────────────────

  /// Any identity whose name or phone number matches.
  fn find_identity_by_name_or_phone<'a>(
    &'a self,
    name: &'a str,
    phone_number: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  /// Persist an identity together with its role profile, atomically.
  ///
  /// Fails with [`crate::Error::DuplicateIdentity`] if the name or phone
  /// number is already taken, in which case nothing is written.
  fn register(
    &self,
    identity: NewIdentity,
    profile: Option<NewProfile>,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  fn get_identity(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  // ── Role profiles ─────────────────────────────────────────────────────

  /// Look up a staff profile by its identity back-reference.
  fn get_staff_profile(
    &self,
    kind: StaffKind,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<StaffProfile>, Self::Error>> + Send + '_;

  /// Overwrite the mutable fields of an existing staff profile and, when
  /// `password_hash` is given, the credential hash of its identity. Both
  /// writes land together or not at all.
  fn save_staff_profile(
    &self,
    profile: StaffProfile,
    password_hash: Option<String>,
  ) -> impl Future<Output = Result<StaffProfile, Self::Error>> + Send + '_;

  fn get_customer(
    &self,
    customer_id: Uuid,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  fn list_customers(
    &self,
  ) -> impl Future<Output = Result<Vec<CustomerSummary>, Self::Error>> + Send + '_;

  // ── Catalog ───────────────────────────────────────────────────────────

  /// Fails with [`crate::Error::DuplicateClothingItem`] on a name clash.
  fn add_clothing_item(
    &self,
    item: NewClothingItem,
  ) -> impl Future<Output = Result<ClothingItem, Self::Error>> + Send + '_;

  fn get_clothing_item<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<ClothingItem>, Self::Error>> + Send + 'a;

  /// The whole catalog, ordered by name.
  fn list_clothing_items(
    &self,
  ) -> impl Future<Output = Result<Vec<ClothingItem>, Self::Error>> + Send + '_;

  fn update_clothing_item<'a>(
    &'a self,
    name: &'a str,
    patch: ClothingItemPatch,
  ) -> impl Future<Output = Result<ClothingItem, Self::Error>> + Send + 'a;

  // ── Measurements ──────────────────────────────────────────────────────

  /// Insert a measurement, append its id to the customer's list and record
  /// the history row, all in one unit.
  fn add_measurement(
    &self,
    input: NewMeasurement,
  ) -> impl Future<Output = Result<(Measurement, MeasurementHistory), Self::Error>>
  + Send
  + '_;

  fn get_measurement(
    &self,
    measurement_id: Uuid,
  ) -> impl Future<Output = Result<Option<Measurement>, Self::Error>> + Send + '_;

  /// History rows for a customer, oldest first.
  fn measurement_history(
    &self,
    customer_id: Uuid,
  ) -> impl Future<Output = Result<Vec<MeasurementHistory>, Self::Error>> + Send + '_;

  // ── Bills ─────────────────────────────────────────────────────────────

  fn bill_number_taken<'a>(
    &'a self,
    kind: BillKind,
    bill_number: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Insert a sold bill. The customer record is not touched.
  fn add_sold_bill(
    &self,
    input: NewSoldBill,
  ) -> impl Future<Output = Result<SoldBill, Self::Error>> + Send + '_;

  /// Insert a stitch bill and append its id to the customer's stitched-bill
  /// list in one unit.
  fn add_stitch_bill(
    &self,
    input: NewStitchBill,
  ) -> impl Future<Output = Result<StitchBill, Self::Error>> + Send + '_;

  /// Sold bills raised for a customer, oldest first.
  fn sold_bills_for(
    &self,
    customer_id: Uuid,
  ) -> impl Future<Output = Result<Vec<SoldBill>, Self::Error>> + Send + '_;

  /// Stitch bills in the order they were appended to the customer.
  fn stitch_bills_for(
    &self,
    customer_id: Uuid,
  ) -> impl Future<Output = Result<Vec<StitchBill>, Self::Error>> + Send + '_;
}
