//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use stitchbook_core::{
  Error as CoreError,
  bill::{BillKind, ClothLine, NewSoldBill, NewStitchBill},
  catalog::{ClothingItemPatch, NewClothingItem},
  identity::{Identity, NewIdentity, Role},
  measurement::NewMeasurement,
  profile::{NewProfile, NewStaffProfile, PriceMap, StaffKind},
  store::Store,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn identity(name: &str, phone: &str, role: Role) -> NewIdentity {
  NewIdentity {
    name:          name.into(),
    phone_number:  phone.into(),
    password_hash: "$argon2id$stub".into(),
    avatar:        format!("https://files.test/{name}.png"),
    role,
  }
}

fn core_err(e: Error) -> CoreError { e.into() }

async fn customer(s: &SqliteStore, name: &str, phone: &str) -> Uuid {
  let who = s
    .register(
      identity(name, phone, Role::Customer),
      Some(NewProfile::Customer { name: name.into() }),
    )
    .await
    .unwrap();
  let customers = s.list_customers().await.unwrap();
  customers
    .into_iter()
    .find(|c| c.name == who.name)
    .map(|c| c.customer_id)
    .unwrap()
}

async fn admin(s: &SqliteStore) -> Identity {
  s.register(identity("Owner", "9000000000", Role::Admin), None)
    .await
    .unwrap()
}

fn measurements(chest: f64) -> serde_json::Map<String, serde_json::Value> {
  let mut m = serde_json::Map::new();
  m.insert("chest".into(), chest.into());
  m
}

fn stitch_bill(customer_id: Uuid, user_id: Uuid, number: &str) -> NewStitchBill {
  NewStitchBill {
    name: "Ravi".into(),
    user_id,
    customer_id,
    bill_number: number.into(),
    phone_number: "9111111111".into(),
    delivery_date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
    cloth_amt: 500.0,
    clothes: vec![ClothLine { item: "Shirt".into(), quantity: 2, amount: 600.0 }],
    sub_total: 1100.0,
    advance_amt: 100.0,
    total_amt: 1000.0,
  }
}

fn sold_bill(customer_id: Uuid, user_id: Uuid, number: &str) -> NewSoldBill {
  NewSoldBill {
    name: "Ravi".into(),
    user_id,
    customer_id,
    bill_number: number.into(),
    phone_number: "9111111111".into(),
    cloth_amt: 750.0,
    total_amt: 750.0,
  }
}

// ─── Identities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_find_identity() {
  let s = store().await;
  let who = admin(&s).await;
  assert_eq!(who.role, Role::Admin);
  assert!(who.refresh_token.is_none());

  let by_name = s.find_identity_by_name_or_phone("Owner", "nope").await.unwrap();
  assert_eq!(by_name.map(|i| i.user_id), Some(who.user_id));

  let by_phone = s
    .find_identity_by_name_or_phone("nobody", "9000000000")
    .await
    .unwrap();
  assert_eq!(by_phone.map(|i| i.user_id), Some(who.user_id));

  let fetched = s.get_identity(who.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.password_hash, "$argon2id$stub");
}

#[tokio::test]
async fn find_identity_misses_return_none() {
  let s = store().await;
  admin(&s).await;
  let found = s.find_identity_by_name_or_phone("x", "y").await.unwrap();
  assert!(found.is_none());
  assert!(s.get_identity(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_identity_writes_nothing() {
  let s = store().await;
  s.register(
    identity("Meena", "9222222222", Role::Customer),
    Some(NewProfile::Customer { name: "Meena".into() }),
  )
  .await
  .unwrap();

  let err = s
    .register(
      identity("Other", "9222222222", Role::Customer),
      Some(NewProfile::Customer { name: "Other".into() }),
    )
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::DuplicateIdentity));

  let customers = s.list_customers().await.unwrap();
  assert_eq!(customers.len(), 1);
  assert_eq!(customers[0].name, "Meena");
}

#[tokio::test]
async fn failed_profile_insert_rolls_back_identity() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute_batch(
        "CREATE TRIGGER reject_customers BEFORE INSERT ON customers
         BEGIN SELECT RAISE(ABORT, 'customers are closed'); END;",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let result = s
    .register(
      identity("Meena", "9222222222", Role::Customer),
      Some(NewProfile::Customer { name: "Meena".into() }),
    )
    .await;
  assert!(result.is_err());

  let found = s
    .find_identity_by_name_or_phone("Meena", "9222222222")
    .await
    .unwrap();
  assert!(found.is_none());
}

// ─── Staff profiles ──────────────────────────────────────────────────────────

#[tokio::test]
async fn staff_profile_round_trips_price_map() {
  let s = store().await;
  let mut prices = PriceMap::new();
  prices.insert("Shirt".into(), 80.0);
  prices.insert("Kurta".into(), 120.0);

  let who = s
    .register(
      identity("Suresh", "9333333333", Role::CuttingMaster),
      Some(NewProfile::Staff(NewStaffProfile {
        kind:         StaffKind::CuttingMaster,
        name:         "Suresh".into(),
        phone_number: "9333333333".into(),
        avatar:       "https://files.test/suresh.png".into(),
        monthly:      12000.0,
        price_map:    prices.clone(),
      })),
    )
    .await
    .unwrap();

  let profile = s
    .get_staff_profile(StaffKind::CuttingMaster, who.user_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(profile.user_document, who.user_id);
  assert_eq!(profile.price_map, prices);
  assert_eq!(profile.advance, 0.0);
  assert_eq!(profile.earned, 0.0);

  // A profile of one kind is not visible as another.
  let as_tailor = s.get_staff_profile(StaffKind::Tailor, who.user_id).await.unwrap();
  assert!(as_tailor.is_none());
}

#[tokio::test]
async fn save_staff_profile_persists_changes() {
  let s = store().await;
  let who = s
    .register(
      identity("Anil", "9444444444", Role::Helper),
      Some(NewProfile::Staff(NewStaffProfile {
        kind:         StaffKind::Helper,
        name:         "Anil".into(),
        phone_number: "9444444444".into(),
        avatar:       "a.png".into(),
        monthly:      8000.0,
        price_map:    PriceMap::new(),
      })),
    )
    .await
    .unwrap();

  let mut profile = s
    .get_staff_profile(StaffKind::Helper, who.user_id)
    .await
    .unwrap()
    .unwrap();
  profile.advance = 500.0;
  profile.name = "Anil K".into();
  s.save_staff_profile(profile, None).await.unwrap();

  let reloaded = s
    .get_staff_profile(StaffKind::Helper, who.user_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(reloaded.advance, 500.0);
  assert_eq!(reloaded.name, "Anil K");
  assert_eq!(reloaded.monthly, 8000.0);

  // The identity itself is untouched.
  let ident = s.get_identity(who.user_id).await.unwrap().unwrap();
  assert_eq!(ident.name, "Anil");
  assert_eq!(ident.password_hash, "$argon2id$stub");
}

async fn helper(s: &SqliteStore) -> Identity {
  s.register(
    identity("Anil", "9444444444", Role::Helper),
    Some(NewProfile::Staff(NewStaffProfile {
      kind:         StaffKind::Helper,
      name:         "Anil".into(),
      phone_number: "9444444444".into(),
      avatar:       "a.png".into(),
      monthly:      8000.0,
      price_map:    PriceMap::new(),
    })),
  )
  .await
  .unwrap()
}

#[tokio::test]
async fn save_staff_profile_replaces_credential_with_profile() {
  let s = store().await;
  let who = helper(&s).await;
  let mut profile = s
    .get_staff_profile(StaffKind::Helper, who.user_id)
    .await
    .unwrap()
    .unwrap();
  profile.monthly = 9000.0;
  s.save_staff_profile(profile, Some("$argon2id$new".into()))
    .await
    .unwrap();

  let ident = s.get_identity(who.user_id).await.unwrap().unwrap();
  assert_eq!(ident.password_hash, "$argon2id$new");
  let reloaded = s
    .get_staff_profile(StaffKind::Helper, who.user_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(reloaded.monthly, 9000.0);
}

#[tokio::test]
async fn missing_profile_leaves_credential_alone() {
  let s = store().await;
  let who = helper(&s).await;
  let mut profile = s
    .get_staff_profile(StaffKind::Helper, who.user_id)
    .await
    .unwrap()
    .unwrap();
  profile.profile_id = Uuid::new_v4();

  let err = s
    .save_staff_profile(profile, Some("$argon2id$new".into()))
    .await
    .unwrap_err();
  assert!(matches!(
    core_err(err),
    CoreError::ProfileNotFound { kind: StaffKind::Helper, user_id } if user_id == who.user_id
  ));

  let ident = s.get_identity(who.user_id).await.unwrap().unwrap();
  assert_eq!(ident.password_hash, "$argon2id$stub");
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn clothing_item_names_are_unique() {
  let s = store().await;
  let shirt = NewClothingItem {
    name:                  "Shirt".into(),
    stitching:             true,
    default_stitching_amt: 300.0,
    default_cutting_amt:   80.0,
  };
  s.add_clothing_item(shirt.clone()).await.unwrap();
  let err = s.add_clothing_item(shirt).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::DuplicateClothingItem(n) if n == "Shirt"));
  assert_eq!(s.list_clothing_items().await.unwrap().len(), 1);
}

#[tokio::test]
async fn catalog_update_leaves_seeded_prices_alone() {
  let s = store().await;
  s.add_clothing_item(NewClothingItem {
    name:                  "Kurta".into(),
    stitching:             true,
    default_stitching_amt: 450.0,
    default_cutting_amt:   120.0,
  })
  .await
  .unwrap();

  let catalog = s.list_clothing_items().await.unwrap();
  let who = s
    .register(
      identity("Tara", "9555555555", Role::Tailor),
      Some(NewProfile::Staff(NewStaffProfile {
        kind:         StaffKind::Tailor,
        name:         "Tara".into(),
        phone_number: "9555555555".into(),
        avatar:       "t.png".into(),
        monthly:      0.0,
        price_map:    StaffKind::Tailor.seed_prices(&catalog),
      })),
    )
    .await
    .unwrap();

  let updated = s
    .update_clothing_item("Kurta", ClothingItemPatch {
      default_stitching_amt: Some(500.0),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.default_stitching_amt, 500.0);
  assert_eq!(updated.default_cutting_amt, 120.0);
  assert!(updated.stitching);

  let profile = s
    .get_staff_profile(StaffKind::Tailor, who.user_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(profile.price_map["Kurta"], 450.0);
}

#[tokio::test]
async fn update_unknown_clothing_item() {
  let s = store().await;
  let err = s
    .update_clothing_item("Cape", ClothingItemPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::ClothingItemNotFound(n) if n == "Cape"));
}

// ─── Measurements ────────────────────────────────────────────────────────────

#[tokio::test]
async fn measurements_append_in_order_with_history() {
  let s = store().await;
  let cid = customer(&s, "Ravi", "9111111111").await;

  let (first, h1) = s
    .add_measurement(NewMeasurement {
      customer_id:           cid,
      measurements:          measurements(38.0),
      customer_requirements: Some("loose fit".into()),
      drawing:               None,
    })
    .await
    .unwrap();
  let (second, h2) = s
    .add_measurement(NewMeasurement {
      customer_id:           cid,
      measurements:          measurements(40.0),
      customer_requirements: None,
      drawing:               Some("https://files.test/d.png".into()),
    })
    .await
    .unwrap();
  assert_eq!(h1.measurement_id, first.measurement_id);
  assert_eq!(h2.customer_id, cid);

  let c = s.get_customer(cid).await.unwrap().unwrap();
  assert_eq!(c.measurements, vec![first.measurement_id, second.measurement_id]);

  let history = s.measurement_history(cid).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[0].measurement_id, first.measurement_id);

  let stored = s.get_measurement(second.measurement_id).await.unwrap().unwrap();
  assert_eq!(stored.measurements["chest"], serde_json::json!(40.0));
  assert_eq!(stored.drawing.as_deref(), Some("https://files.test/d.png"));
  assert!(stored.customer_requirements.is_none());
}

#[tokio::test]
async fn measurement_for_unknown_customer_writes_nothing() {
  let s = store().await;
  let missing = Uuid::new_v4();
  let err = s
    .add_measurement(NewMeasurement {
      customer_id:           missing,
      measurements:          measurements(36.0),
      customer_requirements: None,
      drawing:               None,
    })
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::CustomerNotFound(id) if id == missing));
  assert!(s.measurement_history(missing).await.unwrap().is_empty());
}

#[tokio::test]
async fn measurement_history_rejects_updates() {
  let s = store().await;
  let cid = customer(&s, "Ravi", "9111111111").await;
  s.add_measurement(NewMeasurement {
    customer_id:           cid,
    measurements:          measurements(38.0),
    customer_requirements: None,
    drawing:               None,
  })
  .await
  .unwrap();

  let result = s
    .conn
    .call(|conn| {
      conn.execute("UPDATE measurement_history SET recorded_at = 'tampered'", [])?;
      Ok(())
    })
    .await;
  assert!(result.is_err());
}

// ─── Bills ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stitch_bill_is_linked_to_customer() {
  let s = store().await;
  let cid = customer(&s, "Ravi", "9111111111").await;
  let op = admin(&s).await;

  let bill = s.add_stitch_bill(stitch_bill(cid, op.user_id, "S-1")).await.unwrap();

  let c = s.get_customer(cid).await.unwrap().unwrap();
  assert_eq!(c.stitched_bills, vec![bill.bill_id]);

  let bills = s.stitch_bills_for(cid).await.unwrap();
  assert_eq!(bills.len(), 1);
  assert_eq!(bills[0].clothes[0].quantity, 2);
  assert_eq!(bills[0].delivery_date, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
}

#[tokio::test]
async fn sold_bill_leaves_customer_untouched() {
  let s = store().await;
  let cid = customer(&s, "Ravi", "9111111111").await;
  let op = admin(&s).await;

  s.add_sold_bill(sold_bill(cid, op.user_id, "B-1")).await.unwrap();

  let c = s.get_customer(cid).await.unwrap().unwrap();
  assert!(c.stitched_bills.is_empty());
  assert_eq!(s.sold_bills_for(cid).await.unwrap().len(), 1);
}

#[tokio::test]
async fn bill_numbers_are_unique_per_kind() {
  let s = store().await;
  let cid = customer(&s, "Ravi", "9111111111").await;
  let op = admin(&s).await;

  s.add_sold_bill(sold_bill(cid, op.user_id, "7")).await.unwrap();
  assert!(s.bill_number_taken(BillKind::Sold, "7").await.unwrap());
  assert!(!s.bill_number_taken(BillKind::Stitched, "7").await.unwrap());

  // Same number on the other kind is fine.
  s.add_stitch_bill(stitch_bill(cid, op.user_id, "7")).await.unwrap();

  let err = s.add_stitch_bill(stitch_bill(cid, op.user_id, "7")).await.unwrap_err();
  assert!(matches!(
    core_err(err),
    CoreError::DuplicateBillNumber { kind: BillKind::Stitched, .. }
  ));

  // The rejected bill did not reach the customer's list.
  let c = s.get_customer(cid).await.unwrap().unwrap();
  assert_eq!(c.stitched_bills.len(), 1);
}

#[tokio::test]
async fn bills_require_existing_customer_and_operator() {
  let s = store().await;
  let cid = customer(&s, "Ravi", "9111111111").await;
  let op = admin(&s).await;

  let err = s
    .add_sold_bill(sold_bill(Uuid::new_v4(), op.user_id, "X"))
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::CustomerNotFound(_)));

  let ghost = Uuid::new_v4();
  let err = s.add_stitch_bill(stitch_bill(cid, ghost, "Y")).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::IdentityNotFound(id) if id == ghost));
}
