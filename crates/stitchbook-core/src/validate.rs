//! Request payload validation.
//!
//! Each function takes the raw JSON object a client sent and returns either a
//! fully typed input or the first violation found. Fields are checked in a
//! fixed order and checking stops at the first failure; clients rely on the
//! message naming exactly one field.
//!
//! `null` is treated the same as an absent key.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  bill::{ClothLine, NewSoldBill, NewStitchBill},
  catalog::{ClothingItemPatch, NewClothingItem},
  measurement::BodyMeasurements,
  profile::StaffPatch,
};

/// A raw request body.
pub type Payload = serde_json::Map<String, Value>;

/// The first missing or malformed field of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

// ─── Fields ──────────────────────────────────────────────────────────────────

struct Field {
  key:   &'static str,
  label: &'static str,
}

impl Field {
  const fn new(key: &'static str, label: &'static str) -> Self { Self { key, label } }

  fn required(&self) -> ValidationError {
    ValidationError(format!("{} is Required", self.label))
  }

  fn invalid(&self) -> ValidationError {
    ValidationError(format!("{} is invalid", self.label))
  }
}

const NAME: Field = Field::new("name", "Name");
const PHONE: Field = Field::new("phoneNumber", "Phone number");
const MONTHLY: Field = Field::new("monthly", "Monthly");
const STITCHING: Field = Field::new("stitching", "Stitching");
const DEFAULT_STITCHING: Field = Field::new("defaultStitchingAmt", "Default Stitching Amount");
const DEFAULT_CUTTING: Field = Field::new("defaultCuttingAmt", "Default Cutting Amount");
const MEASUREMENTS: Field = Field::new("measurements", "Measurements");
const CUSTOMER_REQUIREMENTS: Field = Field::new("customerRequirements", "Customer Requirements");
const USER_ID: Field = Field::new("user_id", "User Id");
const CUSTOMER_ID: Field = Field::new("customer_id", "Customer Id");
const BILL_NUMBER: Field = Field::new("billNumber", "Bill Number");
const BILL_PHONE: Field = Field::new("phoneNumber", "Phone Number");
const DELIVERY_DATE: Field = Field::new("deliveryDate", "Delivery Date");
const CLOTH_AMT: Field = Field::new("clothAmt", "Cloth Amount");
const CLOTHES: Field = Field::new("clothes", "Clothes");
const SUB_TOTAL: Field = Field::new("subTotal", "Sub Total");
const ADVANCE_AMT: Field = Field::new("advanceAmt", "Advance Amount");
const TOTAL_AMT: Field = Field::new("totalAmt", "Total Amount");
const ROLE: Field = Field::new("role", "Role");
const PASSWORD: Field = Field::new("password", "Password");
const ADVANCE: Field = Field::new("advance", "Advance");
const EARNED: Field = Field::new("earned", "Earned");

fn value<'a>(payload: &'a Payload, field: &Field) -> Option<&'a Value> {
  payload.get(field.key).filter(|v| !v.is_null())
}

/// Whether a value would pass a loose truthiness check: present, not
/// `false`, not `0`, not an empty string.
pub fn truthy(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) => false,
    Some(Value::Bool(b)) => *b,
    Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
    Some(Value::String(s)) => !s.is_empty(),
    Some(Value::Array(_) | Value::Object(_)) => true,
  }
}

fn text_of(v: &Value, field: &Field) -> Result<Option<String>> {
  match v {
    Value::String(s) => {
      let trimmed = s.trim();
      Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
    }
    Value::Number(n) => Ok(Some(n.to_string())),
    _ => Err(field.invalid()),
  }
}

fn text(payload: &Payload, field: &Field) -> Result<String> {
  let v = value(payload, field).ok_or_else(|| field.required())?;
  text_of(v, field)?.ok_or_else(|| field.required())
}

fn optional_text(payload: &Payload, field: &Field) -> Result<Option<String>> {
  value(payload, field).map_or(Ok(None), |v| text_of(v, field))
}

/// A present key must carry a non-blank value.
fn patch_text(payload: &Payload, field: &Field) -> Result<Option<String>> {
  match value(payload, field) {
    None => Ok(None),
    Some(v) => text_of(v, field)?.map(Some).ok_or_else(|| field.required()),
  }
}

/// Kept exactly as sent, surrounding whitespace included. A present key
/// must carry a non-blank value.
fn secret(payload: &Payload, field: &Field) -> Result<Option<String>> {
  match value(payload, field) {
    None => Ok(None),
    Some(Value::String(s)) if s.trim().is_empty() => Err(field.required()),
    Some(Value::String(s)) => Ok(Some(s.clone())),
    Some(Value::Number(n)) => Ok(Some(n.to_string())),
    Some(_) => Err(field.invalid()),
  }
}

fn amount_of(v: &Value, field: &Field) -> Result<f64> {
  let amount = match v {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  }
  .ok_or_else(|| field.invalid())?;
  if amount.is_finite() && amount >= 0.0 {
    Ok(amount)
  } else {
    Err(field.invalid())
  }
}

fn amount(payload: &Payload, field: &Field) -> Result<f64> {
  let v = value(payload, field).ok_or_else(|| field.required())?;
  amount_of(v, field)
}

fn optional_amount(payload: &Payload, field: &Field) -> Result<Option<f64>> {
  value(payload, field).map(|v| amount_of(v, field)).transpose()
}

fn flag_of(v: &Value, field: &Field) -> Result<bool> {
  match v {
    Value::Bool(b) => Ok(*b),
    Value::String(s) => match s.trim() {
      "true" => Ok(true),
      "false" => Ok(false),
      _ => Err(field.invalid()),
    },
    _ => Err(field.invalid()),
  }
}

fn flag(payload: &Payload, field: &Field) -> Result<bool> {
  let v = value(payload, field).ok_or_else(|| field.required())?;
  flag_of(v, field)
}

fn uuid(payload: &Payload, field: &Field) -> Result<Uuid> {
  let raw = text(payload, field)?;
  Uuid::parse_str(&raw).map_err(|_| field.invalid())
}

fn date(payload: &Payload, field: &Field) -> Result<NaiveDate> {
  let raw = text(payload, field)?;
  NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
    .or_else(|_| DateTime::parse_from_rfc3339(&raw).map(|dt| dt.date_naive()))
    .map_err(|_| field.invalid())
}

fn money_eq(a: f64, b: f64) -> bool { (a - b).abs() < 0.005 }

// ─── Identities ──────────────────────────────────────────────────────────────

/// The fields every identity-creating operation requires.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityInput {
  pub name:         String,
  pub phone_number: String,
}

/// Admin, cutting master, tailor and customer creation.
pub fn identity(payload: &Payload) -> Result<IdentityInput> {
  Ok(IdentityInput {
    name:         text(payload, &NAME)?,
    phone_number: text(payload, &PHONE)?,
  })
}

#[derive(Debug, Clone, PartialEq)]
pub struct HelperInput {
  pub identity: IdentityInput,
  pub monthly:  f64,
}

pub fn helper(payload: &Payload) -> Result<HelperInput> {
  let identity = identity(payload)?;
  let monthly = amount(payload, &MONTHLY)?;
  Ok(HelperInput { identity, monthly })
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

pub fn clothing_item(payload: &Payload) -> Result<NewClothingItem> {
  Ok(NewClothingItem {
    name:                  text(payload, &NAME)?,
    stitching:             flag(payload, &STITCHING)?,
    default_stitching_amt: amount(payload, &DEFAULT_STITCHING)?,
    default_cutting_amt:   amount(payload, &DEFAULT_CUTTING)?,
  })
}

pub fn clothing_item_patch(payload: &Payload) -> Result<ClothingItemPatch> {
  Ok(ClothingItemPatch {
    stitching:             value(payload, &STITCHING)
      .map(|v| flag_of(v, &STITCHING))
      .transpose()?,
    default_stitching_amt: optional_amount(payload, &DEFAULT_STITCHING)?,
    default_cutting_amt:   optional_amount(payload, &DEFAULT_CUTTING)?,
  })
}

// ─── Measurements ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementInput {
  pub customer_id:           Uuid,
  pub measurements:          BodyMeasurements,
  pub customer_requirements: Option<String>,
  /// The body flagged a drawing; a staged `drawing` file must accompany it.
  pub drawing_requested:     bool,
}

/// `customer_id` is the raw path parameter.
pub fn measurement(customer_id: &str, payload: &Payload) -> Result<MeasurementInput> {
  let measurements = match value(payload, &MEASUREMENTS) {
    None => return Err(ValidationError("Measurements are Required".into())),
    Some(Value::Object(map)) if map.is_empty() => {
      return Err(ValidationError("Measurements are Required".into()));
    }
    Some(Value::Object(map)) => map.clone(),
    Some(_) => return Err(MEASUREMENTS.invalid()),
  };

  let customer_id = customer_id.trim();
  if customer_id.is_empty() {
    return Err(CUSTOMER_ID.required());
  }
  let customer_id = Uuid::parse_str(customer_id).map_err(|_| CUSTOMER_ID.invalid())?;

  Ok(MeasurementInput {
    customer_id,
    measurements,
    customer_requirements: optional_text(payload, &CUSTOMER_REQUIREMENTS)?,
    drawing_requested: truthy(payload.get("drawing")),
  })
}

// ─── Bills ───────────────────────────────────────────────────────────────────

pub fn sold_bill(payload: &Payload) -> Result<NewSoldBill> {
  Ok(NewSoldBill {
    name:         text(payload, &NAME)?,
    user_id:      uuid(payload, &USER_ID)?,
    customer_id:  uuid(payload, &CUSTOMER_ID)?,
    bill_number:  text(payload, &BILL_NUMBER)?,
    phone_number: text(payload, &BILL_PHONE)?,
    cloth_amt:    amount(payload, &CLOTH_AMT)?,
    total_amt:    amount(payload, &TOTAL_AMT)?,
  })
}

pub fn stitch_bill(payload: &Payload) -> Result<NewStitchBill> {
  let name = text(payload, &NAME)?;
  let user_id = uuid(payload, &USER_ID)?;
  let customer_id = uuid(payload, &CUSTOMER_ID)?;
  let bill_number = text(payload, &BILL_NUMBER)?;
  let phone_number = text(payload, &BILL_PHONE)?;
  let delivery_date = date(payload, &DELIVERY_DATE)?;
  let cloth_amt = amount(payload, &CLOTH_AMT)?;
  let clothes = match value(payload, &CLOTHES) {
    None => return Err(CLOTHES.required()),
    Some(v) => serde_json::from_value::<Vec<ClothLine>>(v.clone())
      .map_err(|_| CLOTHES.invalid())?,
  };
  let sub_total = amount(payload, &SUB_TOTAL)?;
  let advance_amt = amount(payload, &ADVANCE_AMT)?;
  let total_amt = amount(payload, &TOTAL_AMT)?;

  if !money_eq(total_amt, sub_total - advance_amt) {
    return Err(ValidationError(
      "Total Amount must equal Sub Total minus Advance Amount".into(),
    ));
  }

  Ok(NewStitchBill {
    name,
    user_id,
    customer_id,
    bill_number,
    phone_number,
    delivery_date,
    cloth_amt,
    clothes,
    sub_total,
    advance_amt,
    total_amt,
  })
}

// ─── Employee update ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeUpdateInput {
  /// The raw role tag; resolving it to a staff kind is the caller's job so an
  /// unsupported role can be reported as such.
  pub role:             String,
  /// `patch.avatar` is always `None` here; the URL comes from the upload.
  pub patch:            StaffPatch,
  pub password:         Option<String>,
  pub avatar_requested: bool,
}

/// Keys that are present are applied, including `0`.
pub fn employee_update(payload: &Payload) -> Result<EmployeeUpdateInput> {
  let role = text(payload, &ROLE)?;
  let patch = StaffPatch {
    name:         patch_text(payload, &NAME)?,
    phone_number: patch_text(payload, &PHONE)?,
    avatar:       None,
    advance:      optional_amount(payload, &ADVANCE)?,
    earned:       optional_amount(payload, &EARNED)?,
    monthly:      optional_amount(payload, &MONTHLY)?,
  };
  Ok(EmployeeUpdateInput {
    role,
    patch,
    password: secret(payload, &PASSWORD)?,
    avatar_requested: truthy(payload.get("avatar")),
  })
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn payload(v: Value) -> Payload {
    match v {
      Value::Object(map) => map,
      _ => panic!("payload must be an object"),
    }
  }

  fn message<T: std::fmt::Debug>(r: Result<T>) -> String { r.unwrap_err().0 }

  #[test]
  fn identity_requires_name_first() {
    let p = payload(json!({ "name": "   " }));
    assert_eq!(message(identity(&p)), "Name is Required");
  }

  #[test]
  fn identity_requires_phone() {
    let p = payload(json!({ "name": "Ravi" }));
    assert_eq!(message(identity(&p)), "Phone number is Required");
  }

  #[test]
  fn identity_trims_name_and_accepts_numeric_phone() {
    let p = payload(json!({ "name": "  Ravi ", "phoneNumber": 9876543210u64 }));
    let input = identity(&p).unwrap();
    assert_eq!(input.name, "Ravi");
    assert_eq!(input.phone_number, "9876543210");
  }

  #[test]
  fn null_counts_as_missing() {
    let p = payload(json!({ "name": "Ravi", "phoneNumber": null }));
    assert_eq!(message(identity(&p)), "Phone number is Required");
  }

  #[test]
  fn helper_requires_monthly() {
    let p = payload(json!({ "name": "Ravi", "phoneNumber": "1" }));
    assert_eq!(message(helper(&p)), "Monthly is Required");
    let p = payload(json!({ "name": "Ravi", "phoneNumber": "1", "monthly": "5000" }));
    assert_eq!(helper(&p).unwrap().monthly, 5000.0);
  }

  #[test]
  fn negative_amounts_are_invalid() {
    let p = payload(json!({ "name": "Ravi", "phoneNumber": "1", "monthly": -1 }));
    assert_eq!(message(helper(&p)), "Monthly is invalid");
  }

  #[test]
  fn clothing_item_checks_in_order() {
    let p = payload(json!({ "name": "Shirt", "defaultStitchingAmt": 300 }));
    assert_eq!(message(clothing_item(&p)), "Stitching is Required");
    let p = payload(json!({ "name": "Shirt", "stitching": true, "defaultStitchingAmt": 300 }));
    assert_eq!(message(clothing_item(&p)), "Default Cutting Amount is Required");
  }

  #[test]
  fn clothing_item_accepts_string_flags() {
    let p = payload(json!({
      "name": "Shirt", "stitching": "false",
      "defaultStitchingAmt": "0", "defaultCuttingAmt": 80
    }));
    let item = clothing_item(&p).unwrap();
    assert!(!item.stitching);
    assert_eq!(item.default_stitching_amt, 0.0);
  }

  #[test]
  fn measurement_requires_measurements_before_customer() {
    let p = payload(json!({}));
    assert_eq!(message(measurement("", &p)), "Measurements are Required");
    let p = payload(json!({ "measurements": { "chest": 38 } }));
    assert_eq!(message(measurement(" ", &p)), "Customer Id is Required");
    assert_eq!(message(measurement("nope", &p)), "Customer Id is invalid");
  }

  #[test]
  fn measurement_flags_drawing_and_requirements() {
    let id = Uuid::new_v4();
    let p = payload(json!({
      "measurements": { "chest": 38 },
      "customerRequirements": "slim fit",
      "drawing": "true"
    }));
    let input = measurement(&id.to_string(), &p).unwrap();
    assert_eq!(input.customer_id, id);
    assert_eq!(input.customer_requirements.as_deref(), Some("slim fit"));
    assert!(input.drawing_requested);

    let p = payload(json!({ "measurements": { "chest": 38 }, "customerRequirements": "" }));
    let input = measurement(&id.to_string(), &p).unwrap();
    assert_eq!(input.customer_requirements, None);
    assert!(!input.drawing_requested);
  }

  fn stitch_payload() -> Value {
    json!({
      "name": "Ravi",
      "user_id": Uuid::new_v4().to_string(),
      "customer_id": Uuid::new_v4().to_string(),
      "billNumber": 1042,
      "phoneNumber": "9876543210",
      "deliveryDate": "2026-11-02",
      "clothAmt": 0,
      "clothes": [{ "item": "Shirt", "amount": 300 }],
      "subTotal": 300,
      "advanceAmt": 100,
      "totalAmt": 200
    })
  }

  #[test]
  fn stitch_bill_parses() {
    let bill = stitch_bill(&payload(stitch_payload())).unwrap();
    assert_eq!(bill.bill_number, "1042");
    assert_eq!(bill.clothes[0].quantity, 1);
    assert_eq!(bill.delivery_date, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
  }

  #[test]
  fn stitch_bill_total_must_balance() {
    let mut p = payload(stitch_payload());
    p.insert("totalAmt".into(), json!(300));
    assert_eq!(
      message(stitch_bill(&p)),
      "Total Amount must equal Sub Total minus Advance Amount"
    );
  }

  #[test]
  fn stitch_bill_reports_first_missing_field() {
    let mut p = payload(stitch_payload());
    p.remove("deliveryDate");
    p.remove("subTotal");
    assert_eq!(message(stitch_bill(&p)), "Delivery Date is Required");
  }

  #[test]
  fn sold_bill_needs_valid_ids() {
    let p = payload(json!({ "name": "Ravi", "user_id": "not-a-uuid" }));
    assert_eq!(message(sold_bill(&p)), "User Id is invalid");
  }

  #[test]
  fn employee_update_applies_present_keys_only() {
    let p = payload(json!({ "role": "HELPER", "monthly": 0 }));
    let input = employee_update(&p).unwrap();
    assert_eq!(input.patch.monthly, Some(0.0));
    assert_eq!(input.patch.name, None);
    assert_eq!(input.patch.advance, None);
    assert_eq!(input.password, None);
    assert!(!input.avatar_requested);
  }

  #[test]
  fn employee_update_requires_role_and_rejects_blank_name() {
    assert_eq!(message(employee_update(&payload(json!({})))), "Role is Required");
    let p = payload(json!({ "role": "TAILOR", "name": "" }));
    assert_eq!(message(employee_update(&p)), "Name is Required");
  }

  #[test]
  fn employee_update_keeps_password_verbatim() {
    let p = payload(json!({ "role": "HELPER", "password": "  s3cret  " }));
    assert_eq!(employee_update(&p).unwrap().password.as_deref(), Some("  s3cret  "));

    let p = payload(json!({ "role": "HELPER", "password": "   " }));
    assert_eq!(message(employee_update(&p)), "Password is Required");
  }
}
