//! Identity records: the root account shared by every role.
//!
//! An [`Identity`] carries the credential hash and must never leave the
//! process as-is. Everything handed back to callers goes through
//! [`PublicIdentity`], which has no credential fields at all.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::StaffKind;

// ─── Role ────────────────────────────────────────────────────────────────────

/// The role tag stored on every identity.
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
pub enum Role {
  Admin,
  Helper,
  /// Older clients send the tag with a space.
  #[serde(alias = "CUTTING MASTER")]
  #[strum(to_string = "CUTTING_MASTER", serialize = "CUTTING MASTER")]
  CuttingMaster,
  Tailor,
  Customer,
}

impl Role {
  /// The staff profile kind backing this role, if it has one.
  pub fn staff_kind(self) -> Option<StaffKind> {
    match self {
      Self::Helper => Some(StaffKind::Helper),
      Self::CuttingMaster => Some(StaffKind::CuttingMaster),
      Self::Tailor => Some(StaffKind::Tailor),
      Self::Admin | Self::Customer => None,
    }
  }
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// A stored account. Deliberately not `Serialize`.
#[derive(Clone)]
pub struct Identity {
  pub user_id:       Uuid,
  pub name:          String,
  pub phone_number:  String,
  /// PHC string produced by the credential hasher.
  pub password_hash: String,
  pub avatar:        String,
  pub role:          Role,
  pub refresh_token: Option<String>,
  pub created_at:    DateTime<Utc>,
}

impl Identity {
  /// The caller-facing projection without password or refresh token.
  pub fn public(&self) -> PublicIdentity {
    PublicIdentity {
      user_id:      self.user_id,
      name:         self.name.clone(),
      phone_number: self.phone_number.clone(),
      avatar:       self.avatar.clone(),
      role:         self.role,
      created_at:   self.created_at,
    }
  }
}

impl fmt::Debug for Identity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Identity")
      .field("user_id", &self.user_id)
      .field("name", &self.name)
      .field("role", &self.role)
      .field("password_hash", &"<redacted>")
      .finish_non_exhaustive()
  }
}

/// An [`Identity`] as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIdentity {
  #[serde(rename = "_id")]
  pub user_id:      Uuid,
  pub name:         String,
  pub phone_number: String,
  pub avatar:       String,
  pub role:         Role,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::Store::register`]. `user_id` and `created_at` are
/// assigned by the store.
#[derive(Clone)]
pub struct NewIdentity {
  pub name:          String,
  pub phone_number:  String,
  pub password_hash: String,
  pub avatar:        String,
  pub role:          Role,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn cutting_master_accepts_both_spellings() {
    assert_eq!(Role::from_str("CUTTING_MASTER").unwrap(), Role::CuttingMaster);
    assert_eq!(Role::from_str("CUTTING MASTER").unwrap(), Role::CuttingMaster);
    assert_eq!(Role::CuttingMaster.to_string(), "CUTTING_MASTER");
  }

  #[test]
  fn role_serde_uses_screaming_case() {
    let json = serde_json::to_string(&Role::Customer).unwrap();
    assert_eq!(json, "\"CUSTOMER\"");
    let parsed: Role = serde_json::from_str("\"CUTTING MASTER\"").unwrap();
    assert_eq!(parsed, Role::CuttingMaster);
  }

  #[test]
  fn public_projection_has_no_credentials() {
    let identity = Identity {
      user_id:       Uuid::new_v4(),
      name:          "Ravi".into(),
      phone_number:  "9876543210".into(),
      password_hash: "$argon2id$v=19$secret".into(),
      avatar:        "https://img.example/ravi.png".into(),
      role:          Role::Admin,
      refresh_token: Some("refresh".into()),
      created_at:    Utc::now(),
    };
    let json = serde_json::to_value(identity.public()).unwrap();
    let obj = json.as_object().unwrap();
    assert!(!obj.contains_key("password"));
    assert!(!obj.contains_key("passwordHash"));
    assert!(!obj.contains_key("refreshToken"));
    assert!(!format!("{identity:?}").contains("secret"));
  }
}
