//! Error types for `stitchbook-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{bill::BillKind, profile::StaffKind};

/// Storage outcomes every backend reports in the same shape, so callers can
/// branch on conflicts and missing references without knowing the backend.
#[derive(Debug, Error)]
pub enum Error {
  #[error("an identity with this name or phone number already exists")]
  DuplicateIdentity,

  #[error("clothing item {0:?} already exists")]
  DuplicateClothingItem(String),

  #[error("{kind} bill number {number:?} already exists")]
  DuplicateBillNumber { kind: BillKind, number: String },

  #[error("customer not found: {0}")]
  CustomerNotFound(Uuid),

  #[error("identity not found: {0}")]
  IdentityNotFound(Uuid),

  #[error("clothing item not found: {0:?}")]
  ClothingItemNotFound(String),

  #[error("{kind} profile not found for identity {user_id}")]
  ProfileNotFound { kind: StaffKind, user_id: Uuid },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
