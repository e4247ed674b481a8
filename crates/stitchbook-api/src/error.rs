//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use stitchbook_core::{Error as CoreError, validate::ValidationError};
use thiserror::Error;

/// An error returned by the workflow or a handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// First missing or malformed request field.
  #[error("{0}")]
  Validation(String),

  /// Upload or staged-file cleanup failed.
  #[error("{0}")]
  Attachment(String),

  #[error("unsupported role: {0}")]
  UnsupportedRole(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  Internal(String),

  /// The named step did not finish within its bound.
  #[error("{0} timed out")]
  Timeout(&'static str),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Validation(_) | Self::Attachment(_) | Self::UnsupportedRole(_) => {
        StatusCode::BAD_REQUEST
      }
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Conflict(_) => StatusCode::CONFLICT,
      Self::Internal(_) | Self::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<ValidationError> for ApiError {
  fn from(e: ValidationError) -> Self { Self::Validation(e.0) }
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::DuplicateIdentity => Self::Conflict("User already exists".into()),
      CoreError::DuplicateClothingItem(_) => {
        Self::Conflict("Clothing Item already exists".into())
      }
      CoreError::DuplicateBillNumber { kind, .. } => {
        Self::Conflict(format!("{kind} bill with this Bill Number already exists"))
      }
      CoreError::CustomerNotFound(_) => Self::NotFound("Customer not found".into()),
      CoreError::IdentityNotFound(_) => Self::NotFound("User not found".into()),
      CoreError::ClothingItemNotFound(_) => Self::NotFound("Clothing Item not found".into()),
      CoreError::ProfileNotFound { kind, .. } => Self::NotFound(format!("{kind} not found")),
      other => {
        tracing::error!(error = %other, "store failure");
        Self::Internal("Something went wrong while saving the record".into())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let body = json!({
      "statusCode": status.as_u16(),
      "message":    self.to_string(),
    });
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use stitchbook_core::profile::StaffKind;
  use uuid::Uuid;

  use super::*;

  #[test]
  fn classified_store_errors_keep_their_status() {
    assert_eq!(ApiError::from(CoreError::DuplicateIdentity).status(), StatusCode::CONFLICT);
    assert_eq!(
      ApiError::from(CoreError::CustomerNotFound(Uuid::new_v4())).status(),
      StatusCode::NOT_FOUND
    );
    let missing = ApiError::from(CoreError::ProfileNotFound {
      kind:    StaffKind::CuttingMaster,
      user_id: Uuid::new_v4(),
    });
    assert_eq!(missing.to_string(), "Cutting Master not found");
  }

  #[test]
  fn backend_errors_are_internal() {
    let e = ApiError::from(CoreError::Backend("disk full".into()));
    assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!e.to_string().contains("disk full"));
  }

  #[test]
  fn timeouts_name_the_step() {
    let e = ApiError::Timeout("upload");
    assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(e.to_string(), "upload timed out");
  }
}
