//! The `{statusCode, data, message}` success envelope.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
  #[serde(skip)]
  status:      StatusCode,
  status_code: u16,
  data:        T,
  message:     String,
}

impl<T> ApiResponse<T> {
  pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
    Self { status, status_code: status.as_u16(), data, message: message.into() }
  }

  pub fn ok(data: T, message: impl Into<String>) -> Self {
    Self::new(StatusCode::OK, data, message)
  }

  pub fn created(data: T, message: impl Into<String>) -> Self {
    Self::new(StatusCode::CREATED, data, message)
  }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
  fn into_response(self) -> Response { (self.status, Json(self)).into_response() }
}
