//! Handlers for `/employees/{id}`, where `id` is the employee's user id.

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use stitchbook_core::{attachment::FileHost, profile::StaffProfile, store::Store};

use crate::{AppState, envelope::ApiResponse, error::ApiError, workflow::Submission};

#[derive(Debug, Deserialize)]
pub struct RoleParams {
  pub role: Option<String>,
}

/// `GET /employees/{id}?role=<HELPER|CUTTING_MASTER|TAILOR>`
pub async fn get_one<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  Path(id): Path<String>,
  Query(params): Query<RoleParams>,
) -> Result<ApiResponse<StaffProfile>, ApiError> {
  let profile = state.workflow.employee(&id, params.role.as_deref()).await?;
  let message = format!("{} fetched successfully", profile.kind);
  Ok(ApiResponse::ok(profile, message))
}

/// `PATCH /employees/{id}`: body carries `role` plus any fields to change.
pub async fn update<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  Path(id): Path<String>,
  submission: Submission,
) -> Result<ApiResponse<StaffProfile>, ApiError> {
  let profile = state.workflow.update_employee(&id, submission).await?;
  let message = format!("{} Updated Successfully", profile.kind);
  Ok(ApiResponse::ok(profile, message))
}
