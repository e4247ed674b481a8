//! Handlers for `/bills/sold` and `/bills/stitch`.

use axum::extract::State;
use stitchbook_core::{
  attachment::FileHost,
  bill::{SoldBill, StitchBill},
  store::Store,
};

use crate::{AppState, envelope::ApiResponse, error::ApiError, workflow::Submission};

/// `POST /bills/sold`
pub async fn create_sold<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  submission: Submission,
) -> Result<ApiResponse<SoldBill>, ApiError> {
  let payload = state.workflow.payload_only(submission).await;
  let bill = state.workflow.add_sold_bill(&payload).await?;
  Ok(ApiResponse::created(bill, "Add Sold Bill for customer successfully"))
}

/// `POST /bills/stitch`
pub async fn create_stitch<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  submission: Submission,
) -> Result<ApiResponse<StitchBill>, ApiError> {
  let payload = state.workflow.payload_only(submission).await;
  let bill = state.workflow.add_stitch_bill(&payload).await?;
  Ok(ApiResponse::created(bill, "Add Stitch Bill for customer successfully"))
}
