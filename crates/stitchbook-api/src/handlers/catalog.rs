//! Handlers for `/clothing-items`.

use axum::extract::{Path, State};
use stitchbook_core::{attachment::FileHost, catalog::ClothingItem, store::Store};

use crate::{AppState, envelope::ApiResponse, error::ApiError, workflow::Submission};

/// `GET /clothing-items`: ordered by name.
pub async fn list<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
) -> Result<ApiResponse<Vec<ClothingItem>>, ApiError> {
  let items = state.workflow.clothing_items().await?;
  Ok(ApiResponse::ok(items, "Clothing Items fetched successfully"))
}

/// `POST /clothing-items`
pub async fn create<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  submission: Submission,
) -> Result<ApiResponse<ClothingItem>, ApiError> {
  let payload = state.workflow.payload_only(submission).await;
  let item = state.workflow.add_clothing_item(&payload).await?;
  Ok(ApiResponse::created(item, "Clothing Item created successfully"))
}

/// `PATCH /clothing-items/{name}`
pub async fn update<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  Path(name): Path<String>,
  submission: Submission,
) -> Result<ApiResponse<ClothingItem>, ApiError> {
  let payload = state.workflow.payload_only(submission).await;
  let item = state.workflow.update_clothing_item(&name, &payload).await?;
  Ok(ApiResponse::ok(item, "Clothing Item updated successfully"))
}
