//! Handlers for `/customers/{id}` reads and measurement ingestion.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/customers` | customers joined with their identity |
//! | `GET`  | `/customers/{id}` | 404 if not found |
//! | `POST` | `/customers/{id}/measurements` | optional `drawing` file |
//! | `GET`  | `/customers/{id}/history` | oldest first |
//! | `GET`  | `/customers/{id}/bills` | `{sold, stitched}` |

use axum::extract::{Path, State};
use stitchbook_core::{
  attachment::FileHost,
  measurement::{Measurement, MeasurementHistory},
  profile::{Customer, CustomerSummary},
  store::Store,
};

use crate::{
  AppState,
  envelope::ApiResponse,
  error::ApiError,
  workflow::{Submission, customers::CustomerBills},
};

pub async fn list<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
) -> Result<ApiResponse<Vec<CustomerSummary>>, ApiError> {
  let customers = state.workflow.customers().await?;
  Ok(ApiResponse::ok(customers, "Customers fetched successfully"))
}

pub async fn get_one<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  Path(id): Path<String>,
) -> Result<ApiResponse<Customer>, ApiError> {
  let customer = state.workflow.customer(&id).await?;
  Ok(ApiResponse::ok(customer, "Customer fetched successfully"))
}

pub async fn add_measurement<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  Path(id): Path<String>,
  submission: Submission,
) -> Result<ApiResponse<Measurement>, ApiError> {
  let measurement = state.workflow.add_measurement(&id, submission).await?;
  Ok(ApiResponse::created(measurement, "Add Measurement for customer successfully"))
}

pub async fn history<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  Path(id): Path<String>,
) -> Result<ApiResponse<Vec<MeasurementHistory>>, ApiError> {
  let history = state.workflow.measurement_history(&id).await?;
  Ok(ApiResponse::ok(history, "Measurement history fetched successfully"))
}

pub async fn bills<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  Path(id): Path<String>,
) -> Result<ApiResponse<CustomerBills>, ApiError> {
  let bills = state.workflow.customer_bills(&id).await?;
  Ok(ApiResponse::ok(bills, "Bills fetched successfully"))
}
