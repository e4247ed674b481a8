//! Handlers for account creation and identity reads.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/admins` | `name`, `phoneNumber`, `avatar` file |
//! | `POST` | `/helpers` | as above plus `monthly` |
//! | `POST` | `/cutting-masters` | price map seeded from cutting defaults |
//! | `POST` | `/tailors` | price map seeded from stitching defaults |
//! | `POST` | `/customers` | creates the customer profile |
//! | `GET`  | `/users/{id}` | never includes credentials |

use axum::extract::{Path, State};
use stitchbook_core::{
  attachment::FileHost,
  identity::{PublicIdentity, Role},
  store::Store,
};

use crate::{AppState, envelope::ApiResponse, error::ApiError, workflow::Submission};

type Created = Result<ApiResponse<PublicIdentity>, ApiError>;

async fn onboard<S, H>(state: &AppState<S, H>, role: Role, submission: Submission) -> Created
where
  S: Store,
  H: FileHost,
{
  let user = state.workflow.onboard(role, submission).await?;
  Ok(ApiResponse::created(user, "User registered successfully"))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /admins`
pub async fn create_admin<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  submission: Submission,
) -> Created {
  onboard(&state, Role::Admin, submission).await
}

/// `POST /helpers`
pub async fn create_helper<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  submission: Submission,
) -> Created {
  onboard(&state, Role::Helper, submission).await
}

/// `POST /cutting-masters`
pub async fn create_cutting_master<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  submission: Submission,
) -> Created {
  onboard(&state, Role::CuttingMaster, submission).await
}

/// `POST /tailors`
pub async fn create_tailor<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  submission: Submission,
) -> Created {
  onboard(&state, Role::Tailor, submission).await
}

/// `POST /customers`
pub async fn create_customer<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  submission: Submission,
) -> Created {
  onboard(&state, Role::Customer, submission).await
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_user<S: Store, H: FileHost>(
  State(state): State<AppState<S, H>>,
  Path(id): Path<String>,
) -> Result<ApiResponse<PublicIdentity>, ApiError> {
  let user = state.workflow.user(&id).await?;
  Ok(ApiResponse::ok(user, "User fetched successfully"))
}
