//! Onboarding and billing workflow for Stitchbook, with its JSON router.
//!
//! [`workflow::Workflow`] holds the business rules and talks only to the
//! [`Store`] and [`FileHost`] abstractions. [`router`] exposes it over axum;
//! TLS, sessions and body limits are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = stitchbook_api::router(state).layer(TraceLayer::new_for_http());
//! ```

pub mod envelope;
pub mod error;
pub mod form;
pub mod handlers;
pub mod workflow;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use stitchbook_core::{attachment::FileHost, store::Store};

pub use envelope::ApiResponse;
pub use error::ApiError;
pub use workflow::{LocalStaging, Submission, Timeouts, Workflow};

use handlers::{accounts, bills, catalog, customers, employees};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, H> {
  pub workflow: Arc<Workflow<S, H, LocalStaging>>,
}

impl<S, H> AppState<S, H>
where
  S: Store,
  H: FileHost,
{
  pub fn new(workflow: Workflow<S, H, LocalStaging>) -> Self {
    Self { workflow: Arc::new(workflow) }
  }
}

impl<S, H> Clone for AppState<S, H> {
  fn clone(&self) -> Self { Self { workflow: Arc::clone(&self.workflow) } }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S, H>(state: AppState<S, H>) -> Router<()>
where
  S: Store + 'static,
  H: FileHost + 'static,
{
  Router::new()
    // Accounts
    .route("/admins", post(accounts::create_admin::<S, H>))
    .route("/helpers", post(accounts::create_helper::<S, H>))
    .route("/cutting-masters", post(accounts::create_cutting_master::<S, H>))
    .route("/tailors", post(accounts::create_tailor::<S, H>))
    .route("/users/{id}", get(accounts::get_user::<S, H>))
    // Customers
    .route(
      "/customers",
      get(customers::list::<S, H>).post(accounts::create_customer::<S, H>),
    )
    .route("/customers/{id}", get(customers::get_one::<S, H>))
    .route("/customers/{id}/measurements", post(customers::add_measurement::<S, H>))
    .route("/customers/{id}/history", get(customers::history::<S, H>))
    .route("/customers/{id}/bills", get(customers::bills::<S, H>))
    // Catalog
    .route("/clothing-items", get(catalog::list::<S, H>).post(catalog::create::<S, H>))
    .route("/clothing-items/{name}", patch(catalog::update::<S, H>))
    // Bills
    .route("/bills/sold", post(bills::create_sold::<S, H>))
    .route("/bills/stitch", post(bills::create_stitch::<S, H>))
    // Employees
    .route(
      "/employees/{id}",
      get(employees::get_one::<S, H>).patch(employees::update::<S, H>),
    )
    .with_state(state)
}
