//! The onboarding and billing workflow.
//!
//! Every inbound operation is a method on [`Workflow`]: validate the payload,
//! run the guards, hash credentials, publish staged attachments, then hand a
//! fully formed record to the [`Store`]. Each call to an external collaborator
//! (store, file host, staging area, hasher) is bounded by its timeout and any
//! failure stops the operation where it is.

use std::{future::Future, path::PathBuf, time::Duration};

use serde::Deserialize;
use stitchbook_core::{
  Error as CoreError,
  attachment::{FileHost, StagedFiles},
  store::Store,
  validate::Payload,
};
use uuid::Uuid;

use crate::error::ApiError;

pub mod attachment;
pub mod billing;
pub mod catalog;
pub mod credentials;
pub mod customers;
pub mod employee;
pub mod measurement;
pub mod onboarding;

pub use attachment::LocalStaging;

// ─── Submission ──────────────────────────────────────────────────────────────

/// A request body together with the files staged alongside it.
#[derive(Debug, Clone, Default)]
pub struct Submission {
  pub payload: Payload,
  pub avatar:  Option<PathBuf>,
  pub drawing: Option<PathBuf>,
}

impl Submission {
  pub fn json(payload: Payload) -> Self { Self { payload, ..Default::default() } }
}

// ─── Timeouts ────────────────────────────────────────────────────────────────

/// Upper bounds on each kind of external call, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timeouts {
  pub hash_ms:   u64,
  pub upload_ms: u64,
  pub store_ms:  u64,
}

impl Default for Timeouts {
  fn default() -> Self { Self { hash_ms: 5_000, upload_ms: 30_000, store_ms: 5_000 } }
}

/// Run `fut` to completion or fail with [`ApiError::Timeout`] naming `step`.
pub(crate) async fn bounded<T>(
  step: &'static str,
  limit_ms: u64,
  fut: impl Future<Output = T>,
) -> Result<T, ApiError> {
  tokio::time::timeout(Duration::from_millis(limit_ms), fut)
    .await
    .map_err(|_| {
      tracing::error!(step, limit_ms, "external call timed out");
      ApiError::Timeout(step)
    })
}

/// Parse an id taken from the request path.
pub(crate) fn parse_id(raw: &str, label: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw.trim()).map_err(|_| ApiError::Validation(format!("{label} is invalid")))
}

// ─── Workflow ────────────────────────────────────────────────────────────────

/// Orchestrates every create/update operation over its collaborators.
pub struct Workflow<S, H, F = LocalStaging> {
  store:    S,
  host:     H,
  staged:   F,
  timeouts: Timeouts,
}

impl<S, H, F> Workflow<S, H, F>
where
  S: Store,
  H: FileHost,
  F: StagedFiles,
{
  pub fn new(store: S, host: H, staged: F, timeouts: Timeouts) -> Self {
    Self { store, host, staged, timeouts }
  }

  pub fn staged_files(&self) -> &F { &self.staged }

  /// Await a store call under the store bound, classifying its error.
  pub(crate) async fn stored<T>(
    &self,
    fut: impl Future<Output = Result<T, S::Error>>,
  ) -> Result<T, ApiError> {
    bounded("store", self.timeouts.store_ms, fut)
      .await?
      .map_err(|e| ApiError::from(Into::<CoreError>::into(e)))
  }
}
