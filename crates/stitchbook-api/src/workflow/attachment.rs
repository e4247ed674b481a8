//! Publishing staged attachments.
//!
//! A staged file is uploaded to the [`FileHost`] and, only once the upload
//! succeeded, removed from staging. A failed upload leaves the staged file in
//! place; a failed removal fails the request. Files of a request refused
//! before its upload, and files the operation has no use for, are discarded.

use std::path::{Path, PathBuf};

use stitchbook_core::{
  attachment::{FileHost, StagedFiles, staged_file_name},
  store::Store,
  validate::Payload,
};
use thiserror::Error;

use super::{Submission, Workflow, bounded};
use crate::error::ApiError;

// ─── Local staging ───────────────────────────────────────────────────────────

/// The staging directory on local disk.
#[derive(Debug, Clone)]
pub struct LocalStaging {
  dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StagingError {
  #[error("staged path {0:?} does not name a file")]
  NoFileName(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl LocalStaging {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn dir(&self) -> &Path { &self.dir }
}

impl StagedFiles for LocalStaging {
  type Error = StagingError;

  /// Only the file name of `local_path` is used; the file is always looked up
  /// inside the staging directory.
  async fn remove<'a>(&'a self, local_path: &'a str) -> Result<(), StagingError> {
    let name = staged_file_name(local_path)
      .ok_or_else(|| StagingError::NoFileName(local_path.to_owned()))?;
    tokio::fs::remove_file(self.dir.join(name)).await?;
    Ok(())
  }
}

// ─── Publish ─────────────────────────────────────────────────────────────────

impl<S, H, F> Workflow<S, H, F>
where
  S: Store,
  H: FileHost,
  F: StagedFiles,
{
  /// Upload the file at `local_path` and clean it out of staging, returning
  /// its durable URL. `missing` is the message reported when the host gives
  /// nothing back.
  pub(crate) async fn publish(
    &self,
    local_path: &Path,
    missing: &'static str,
  ) -> Result<String, ApiError> {
    let uploaded = bounded("upload", self.timeouts.upload_ms, self.host.upload(local_path))
      .await?
      .map_err(|e| {
        tracing::warn!(error = %e, path = %local_path.display(), "upload failed");
        ApiError::Attachment(missing.into())
      })?;
    if uploaded.url.trim().is_empty() {
      return Err(ApiError::Attachment(missing.into()));
    }
    tracing::debug!(url = %uploaded.url, "attachment uploaded");

    let staged = local_path.to_string_lossy();
    bounded("cleanup", self.timeouts.upload_ms, self.staged.remove(&staged))
      .await?
      .map_err(|e| {
        tracing::warn!(error = %e, path = %staged, "staged file removal failed");
        ApiError::Attachment("Error in deleting the file".into())
      })?;
    tracing::debug!(path = %staged, "staged file removed");

    Ok(uploaded.url)
  }

  /// Remove a staged file that will not be published. Failures are logged
  /// and otherwise ignored.
  pub(crate) async fn discard(&self, local_path: Option<&Path>) {
    let Some(local_path) = local_path else {
      return;
    };
    let staged = local_path.to_string_lossy();
    match bounded("cleanup", self.timeouts.upload_ms, self.staged.remove(&staged)).await {
      Ok(Ok(())) => tracing::debug!(path = %staged, "unused staged file discarded"),
      Ok(Err(e)) => tracing::warn!(error = %e, path = %staged, "could not discard staged file"),
      Err(_) => {}
    }
  }

  /// Pass `result` through, discarding the file at `local_path` first when
  /// it is an error.
  pub(crate) async fn discard_on_err<T>(
    &self,
    local_path: Option<&Path>,
    result: Result<T, ApiError>,
  ) -> Result<T, ApiError> {
    if result.is_err() {
      self.discard(local_path).await;
    }
    result
  }

  /// The payload of a request that takes no attachments; any staged file is
  /// discarded.
  pub(crate) async fn payload_only(&self, submission: Submission) -> Payload {
    self.discard(submission.avatar.as_deref()).await;
    self.discard(submission.drawing.as_deref()).await;
    submission.payload
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn removes_by_file_name_inside_staging_dir() {
    let dir = tempfile::tempdir().unwrap();
    let staged = dir.path().join("avatar-1.png");
    std::fs::write(&staged, b"png").unwrap();

    let staging = LocalStaging::new(dir.path());
    staging.remove(r"C:\elsewhere\avatar-1.png").await.unwrap();
    assert!(!staged.exists());
  }

  #[tokio::test]
  async fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let staging = LocalStaging::new(dir.path());
    let err = staging.remove("public/temp/ghost.png").await.unwrap_err();
    assert!(matches!(err, StagingError::Io(_)));
  }

  #[tokio::test]
  async fn directory_paths_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let staging = LocalStaging::new(dir.path());
    let err = staging.remove("public/temp/").await.unwrap_err();
    assert!(matches!(err, StagingError::NoFileName(_)));
  }
}
