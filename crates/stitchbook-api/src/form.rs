//! Request body extraction into a [`Submission`].
//!
//! `multipart/form-data` bodies have their `avatar` and `drawing` file parts
//! written to the staging directory under fresh names. Free-text parts
//! (names, phone and bill numbers, passwords) become string fields as sent;
//! every other part is parsed as JSON when it parses and kept as a string
//! otherwise. Any other body is read as a JSON object.

use std::path::{Path, PathBuf};

use axum::{
  body::Bytes,
  extract::{FromRequest, Multipart, Request, multipart::Field},
  http::header,
};
use serde_json::Value;
use stitchbook_core::{attachment::FileHost, store::Store};
use tokio::io::AsyncWriteExt as _;
use uuid::Uuid;

use crate::{AppState, error::ApiError, workflow::Submission};

const FILE_FIELDS: [&str; 2] = ["avatar", "drawing"];

const TEXT_FIELDS: [&str; 6] =
  ["name", "phoneNumber", "billNumber", "password", "role", "customerRequirements"];

fn bad_form(e: impl std::fmt::Display) -> ApiError {
  ApiError::Validation(format!("Malformed request body: {e}"))
}

fn staging_failed(e: std::io::Error) -> ApiError {
  tracing::error!(error = %e, "could not stage attachment");
  ApiError::Internal("Could not stage the uploaded file".into())
}

impl<S, H> FromRequest<AppState<S, H>> for Submission
where
  S: Store + 'static,
  H: FileHost + 'static,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &AppState<S, H>) -> Result<Self, Self::Rejection> {
    let is_multipart = req
      .headers()
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
      let multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| bad_form(e.body_text()))?;
      let dir = state.workflow.staged_files().dir();
      return stage_multipart(multipart, dir).await;
    }

    let bytes = Bytes::from_request(req, state)
      .await
      .map_err(|e| bad_form(e.body_text()))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(Submission::default());
    }
    match serde_json::from_slice::<Value>(&bytes) {
      Ok(Value::Object(payload)) => Ok(Submission::json(payload)),
      Ok(_) => Err(bad_form("expected a JSON object")),
      Err(e) => Err(bad_form(e)),
    }
  }
}

async fn stage_multipart(mut multipart: Multipart, dir: &Path) -> Result<Submission, ApiError> {
  let mut submission = Submission::default();
  if let Err(e) = read_parts(&mut multipart, dir, &mut submission).await {
    for staged in [submission.avatar, submission.drawing].into_iter().flatten() {
      remove_staged(staged).await;
    }
    return Err(e);
  }
  Ok(submission)
}

async fn read_parts(
  multipart: &mut Multipart,
  dir: &Path,
  submission: &mut Submission,
) -> Result<(), ApiError> {
  while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
    let Some(name) = field.name().map(str::to_owned) else {
      continue;
    };

    if FILE_FIELDS.contains(&name.as_str()) && field.file_name().is_some() {
      let path = stage_file(field, &name, dir).await?;
      tracing::debug!(field = %name, path = %path.display(), "attachment staged");
      let slot = match name.as_str() {
        "avatar" => &mut submission.avatar,
        _ => &mut submission.drawing,
      };
      // A repeated part replaces the earlier one.
      if let Some(previous) = slot.replace(path) {
        remove_staged(previous).await;
      }
      continue;
    }

    let text = field.text().await.map_err(bad_form)?;
    let value = if TEXT_FIELDS.contains(&name.as_str()) {
      Value::String(text)
    } else {
      serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    submission.payload.insert(name, value);
  }
  Ok(())
}

async fn remove_staged(path: PathBuf) {
  if let Err(e) = tokio::fs::remove_file(&path).await {
    tracing::warn!(error = %e, path = %path.display(), "could not remove staged file");
  }
}

/// Stream one file part to `<dir>/<field>-<uuid>[.ext]`.
async fn stage_file(mut field: Field<'_>, name: &str, dir: &Path) -> Result<PathBuf, ApiError> {
  let extension = field
    .file_name()
    .and_then(|f| Path::new(f).extension())
    .and_then(|e| e.to_str())
    .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
    .map(|e| format!(".{}", e.to_ascii_lowercase()))
    .unwrap_or_default();
  let path = dir.join(format!("{name}-{}{extension}", Uuid::new_v4()));

  tokio::fs::create_dir_all(dir).await.map_err(staging_failed)?;
  let mut file = tokio::fs::File::create(&path).await.map_err(staging_failed)?;
  let written = async {
    while let Some(chunk) = field.chunk().await.map_err(bad_form)? {
      file.write_all(&chunk).await.map_err(staging_failed)?;
    }
    file.flush().await.map_err(staging_failed)
  }
  .await;

  match written {
    Ok(()) => Ok(path),
    Err(e) => {
      drop(file);
      remove_staged(path).await;
      Err(e)
    }
  }
}

