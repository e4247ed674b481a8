//! Error type for `stitchbook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A classified outcome (conflict, missing reference) the caller can act on.
  #[error(transparent)]
  Core(#[from] stitchbook_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {what} in database: {value:?}")]
  UnknownTag { what: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for stitchbook_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => stitchbook_core::Error::Backend(Box::new(other)),
    }
  }
}
