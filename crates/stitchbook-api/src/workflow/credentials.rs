//! Argon2 credential hashing.
//!
//! New accounts get their phone number as the initial password. Hashes are
//! PHC strings (`$argon2id$v=19$...`) and never leave the process.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::{self, SaltString},
};
use rand_core::OsRng;
use stitchbook_core::{
  attachment::{FileHost, StagedFiles},
  store::Store,
};

use super::{Workflow, bounded};
use crate::error::ApiError;

/// Hash `plain` with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(plain.as_bytes(), &salt)?.to_string())
}

/// Whether `plain` matches the PHC string `phc`. A malformed hash never matches.
pub fn verify_password(plain: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .and_then(|parsed| Argon2::default().verify_password(plain.as_bytes(), &parsed))
    .is_ok()
}

impl<S, H, F> Workflow<S, H, F>
where
  S: Store,
  H: FileHost,
  F: StagedFiles,
{
  /// Hash off the async runtime, under the hash bound.
  pub(crate) async fn hash(&self, plain: String) -> Result<String, ApiError> {
    let task = tokio::task::spawn_blocking(move || hash_password(&plain));
    bounded("hash", self.timeouts.hash_ms, task)
      .await?
      .map_err(|e| {
        tracing::error!(error = %e, "hashing task failed");
        ApiError::Internal("Something went wrong while securing the password".into())
      })?
      .map_err(|e| {
        tracing::error!(error = %e, "argon2 error");
        ApiError::Internal("Something went wrong while securing the password".into())
      })
  }
}
