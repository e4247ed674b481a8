//! Collaborator contracts for staged attachments.
//!
//! An inbound file is first staged on local disk, then handed to a
//! [`FileHost`] which returns a durable URL, then removed from staging via
//! [`StagedFiles`].

use std::{future::Future, path::Path};

use serde::{Deserialize, Serialize};

/// What a [`FileHost`] hands back after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uploaded {
  pub url: String,
}

/// An external host that turns a local file into a durable URL.
pub trait FileHost: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn upload<'a>(
    &'a self,
    local_path: &'a Path,
  ) -> impl Future<Output = Result<Uploaded, Self::Error>> + Send + 'a;
}

/// The local area attachments are staged in before upload.
pub trait StagedFiles: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Remove a staged file. A failure here is not swallowed by callers.
  fn remove<'a>(
    &'a self,
    local_path: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

/// The final component of a staged path, whichever separator convention it
/// was written with.
///
/// ```
/// use stitchbook_core::attachment::staged_file_name;
/// assert_eq!(staged_file_name("public/temp/a.png"), Some("a.png"));
/// assert_eq!(staged_file_name(r"C:\app\public\temp\a.png"), Some("a.png"));
/// ```
pub fn staged_file_name(local_path: &str) -> Option<&str> {
  local_path
    .rsplit(['/', '\\'])
    .next()
    .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_unix_paths() {
    assert_eq!(staged_file_name("/tmp/x.png"), Some("x.png"));
    assert_eq!(staged_file_name("x.png"), Some("x.png"));
  }

  #[test]
  fn splits_windows_paths() {
    assert_eq!(staged_file_name(r"D:\shop\public\temp\drawing-1.jpg"), Some("drawing-1.jpg"));
  }

  #[test]
  fn splits_mixed_separators() {
    assert_eq!(staged_file_name(r"public/temp\mixed.png"), Some("mixed.png"));
  }

  #[test]
  fn rejects_directories_and_traversal() {
    assert_eq!(staged_file_name("/tmp/"), None);
    assert_eq!(staged_file_name(""), None);
    assert_eq!(staged_file_name("/tmp/.."), None);
  }
}
