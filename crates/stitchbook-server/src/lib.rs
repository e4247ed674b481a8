//! Runtime wiring for the Stitchbook server binary: configuration and the
//! file hosts attachments are published to.

pub mod upload;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use stitchbook_api::Timeouts;

pub use upload::{HttpFileHost, LocalFileHost, UploadConfig, UploadHost};

/// Top-level server configuration (deserialised from `config.toml` and
/// `STITCHBOOK_*` environment variables).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  pub staging_dir:    PathBuf,
  pub upload:         UploadConfig,
  pub timeouts:       Timeouts,
  pub max_body_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:           "127.0.0.1".to_string(),
      port:           8000,
      store_path:     PathBuf::from("stitchbook.db"),
      staging_dir:    PathBuf::from("public/temp"),
      upload:         UploadConfig::default(),
      timeouts:       Timeouts::default(),
      max_body_bytes: 16 * 1024 * 1024,
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_file_yields_defaults() {
    let cfg = parse("");
    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.staging_dir, PathBuf::from("public/temp"));
    assert_eq!(cfg.timeouts, Timeouts::default());
    assert!(matches!(cfg.upload, UploadConfig::Local { .. }));
  }

  #[test]
  fn http_upload_and_partial_timeouts() {
    let cfg = parse(
      r#"
        port = 9100

        [upload]
        kind     = "http"
        endpoint = "https://media.example/upload"

        [timeouts]
        upload_ms = 1000
      "#,
    );
    assert_eq!(cfg.port, 9100);
    assert_eq!(cfg.timeouts.upload_ms, 1000);
    assert_eq!(cfg.timeouts.hash_ms, 5000);
    match cfg.upload {
      UploadConfig::Http { endpoint, api_key } => {
        assert_eq!(endpoint, "https://media.example/upload");
        assert!(api_key.is_none());
      }
      other => panic!("unexpected upload config: {other:?}"),
    }
  }

  #[test]
  fn tilde_is_expanded_only_at_the_start() {
    assert_eq!(expand_tilde(Path::new("data/~/x.db")), PathBuf::from("data/~/x.db"));
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(home).join("x.db"));
    }
  }
}
