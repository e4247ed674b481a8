//! File hosts attachments are published to.
//!
//! [`HttpFileHost`] posts the file as a multipart `file` part and reads the
//! durable URL from the JSON answer (`url`, or `secure_url` as media CDNs
//! name it). [`LocalFileHost`] copies into a directory that the server
//! itself serves.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use stitchbook_core::attachment::{FileHost, Uploaded};
use thiserror::Error;

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UploadConfig {
  Http {
    endpoint: String,
    #[serde(default)]
    api_key:  Option<String>,
  },
  Local {
    #[serde(default = "default_directory")]
    directory:       PathBuf,
    #[serde(default = "default_public_base_url")]
    public_base_url: String,
  },
}

fn default_directory() -> PathBuf { PathBuf::from("public/uploads") }

fn default_public_base_url() -> String { "http://127.0.0.1:8000/uploads".to_string() }

impl Default for UploadConfig {
  fn default() -> Self {
    Self::Local {
      directory:       default_directory(),
      public_base_url: default_public_base_url(),
    }
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum UploadError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("upload request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("file host answered without a URL")]
  MissingUrl,

  #[error("staged path has no file name: {0}")]
  NoFileName(PathBuf),
}

fn file_name(path: &Path) -> Result<String, UploadError> {
  path
    .file_name()
    .and_then(|n| n.to_str())
    .map(str::to_owned)
    .ok_or_else(|| UploadError::NoFileName(path.to_path_buf()))
}

// ─── HTTP host ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct HttpFileHost {
  client:   reqwest::Client,
  endpoint: String,
  api_key:  Option<String>,
}

impl HttpFileHost {
  pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
    Self { client: reqwest::Client::new(), endpoint: endpoint.into(), api_key }
  }
}

impl FileHost for HttpFileHost {
  type Error = UploadError;

  async fn upload<'a>(&'a self, local_path: &'a Path) -> Result<Uploaded, UploadError> {
    let name = file_name(local_path)?;
    let bytes = tokio::fs::read(local_path).await?;
    let form = reqwest::multipart::Form::new()
      .part("file", reqwest::multipart::Part::bytes(bytes).file_name(name));

    let mut req = self.client.post(&self.endpoint).multipart(form);
    if let Some(key) = &self.api_key {
      req = req.bearer_auth(key);
    }
    let body: Value = req.send().await?.error_for_status()?.json().await?;

    let url = ["url", "secure_url"]
      .iter()
      .find_map(|k| body.get(*k).and_then(Value::as_str))
      .filter(|u| !u.is_empty())
      .ok_or(UploadError::MissingUrl)?;
    tracing::debug!(%url, "file published");
    Ok(Uploaded { url: url.to_owned() })
  }
}

// ─── Local host ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LocalFileHost {
  directory:       PathBuf,
  public_base_url: String,
}

impl LocalFileHost {
  pub fn new(directory: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
    Self { directory: directory.into(), public_base_url: public_base_url.into() }
  }

  pub fn directory(&self) -> &Path { &self.directory }
}

impl FileHost for LocalFileHost {
  type Error = UploadError;

  async fn upload<'a>(&'a self, local_path: &'a Path) -> Result<Uploaded, UploadError> {
    let name = file_name(local_path)?;
    tokio::fs::create_dir_all(&self.directory).await?;
    tokio::fs::copy(local_path, self.directory.join(&name)).await?;
    let base = self.public_base_url.trim_end_matches('/');
    Ok(Uploaded { url: format!("{base}/{name}") })
  }
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// The configured host.
#[derive(Debug, Clone)]
pub enum UploadHost {
  Http(HttpFileHost),
  Local(LocalFileHost),
}

impl From<&UploadConfig> for UploadHost {
  fn from(cfg: &UploadConfig) -> Self {
    match cfg {
      UploadConfig::Http { endpoint, api_key } => {
        Self::Http(HttpFileHost::new(endpoint.clone(), api_key.clone()))
      }
      UploadConfig::Local { directory, public_base_url } => {
        Self::Local(LocalFileHost::new(directory.clone(), public_base_url.clone()))
      }
    }
  }
}

impl FileHost for UploadHost {
  type Error = UploadError;

  async fn upload<'a>(&'a self, local_path: &'a Path) -> Result<Uploaded, UploadError> {
    match self {
      Self::Http(host) => host.upload(local_path).await,
      Self::Local(host) => host.upload(local_path).await,
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::{Json, Router, extract::Multipart, http::HeaderMap, routing::post};
  use serde_json::json;
  use tokio::net::TcpListener;

  use super::*;

  fn staged(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"image bytes").unwrap();
    path
  }

  #[tokio::test]
  async fn local_host_copies_and_keeps_the_source() {
    let tmp = tempfile::tempdir().unwrap();
    let src = staged(tmp.path(), "avatar-1.png");
    let host = LocalFileHost::new(tmp.path().join("uploads"), "http://shop.test/uploads/");

    let uploaded = host.upload(&src).await.unwrap();
    assert_eq!(uploaded.url, "http://shop.test/uploads/avatar-1.png");
    assert_eq!(
      std::fs::read(host.directory().join("avatar-1.png")).unwrap(),
      b"image bytes"
    );
    assert!(src.exists());
  }

  #[tokio::test]
  async fn local_host_reports_missing_source() {
    let tmp = tempfile::tempdir().unwrap();
    let host = LocalFileHost::new(tmp.path().join("uploads"), "http://shop.test");
    let err = host.upload(&tmp.path().join("gone.png")).await.unwrap_err();
    assert!(matches!(err, UploadError::Io(_)));
  }

  /// Serve a one-route media host on an ephemeral port.
  async fn media_host(answer: serde_json::Value) -> String {
    let app = Router::new().route(
      "/upload",
      post(move |headers: HeaderMap, mut form: Multipart| {
        let answer = answer.clone();
        async move {
          let field = form.next_field().await.unwrap().unwrap();
          assert_eq!(field.name(), Some("file"));
          assert_eq!(field.file_name(), Some("drawing-1.png"));
          assert_eq!(
            headers.get("authorization").and_then(|v| v.to_str().ok()),
            Some("Bearer k3y")
          );
          Json(answer)
        }
      }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}/upload")
  }

  #[tokio::test]
  async fn http_host_reads_secure_url() {
    let tmp = tempfile::tempdir().unwrap();
    let src = staged(tmp.path(), "drawing-1.png");
    let endpoint = media_host(json!({ "secure_url": "https://cdn.test/d1.png" })).await;

    let host = HttpFileHost::new(endpoint, Some("k3y".into()));
    let uploaded = host.upload(&src).await.unwrap();
    assert_eq!(uploaded.url, "https://cdn.test/d1.png");
  }

  #[tokio::test]
  async fn http_host_without_url_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let src = staged(tmp.path(), "drawing-1.png");
    let endpoint = media_host(json!({ "ok": true })).await;

    let host = UploadHost::Http(HttpFileHost::new(endpoint, Some("k3y".into())));
    let err = host.upload(&src).await.unwrap_err();
    assert!(matches!(err, UploadError::MissingUrl));
  }
}
