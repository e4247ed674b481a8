//! Stitchbook server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the workflow's JSON API over HTTP.
//!
//! # Password hash generation
//!
//! To print the argon2 PHC string for a password:
//!
//! ```
//! cargo run -p stitchbook-server --bin server -- --hash-password
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use axum::extract::DefaultBodyLimit;
use clap::Parser;
use stitchbook_api::{AppState, LocalStaging, Workflow, workflow::credentials::hash_password};
use stitchbook_server::{ServerConfig, UploadHost, expand_tilde};
use stitchbook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Stitchbook tailoring back-office server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_stdin_line()?;
    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("STITCHBOOK").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let staging_dir = expand_tilde(&server_cfg.staging_dir);
  tokio::fs::create_dir_all(&staging_dir)
    .await
    .with_context(|| format!("failed to create staging dir {staging_dir:?}"))?;

  let host = UploadHost::from(&server_cfg.upload);
  let served = match &host {
    UploadHost::Local(local) => Some(ServeDir::new(local.directory())),
    UploadHost::Http(_) => None,
  };

  let workflow = Workflow::new(
    store,
    host,
    LocalStaging::new(&staging_dir),
    server_cfg.timeouts,
  );
  let mut app = stitchbook_api::router(AppState::new(workflow));
  if let Some(dir) = served {
    app = app.nest_service("/uploads", dir);
  }
  let app = app
    .layer(DefaultBodyLimit::max(server_cfg.max_body_bytes))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!(staging = %staging_dir.display(), "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read one line from stdin.
fn read_stdin_line() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
