//! Process wiring for the Reel server: configuration, backend selection, and
//! router assembly.

pub mod error;

pub use error::{Error, Result};

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::Router;
use mockable::DefaultClock;
use reel_api::{AppState, AuthConfig};
use reel_auth::TokenSigner;
use reel_store_file::FileStore;
use reel_store_sqlite::SqliteStore;
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which persistence backend serves the movie collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// SQLite database at `store_path`.
  Sqlite,
  /// In-memory collection mirrored to the JSON file at `store_path`.
  File,
}

impl Backend {
  pub fn label(self) -> &'static str {
    match self {
      Self::Sqlite => "sqlite",
      Self::File => "file",
    }
  }
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `REEL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default = "default_backend")]
  pub backend:          Backend,
  #[serde(default = "default_store_path")]
  pub store_path:       PathBuf,
  #[serde(default)]
  pub token_secret:     String,
  #[serde(default = "default_token_ttl_secs")]
  pub token_ttl_secs:   i64,
  #[serde(default = "default_store_timeout_ms")]
  pub store_timeout_ms: u64,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 3000 }
fn default_backend() -> Backend { Backend::File }
fn default_store_path() -> PathBuf { PathBuf::from("movies.json") }
fn default_token_ttl_secs() -> i64 { 3600 }
fn default_store_timeout_ms() -> u64 { 5000 }

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `REEL_*` environment
  /// variables, then validate.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("REEL"))
      .build()?;

    let cfg: Self = settings.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
  }

  pub fn validate(&self) -> Result<()> {
    if self.token_secret.trim().is_empty() {
      return Err(Error::MissingSecret);
    }
    if self.token_ttl_secs <= 0 {
      return Err(Error::InvalidTtl(self.token_ttl_secs));
    }
    Ok(())
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_timeout(&self) -> Duration { Duration::from_millis(self.store_timeout_ms) }

  pub fn token_ttl(&self) -> chrono::Duration { chrono::Duration::seconds(self.token_ttl_secs) }
}

// ─── Assembly ─────────────────────────────────────────────────────────────────

/// Open the configured backend at `store_path` and build the API router.
///
/// The signing secret is fixed here for the life of the process.
pub async fn build_app(cfg: &ServerConfig, store_path: &Path) -> Result<Router> {
  let auth = Arc::new(AuthConfig {
    signer:    TokenSigner::new(cfg.token_secret.as_bytes(), Arc::new(DefaultClock)),
    token_ttl: cfg.token_ttl(),
  });
  let backend = cfg.backend.label();

  let router = match cfg.backend {
    Backend::Sqlite => {
      let store = SqliteStore::open(store_path, cfg.store_timeout())
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
      reel_api::api_router(AppState { store: Arc::new(store), auth, backend })
    }
    Backend::File => {
      let store = FileStore::open(store_path, cfg.store_timeout())
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
      reel_api::api_router(AppState { store: Arc::new(store), auth, backend })
    }
  };

  tracing::info!(backend, path = %store_path.display(), "opened movie store");
  Ok(router)
}
