//! Startup error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("config error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("`token_secret` must be set to a non-empty value")]
  MissingSecret,

  #[error("`token_ttl_secs` must be positive, got {0}")]
  InvalidTtl(i64),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
