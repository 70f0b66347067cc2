//! Error type for `reel-store-sqlite`.

use std::time::Duration;

use reel_core::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] reel_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("year out of range: {0}")]
  YearOutOfRange(i64),

  #[error("database call did not finish within {0:?}")]
  Timeout(Duration),
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::Database(_)
      | Self::Json(_)
      | Self::Uuid(_)
      | Self::YearOutOfRange(_)
      | Self::Timeout(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
