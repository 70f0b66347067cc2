//! Error type for `reel-store-file`.

use std::time::Duration;

use reel_core::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] reel_core::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("write did not finish within {0:?}")]
  Timeout(Duration),

  #[error("store task failed: {0}")]
  Task(#[from] tokio::task::JoinError),

  #[error("store task ended without a result")]
  NoReply(#[from] tokio::sync::oneshot::error::RecvError),
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::Io(_)
      | Self::Json(_)
      | Self::Timeout(_)
      | Self::Task(_)
      | Self::NoReply(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
