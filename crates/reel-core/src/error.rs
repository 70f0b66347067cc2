//! Error types for `reel-core`, and the failure classifier shared by every
//! backend.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid field `{field}`: {reason}")]
  InvalidField {
    field:  &'static str,
    reason: String,
  },

  #[error("a movie titled {0:?} already exists")]
  TitleConflict(String),

  #[error("movie not found: {0}")]
  MovieNotFound(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// The category a failure falls into, independent of which layer raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A required field is missing, has the wrong type, or is invalid.
  BadInput,
  /// The title uniqueness constraint would be violated.
  Conflict,
  /// No record exists for the requested id.
  NotFound,
  /// Storage unavailable, timed out, or returned an unexpected shape.
  Internal,
}

/// Implemented by every failure type a [`MovieStore`](crate::store::MovieStore)
/// can return. Implementations must be a plain match over variants.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::InvalidField { .. } => ErrorKind::BadInput,
      Self::TitleConflict(_) => ErrorKind::Conflict,
      Self::MovieNotFound(_) => ErrorKind::NotFound,
    }
  }
}

/// Map a failure onto its [`ErrorKind`].
pub fn classify<E: Classify + ?Sized>(failure: &E) -> ErrorKind { failure.kind() }
