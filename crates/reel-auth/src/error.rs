//! Error type for `reel-auth`.
//!
//! Only issuance can fail with an error. Verification failures are reported as
//! the absence of an identity.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("token lifetime must be positive, got {0} seconds")]
  InvalidTtl(i64),

  #[error("token subject must not be empty")]
  EmptySubject,

  #[error("failed to sign token: {0}")]
  Sign(#[from] jsonwebtoken::errors::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
