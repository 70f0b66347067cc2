//! [`TokenSigner`] — issues and verifies signed tokens.

use std::{fmt, sync::Arc};

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Claims ──────────────────────────────────────────────────────────────────

/// Claims carried by every token this service issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// The subject the token was issued for.
  pub sub: String,
  /// Issued-at (Unix timestamp, seconds).
  pub iat: i64,
  /// Expiry (Unix timestamp, seconds).
  pub exp: i64,
}

/// The identity derived from a verified token. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub subject: String,
}

/// A freshly signed token and its lifetime in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
  pub token:      String,
  pub expires_in: i64,
}

// ─── Signer ──────────────────────────────────────────────────────────────────

/// Signs and verifies HS256 tokens with a fixed secret.
///
/// Expiry is checked against the injected [`Clock`] rather than the system
/// time, so issuance and verification are deterministic under test.
#[derive(Clone)]
pub struct TokenSigner {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  clock:      Arc<dyn Clock + Send + Sync>,
}

impl fmt::Debug for TokenSigner {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TokenSigner").finish_non_exhaustive()
  }
}

impl TokenSigner {
  pub fn new(secret: &[u8], clock: Arc<dyn Clock + Send + Sync>) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is compared against `clock` in `verify`; jsonwebtoken would
    // otherwise read the system time.
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation,
      clock,
    }
  }

  /// Sign a token for `subject` that expires `ttl` from now.
  pub fn issue(&self, subject: &str, ttl: Duration) -> Result<IssuedToken> {
    if subject.is_empty() {
      return Err(Error::EmptySubject);
    }
    let expires_in = ttl.num_seconds();
    if expires_in <= 0 {
      return Err(Error::InvalidTtl(expires_in));
    }

    let now = self.clock.utc().timestamp();
    let claims = Claims {
      sub: subject.to_owned(),
      iat: now,
      exp: now + expires_in,
    };
    let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

    Ok(IssuedToken { token, expires_in })
  }

  /// Verify `token` and return the identity it carries.
  ///
  /// Returns `None` for malformed tokens, bad signatures, foreign algorithms
  /// and expired tokens alike.
  pub fn verify(&self, token: &str) -> Option<Identity> {
    let data = match jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation) {
      Ok(data) => data,
      Err(e) => {
        tracing::debug!(error = %e, "rejected token");
        return None;
      }
    };

    let now = self.clock.utc().timestamp();
    if now >= data.claims.exp {
      tracing::debug!(exp = data.claims.exp, now, "rejected expired token");
      return None;
    }

    Some(Identity { subject: data.claims.sub })
  }
}
