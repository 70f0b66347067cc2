//! Tests for token issuance, verification, and identity resolution.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, TimeZone as _, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use mockable::Clock;

use crate::{Claims, Error, TokenSigner, last_token, resolve};

const SECRET: &[u8] = b"test-secret";

/// A clock that only moves when told to.
struct FixtureClock(Mutex<DateTime<Utc>>);

impl FixtureClock {
  fn new() -> Arc<Self> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    Arc::new(Self(Mutex::new(start)))
  }

  fn advance(&self, by: Duration) { *self.0.lock().unwrap() += by; }
}

impl Clock for FixtureClock {
  fn local(&self) -> DateTime<Local> { self.utc().with_timezone(&Local) }

  fn utc(&self) -> DateTime<Utc> { *self.0.lock().unwrap() }
}

fn signer_with(clock: Arc<FixtureClock>) -> TokenSigner { TokenSigner::new(SECRET, clock) }

// ─── Issue / verify ──────────────────────────────────────────────────────────

#[test]
fn issued_token_verifies_to_its_subject() {
  let signer = signer_with(FixtureClock::new());
  let issued = signer.issue("alice", Duration::hours(1)).unwrap();

  assert_eq!(issued.expires_in, 3600);
  let identity = signer.verify(&issued.token).unwrap();
  assert_eq!(identity.subject, "alice");
}

#[test]
fn token_is_invalid_once_clock_passes_expiry() {
  let clock = FixtureClock::new();
  let signer = signer_with(clock.clone());
  let issued = signer.issue("alice", Duration::seconds(60)).unwrap();

  clock.advance(Duration::seconds(59));
  assert!(signer.verify(&issued.token).is_some());

  clock.advance(Duration::seconds(1));
  assert!(signer.verify(&issued.token).is_none());
}

#[test]
fn issuance_is_deterministic_for_a_fixed_clock() {
  let signer = signer_with(FixtureClock::new());
  let a = signer.issue("alice", Duration::minutes(5)).unwrap();
  let b = signer.issue("alice", Duration::minutes(5)).unwrap();
  assert_eq!(a, b);
}

#[test]
fn non_positive_ttl_is_rejected() {
  let signer = signer_with(FixtureClock::new());
  assert!(matches!(signer.issue("alice", Duration::zero()), Err(Error::InvalidTtl(0))));
  assert!(matches!(
    signer.issue("alice", Duration::seconds(-5)),
    Err(Error::InvalidTtl(-5))
  ));
}

#[test]
fn empty_subject_is_rejected() {
  let signer = signer_with(FixtureClock::new());
  assert!(matches!(signer.issue("", Duration::hours(1)), Err(Error::EmptySubject)));
}

#[test]
fn token_signed_with_other_secret_is_invalid() {
  let clock = FixtureClock::new();
  let other = TokenSigner::new(b"another-secret", clock.clone());
  let issued = other.issue("mallory", Duration::hours(1)).unwrap();

  assert!(signer_with(clock).verify(&issued.token).is_none());
}

#[test]
fn malformed_tokens_are_invalid() {
  let signer = signer_with(FixtureClock::new());
  for token in ["", "garbage", "a.b.c", "Bearer"] {
    assert!(signer.verify(token).is_none(), "{token:?} should not verify");
  }
}

#[test]
fn tampered_token_is_invalid() {
  let signer = signer_with(FixtureClock::new());
  let issued = signer.issue("alice", Duration::hours(1)).unwrap();

  let (head, signature) = issued.token.rsplit_once('.').unwrap();
  let first = signature.chars().next().unwrap();
  let flipped = if first == 'A' { 'B' } else { 'A' };
  let tampered = format!("{head}.{flipped}{}", &signature[1..]);

  assert!(signer.verify(&tampered).is_none());
}

#[test]
fn token_with_foreign_algorithm_is_invalid() {
  let clock = FixtureClock::new();
  let now = clock.utc().timestamp();
  let claims = Claims { sub: "alice".into(), iat: now, exp: now + 600 };
  let token = jsonwebtoken::encode(
    &Header::new(Algorithm::HS512),
    &claims,
    &EncodingKey::from_secret(SECRET),
  )
  .unwrap();

  assert!(signer_with(clock).verify(&token).is_none());
}

// ─── Carriers ────────────────────────────────────────────────────────────────

#[test]
fn last_token_strips_scheme_label() {
  assert_eq!(last_token("Bearer abc"), Some("abc"));
  assert_eq!(last_token("abc"), Some("abc"));
  assert_eq!(last_token("  Bearer   abc  "), Some("abc"));
  assert_eq!(last_token(""), None);
  assert_eq!(last_token("   "), None);
}

#[test]
fn first_valid_carrier_wins() {
  let signer = signer_with(FixtureClock::new());
  let cookie = signer.issue("alice", Duration::hours(1)).unwrap().token;
  let header = format!("Bearer {}", signer.issue("bob", Duration::hours(1)).unwrap().token);

  let identity = resolve(&signer, &[Some(&cookie), Some(&header)]).unwrap();
  assert_eq!(identity.subject, "alice");
}

#[test]
fn invalid_first_carrier_falls_through() {
  let signer = signer_with(FixtureClock::new());
  let header = format!("Bearer {}", signer.issue("bob", Duration::hours(1)).unwrap().token);

  let identity = resolve(&signer, &[Some("not-a-token"), Some(&header)]).unwrap();
  assert_eq!(identity.subject, "bob");

  let identity = resolve(&signer, &[None, Some(&header)]).unwrap();
  assert_eq!(identity.subject, "bob");
}

#[test]
fn no_valid_carrier_resolves_to_none() {
  let signer = signer_with(FixtureClock::new());
  assert!(resolve(&signer, &[]).is_none());
  assert!(resolve(&signer, &[None, None]).is_none());
  assert!(resolve(&signer, &[Some(""), Some("Bearer junk")]).is_none());
}
