//! Token endpoints and the request identity extractor.
//!
//! A token is looked for in the `authorization` cookie first, then in the
//! `Authorization` header. Either may carry a scheme label such as `Bearer`.
//! A missing or invalid token never rejects a request; it only means there
//! is no identity.

use std::convert::Infallible;

use axum::{
  Json,
  body::Bytes,
  extract::{FromRequestParts, State},
  http::{StatusCode, header, request::Parts},
  response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use reel_auth::{Identity, resolve};
use reel_core::store::MovieStore;
use serde_json::Value;

use crate::{AppState, error::ApiError};

/// Name of the cookie that carries the token.
pub const AUTH_COOKIE: &str = "authorization";

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The identity resolved for the current request, if any.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Option<Identity>);

impl<S> FromRequestParts<AppState<S>> for CurrentIdentity
where
  S: MovieStore,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let jar = CookieJar::from_headers(&parts.headers);
    let cookie = jar.get(AUTH_COOKIE).map(Cookie::value);
    let header = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok());

    Ok(Self(resolve(&state.auth.signer, &[cookie, header])))
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `POST /auth/token` — body: `{"username":"alice"}`.
///
/// The username is trusted as given and becomes the token subject.
pub async fn issue<S: MovieStore>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
  let value: Value = serde_json::from_slice(&body)
    .map_err(|e| ApiError::BadRequest(format!("malformed JSON body: {e}")))?;
  let username = value
    .get("username")
    .and_then(Value::as_str)
    .map(str::trim)
    .filter(|u| !u.is_empty())
    .ok_or_else(|| ApiError::BadRequest("`username` must be a non-empty string".into()))?;

  let issued = state
    .auth
    .signer
    .issue(username, state.auth.token_ttl)
    .map_err(|e| ApiError::Internal(Box::new(e)))?;
  tracing::info!(subject = %username, expires_in = issued.expires_in, "issued token");

  let cookie = Cookie::build((AUTH_COOKIE, issued.token.clone()))
    .http_only(true)
    .path("/")
    .same_site(SameSite::Lax);
  let bearer = format!("Bearer {}", issued.token);

  Ok((
    StatusCode::CREATED,
    jar.add(cookie),
    [(header::AUTHORIZATION, bearer)],
    Json(issued),
  ))
}

/// `DELETE /auth/token` — expires the token cookie, whether or not the
/// request carried one.
pub async fn clear(jar: CookieJar) -> impl IntoResponse {
  (StatusCode::NO_CONTENT, jar.add(clear_cookie()))
}

fn clear_cookie() -> Cookie<'static> {
  Cookie::build((AUTH_COOKIE, ""))
    .path("/")
    .max_age(time::Duration::ZERO)
    .http_only(true)
    .same_site(SameSite::Lax)
    .build()
}

/// `GET /user` — the resolved identity, or `null`.
pub async fn current_user(CurrentIdentity(identity): CurrentIdentity) -> Json<Option<Identity>> {
  Json(identity)
}
