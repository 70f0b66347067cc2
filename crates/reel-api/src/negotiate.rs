//! Content negotiation middleware.
//!
//! Every response is JSON, so a request whose `Accept` header rules JSON out
//! gets `406`. Requests that carry a body (`POST`, `PUT`) must declare
//! `Content-Type: application/json`, otherwise `415`.

use axum::{
  extract::Request,
  http::{HeaderMap, Method, header},
  middleware::Next,
  response::{IntoResponse, Response},
};

use crate::error::ApiError;

pub async fn require_json(req: Request, next: Next) -> Response {
  if !accepts_json(req.headers()) {
    return ApiError::NotAcceptable.into_response();
  }
  if matches!(*req.method(), Method::POST | Method::PUT) && !declares_json(req.headers()) {
    return ApiError::UnsupportedMediaType.into_response();
  }
  next.run(req).await
}

/// `true` unless an `Accept` header is present and excludes JSON.
pub fn accepts_json(headers: &HeaderMap) -> bool {
  let mut values = headers.get_all(header::ACCEPT).iter().peekable();
  if values.peek().is_none() {
    return true;
  }

  values
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(','))
    .any(|range| {
      let mut parts = range.split(';').map(str::trim);
      let media = parts.next().unwrap_or_default();
      let refused = parts.any(|p| matches!(p, "q=0" | "q=0.0" | "q=0.00" | "q=0.000"));
      !refused
        && ["application/json", "application/*", "*/*"]
          .iter()
          .any(|m| media.eq_ignore_ascii_case(m))
    })
}

/// `true` if `Content-Type` is `application/json`, with or without parameters.
pub fn declares_json(headers: &HeaderMap) -> bool {
  headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.split(';').next())
    .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}
