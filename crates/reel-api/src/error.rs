//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use reel_core::{Classify, ErrorKind, classify};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("response must be acceptable as application/json")]
  NotAcceptable,

  #[error("request body must be application/json")]
  UnsupportedMediaType,

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Route a store or validation failure by its [`ErrorKind`].
  pub fn classified<E>(e: E) -> Self
  where
    E: std::error::Error + Classify + Send + Sync + 'static,
  {
    match classify(&e) {
      ErrorKind::BadInput => Self::BadRequest(e.to_string()),
      ErrorKind::Conflict => Self::Conflict(e.to_string()),
      ErrorKind::NotFound => Self::NotFound(e.to_string()),
      ErrorKind::Internal => Self::Internal(Box::new(e)),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Conflict(_) => StatusCode::CONFLICT,
      Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
      Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
      Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      Self::NotFound(m) | Self::BadRequest(m) | Self::Conflict(m) => m.clone(),
      Self::NotAcceptable | Self::UnsupportedMediaType => self.to_string(),
      Self::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        "internal server error".to_owned()
      }
    };
    (status, Json(json!({ "code": status.as_u16(), "message": message }))).into_response()
  }
}
