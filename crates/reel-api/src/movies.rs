//! Handlers for `/movies` endpoints.
//!
//! Bodies are read as raw bytes and validated by
//! [`MovieFields::from_json`], so a missing or mistyped field surfaces as a
//! classified bad-input error rather than an extractor rejection.

use axum::{
  Json,
  body::Bytes,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use reel_core::{
  movie::{Movie, MovieFields},
  store::MovieStore,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Parse a path id. A malformed id cannot name a stored movie, so it is
/// reported as not found.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("movie {raw} not found")))
}

fn parse_fields(body: &[u8]) -> Result<MovieFields, ApiError> {
  let value: Value = serde_json::from_slice(body)
    .map_err(|e| ApiError::BadRequest(format!("malformed JSON body: {e}")))?;
  MovieFields::from_json(&value).map_err(ApiError::classified)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /movies`
pub async fn list<S: MovieStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Movie>>, ApiError> {
  let movies = state.store.list().await.map_err(ApiError::classified)?;
  Ok(Json(movies))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /movies/{id}`
pub async fn get_one<S: MovieStore>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
  let id = parse_id(&raw_id)?;
  let movie = state
    .store
    .get(id)
    .await
    .map_err(ApiError::classified)?
    .ok_or_else(|| ApiError::NotFound(format!("movie {id} not found")))?;
  Ok(Json(movie))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /movies` — returns 201 + the stored [`Movie`].
pub async fn create<S: MovieStore>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
  let fields = parse_fields(&body)?;
  let movie = state
    .store
    .create(fields)
    .await
    .map_err(ApiError::classified)?;
  Ok((StatusCode::CREATED, Json(movie)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /movies/{id}` — every field must be supplied.
pub async fn update<S: MovieStore>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
  body: Bytes,
) -> Result<StatusCode, ApiError> {
  let id = parse_id(&raw_id)?;
  let fields = parse_fields(&body)?;
  state
    .store
    .update(id, fields)
    .await
    .map_err(ApiError::classified)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /movies/{id}`
pub async fn delete_one<S: MovieStore>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let id = parse_id(&raw_id)?;
  state.store.delete(id).await.map_err(ApiError::classified)?;
  Ok(StatusCode::NO_CONTENT)
}
