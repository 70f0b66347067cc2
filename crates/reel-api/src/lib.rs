//! JSON REST API for Reel.
//!
//! Exposes an axum [`Router`] backed by any [`reel_core::store::MovieStore`].
//! TLS, listening, and process setup are the caller's responsibility.
//!
//! | Method   | Path           | Notes |
//! |----------|----------------|-------|
//! | `GET`    | `/`            | Service metadata |
//! | `GET`    | `/movies`      | All movies |
//! | `POST`   | `/movies`      | 201 + stored movie |
//! | `GET`    | `/movies/{id}` | 404 if not found |
//! | `PUT`    | `/movies/{id}` | Full replacement, 204 |
//! | `DELETE` | `/movies/{id}` | 204 |
//! | `POST`   | `/auth/token`  | Body: `{"username":"..."}`; 201 + token |
//! | `DELETE` | `/auth/token`  | Clears the token cookie |
//! | `GET`    | `/user`        | Resolved identity or `null` |

pub mod auth;
pub mod error;
pub mod movies;
pub mod negotiate;

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::State,
  middleware,
  routing::{get, post},
};
use chrono::Duration;
use reel_auth::TokenSigner;
use reel_core::store::MovieStore;
use serde_json::{Value, json};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Token settings fixed at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
  pub signer:    TokenSigner,
  pub token_ttl: Duration,
}

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: MovieStore> {
  pub store:   Arc<S>,
  pub auth:    Arc<AuthConfig>,
  /// Short backend label reported by `GET /`.
  pub backend: &'static str,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn api_router<S>(state: AppState<S>) -> Router
where
  S: MovieStore + Clone + 'static,
{
  Router::new()
    .route("/", get(service_meta::<S>))
    .route("/movies", get(movies::list::<S>).post(movies::create::<S>))
    .route(
      "/movies/{id}",
      get(movies::get_one::<S>)
        .put(movies::update::<S>)
        .delete(movies::delete_one::<S>),
    )
    .route("/auth/token", post(auth::issue::<S>).delete(auth::clear))
    .route("/user", get(auth::current_user))
    .layer(middleware::from_fn(negotiate::require_json))
    .with_state(state)
}

/// `GET /`
async fn service_meta<S: MovieStore>(State(state): State<AppState<S>>) -> Json<Value> {
  Json(json!({
    "name":    env!("CARGO_PKG_NAME"),
    "version": env!("CARGO_PKG_VERSION"),
    "backend": state.backend,
  }))
}
