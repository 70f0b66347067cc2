//! The `MovieStore` trait.
//!
//! The trait is implemented by storage backends (`reel-store-sqlite`,
//! `reel-store-file`). The HTTP layer depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  error::Classify,
  movie::{Movie, MovieFields},
};

/// Abstraction over a movie store backend.
///
/// Every mutating method must make its change durable before the returned
/// future resolves with `Ok`. A failed mutation leaves the collection exactly
/// as it was. The title uniqueness check is atomic with respect to all other
/// mutations on the same store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait MovieStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  /// All current records, in insertion order.
  fn list(&self) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + '_;

  /// Retrieve a movie by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Movie>, Self::Error>> + Send + '_;

  /// Assign a new id and persist a movie.
  ///
  /// Fails with a conflict if another movie already has `fields.title`.
  fn create(
    &self,
    fields: MovieFields,
  ) -> impl Future<Output = Result<Movie, Self::Error>> + Send + '_;

  /// Replace every mutable field of an existing movie.
  ///
  /// Fails with not-found if `id` is absent, and with a conflict if a
  /// *different* movie already has `fields.title`.
  fn update(
    &self,
    id: Uuid,
    fields: MovieFields,
  ) -> impl Future<Output = Result<Movie, Self::Error>> + Send + '_;

  /// Remove a movie. Fails with not-found if `id` is absent.
  fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
