//! SQLite backend for the Reel movie store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Title uniqueness is delegated to a
//! `UNIQUE` constraint; every mutation is a single statement.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
