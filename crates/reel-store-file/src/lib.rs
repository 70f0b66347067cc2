//! File-mirrored in-memory backend for the Reel movie store.
//!
//! The whole collection lives in memory and is rewritten to a single JSON
//! file on every mutation. One writer lock serialises mutations; readers
//! work from an immutable snapshot and never wait on a write.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::FileStore;
