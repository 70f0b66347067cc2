//! Core types and trait definitions for the Reel movie service.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement [`store::MovieStore`]; the HTTP layer depends only on the trait.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod movie;
pub mod store;

pub use error::{Classify, Error, ErrorKind, Result, classify};
