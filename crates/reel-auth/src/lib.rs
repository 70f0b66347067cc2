//! Bearer-token issuance, verification, and per-request identity resolution.
//!
//! Tokens are HS256 JWTs signed with a single process-wide secret. Verification
//! is pure computation: no I/O, no lookups. A token that fails verification
//! simply yields no identity.

mod resolver;
mod signer;

pub mod error;

pub use error::{Error, Result};
pub use resolver::{last_token, resolve};
pub use signer::{Claims, Identity, IssuedToken, TokenSigner};

#[cfg(test)]
mod tests;
