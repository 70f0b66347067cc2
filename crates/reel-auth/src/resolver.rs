//! Identity resolution over an ordered list of token carriers.

use crate::signer::{Identity, TokenSigner};

/// The final whitespace-delimited token of a raw carrier value.
///
/// Strips an optional scheme label, so `"Bearer abc"` and `"abc"` both yield
/// `"abc"`. Returns `None` for an empty or all-whitespace value.
pub fn last_token(raw: &str) -> Option<&str> { raw.split_whitespace().next_back() }

/// Resolve the request identity from `carriers`, highest precedence first.
///
/// Each present carrier is reduced with [`last_token`] and verified in turn.
/// The first one that verifies wins; if none do, the request is anonymous.
pub fn resolve(signer: &TokenSigner, carriers: &[Option<&str>]) -> Option<Identity> {
  carriers
    .iter()
    .flatten()
    .filter_map(|raw| last_token(raw))
    .find_map(|token| signer.verify(token))
}
