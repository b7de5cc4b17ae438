//! Short content digests for extracted server functions

use sha2::{Digest, Sha256};

use crate::constants::CONTENT_HASH_LEN;

/// Derive a stable short identifier from arbitrary text.
///
/// Returns [`CONTENT_HASH_LEN`] lowercase hex characters. Equal inputs always
/// produce equal digests; collisions are left to the caller.
pub fn content_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(&digest[..CONTENT_HASH_LEN / 2])
}
