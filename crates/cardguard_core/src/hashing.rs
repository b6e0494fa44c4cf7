//! One-way credential digest.
//!
//! # Invariants
//! - Output is lowercase hex SHA-256 over the UTF-8 bytes of the input.
//! - No salt is applied; equal inputs always produce equal digests.

use sha2::{Digest, Sha256};

/// Length of a digest returned by [`hash_text`].
pub const DIGEST_HEX_LEN: usize = 64;

/// Hashes `text` into a fixed-length hex digest.
pub fn hash_text(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
