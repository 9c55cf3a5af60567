//! Password digest sent in the `password` form field.
//!
//! The server stores and compares an unsalted MD5 hex digest. This is not a
//! password-hashing scheme; it is kept only because the server's contract
//! expects exactly this value. Switching to a real KDF needs a coordinated
//! server change.

use md5::{Digest, Md5};

/// Lowercase hex MD5 of `plaintext`.
pub fn legacy_digest(plaintext: &str) -> String {
    hex::encode(Md5::digest(plaintext.as_bytes()))
}
