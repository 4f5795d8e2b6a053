use sha2::{Digest, Sha256};
use std::fmt::Display;

/// A fixed-size content digest of a URL, used as the dedup key.
///
/// Rendered as 64 lowercase hex characters of the SHA-256 digest so the key
/// is printable in the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the fingerprint of `url`. The URL is hashed byte-for-byte,
    /// without normalization.
    pub fn of(url: &str) -> Self {
        let digest = Sha256::digest(url.as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
