use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Metadata stored alongside a short code.
///
/// Written once when the code is allocated and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortlinkDetail {
    /// The original URL that was shortened.
    pub url: String,
    /// When the short code was allocated.
    pub created_at: Timestamp,
    /// The TTL requested at allocation time. `0` means the records never expire.
    pub expiration_in_minutes: u64,
}

impl ShortlinkDetail {
    pub fn new(url: impl Into<String>, created_at: Timestamp, expiration_in_minutes: u64) -> Self {
        Self {
            url: url.into(),
            created_at,
            expiration_in_minutes,
        }
    }
}

/// The result of shortening a URL: the code plus its detail record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortlink {
    pub code: ShortCode,
    #[serde(flatten)]
    pub detail: ShortlinkDetail,
}
