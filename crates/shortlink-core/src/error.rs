use thiserror::Error;

/// Errors related to parsing and validating core domain values.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors surfaced by a [`KvStore`](crate::store::KvStore) implementation.
///
/// A missing key is never an error: stores report it as `Ok(None)` so the
/// engine can turn it into [`ShortlinkError::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("store value is invalid: {0}")]
    InvalidData(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// The closed error taxonomy of the shortlink engine.
///
/// Transport layers map these variants onto their own status codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortlinkError {
    /// Malformed URL or out-of-range TTL. Detected before any store access.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The requested short code has no live record.
    #[error("unknown short link: {0}")]
    NotFound(String),
    /// A store operation failed. The engine never retries.
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}
