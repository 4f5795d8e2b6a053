use crate::error::ShortlinkError;
use crate::record::{Shortlink, ShortlinkDetail};
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortlinkError>;

/// The operations a transport layer calls on the shortlink engine.
#[async_trait]
pub trait Shortlinks: Send + Sync + 'static {
    /// Shortens `url` for `ttl_minutes` minutes (`0` = never expires).
    ///
    /// Shortening a URL whose records are still live returns the existing
    /// short link unchanged, including its original TTL.
    async fn shorten(&self, url: &str, ttl_minutes: i64) -> Result<Shortlink>;

    /// Resolves a short code to the original URL.
    /// Returns `Err(NotFound)` if the code does not exist or has expired.
    async fn unshorten(&self, code: &str) -> Result<String>;

    /// Returns the detail record of a short code.
    /// Returns `Err(NotFound)` if the code does not exist or has expired.
    async fn shortlink_info(&self, code: &str) -> Result<ShortlinkDetail>;
}
