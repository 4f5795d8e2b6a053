use crate::error::StoreError;
use async_trait::async_trait;
use jiff::Timestamp;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Lifetime of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The value never expires.
    Never,
    /// The value expires once the duration has elapsed after the write.
    After(Duration),
}

impl Ttl {
    /// Longest TTL a record may carry: 100 years.
    ///
    /// Every backend can turn this into an absolute expiry, Redis `PX`
    /// milliseconds and a jiff timestamp alike.
    pub const MAX_MINUTES: u64 = 100 * 365 * 24 * 60;

    /// Converts a TTL in minutes. Zero minutes means the value never expires.
    ///
    /// Returns `None` above [`Ttl::MAX_MINUTES`].
    pub fn from_minutes(minutes: u64) -> Option<Self> {
        match minutes {
            0 => Some(Ttl::Never),
            m if m > Self::MAX_MINUTES => None,
            m => m
                .checked_mul(60)
                .map(|secs| Ttl::After(Duration::from_secs(secs))),
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Ttl::Never => None,
            Ttl::After(duration) => Some(*duration),
        }
    }
}

/// The key-value capability the shortlink engine is built on.
///
/// Implementations must make [`incr`](KvStore::incr) atomic across every
/// client sharing the store; all other operations are independent per key.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Atomically increments the integer at `key` (missing keys start at 0)
    /// and returns the new value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Returns the value at `key`, or `Ok(None)` if it is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` at `key`, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: &str, ttl: Ttl) -> Result<()>;

    /// Checks whether `key` holds a live value.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// The current time on the clock this store expires values against.
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
