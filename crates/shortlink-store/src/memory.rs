use crate::clock::{Clock, SystemClock};
use async_trait::async_trait;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use shortlink_core::store::{KvStore, Result};
use shortlink_core::{StoreError, Ttl};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Number of `set` calls between two sweeps of expired entries.
pub const SWEEP_INTERVAL: u64 = 1024;

/// In-memory storage entry.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expire_at: Option<Timestamp>,
}

impl Entry {
    fn is_expired(&self, now: Timestamp) -> bool {
        self.expire_at.is_some_and(|expire_at| now >= expire_at)
    }
}

/// In-memory implementation of [`KvStore`] using DashMap.
///
/// `incr` holds the shard lock of its key for the whole read-modify-write,
/// which makes it atomic across tasks sharing the store. Expired entries are
/// dropped when they are next touched, and every [`SWEEP_INTERVAL`] writes
/// a sweep removes the ones nobody reads again.
#[derive(Debug)]
pub struct InMemoryStore<C = SystemClock> {
    storage: DashMap<String, Entry>,
    clock: C,
    writes: AtomicU64,
}

impl InMemoryStore<SystemClock> {
    /// Creates a new in-memory store backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryStore<C> {
    /// Creates a new in-memory store that evaluates TTLs against `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            storage: DashMap::new(),
            clock,
            writes: AtomicU64::new(0),
        }
    }

    /// Number of entries currently held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.storage.retain(|_, entry| {
            let live = !entry.is_expired(now);
            if !live {
                removed += 1;
            }
            live
        });

        if removed > 0 {
            debug!(removed, remaining = self.storage.len(), "purged expired entries");
        }
        removed
    }

    fn expire_at(&self, key: &str, ttl: Ttl) -> Result<Option<Timestamp>> {
        let Some(duration) = ttl.as_duration() else {
            return Ok(None);
        };

        SignedDuration::try_from(duration)
            .ok()
            .and_then(|duration| self.clock.now().checked_add(duration).ok())
            .map(Some)
            .ok_or_else(|| StoreError::InvalidData(format!("ttl for '{key}' is out of range")))
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let entry = self.storage.get(key)?;

        if entry.is_expired(self.clock.now()) {
            drop(entry);
            self.storage
                .remove_if(key, |_, entry| entry.is_expired(self.clock.now()));
            trace!(key, "evicted expired entry");
            return None;
        }

        Some(entry.value.clone())
    }
}

#[async_trait]
impl<C: Clock> KvStore for InMemoryStore<C> {
    async fn incr(&self, key: &str) -> Result<i64> {
        let now = self.clock.now();
        let mut entry = self.storage.entry(key.to_owned()).or_insert_with(|| Entry {
            value: "0".to_string(),
            expire_at: None,
        });

        // an expired counter starts over, like a missing key
        if entry.is_expired(now) {
            entry.value = "0".to_string();
            entry.expire_at = None;
        }

        let next = entry
            .value
            .parse::<i64>()
            .ok()
            .and_then(|current| current.checked_add(1))
            .ok_or_else(|| {
                StoreError::InvalidData(format!(
                    "value at '{key}' is not an integer or out of range"
                ))
            })?;

        entry.value = next.to_string();
        Ok(next)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.live_value(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Ttl) -> Result<()> {
        let expire_at = self.expire_at(key, ttl)?;
        self.storage.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expire_at,
            },
        );

        if self.writes.fetch_add(1, Ordering::Relaxed) % SWEEP_INTERVAL == SWEEP_INTERVAL - 1 {
            self.purge_expired();
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.live_value(key).is_some())
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::Arc;
    use std::time::Duration;

    fn minutes(m: u64) -> Ttl {
        Ttl::After(Duration::from_secs(m * 60))
    }

    #[tokio::test]
    async fn set_and_get() {
        let store = InMemoryStore::new();

        store.set("k", "v", Ttl::Never).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(store.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let store = InMemoryStore::new();

        assert!(store.get("nope").await.unwrap().is_none());
        assert!(!store.exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn set_replaces_value_and_ttl() {
        let clock = ManualClock::default();
        let store = InMemoryStore::with_clock(clock.clone());

        store.set("k", "old", minutes(1)).await.unwrap();
        store.set("k", "new", Ttl::Never).await.unwrap();
        clock.advance(SignedDuration::from_hours(1));

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn expired_entry_is_gone() {
        let clock = ManualClock::default();
        let store = InMemoryStore::with_clock(clock.clone());

        store.set("k", "v", minutes(1)).await.unwrap();
        clock.advance(SignedDuration::from_secs(59));
        assert!(store.exists("k").await.unwrap());

        clock.advance(SignedDuration::from_secs(1));
        assert!(store.get("k").await.unwrap().is_none());
        assert!(!store.exists("k").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn unread_expired_entries_are_swept_by_writes() {
        let clock = ManualClock::default();
        let store = InMemoryStore::with_clock(clock.clone());

        for i in 0..10 {
            store.set(&format!("short:{i}"), "v", minutes(1)).await.unwrap();
        }
        store.set("kept", "v", Ttl::Never).await.unwrap();
        clock.advance(SignedDuration::from_mins(2));
        assert_eq!(store.len(), 11);

        // rewrite a single key until the write count reaches the next sweep
        for _ in 11..SWEEP_INTERVAL {
            store.set("busy", "v", Ttl::Never).await.unwrap();
        }

        assert_eq!(store.len(), 2);
        assert!(store.exists("kept").await.unwrap());
    }

    #[tokio::test]
    async fn purge_expired_reports_removed_entries() {
        let clock = ManualClock::default();
        let store = InMemoryStore::with_clock(clock.clone());

        store.set("a", "v", minutes(1)).await.unwrap();
        store.set("b", "v", minutes(5)).await.unwrap();
        clock.advance(SignedDuration::from_mins(1));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.purge_expired(), 0);
    }

    #[tokio::test]
    async fn now_follows_injected_clock() {
        let clock = ManualClock::default();
        let store = InMemoryStore::with_clock(clock.clone());

        clock.advance(SignedDuration::from_hours(2));
        assert_eq!(KvStore::now(&store), clock.now());
    }

    #[tokio::test]
    async fn never_ttl_survives() {
        let clock = ManualClock::default();
        let store = InMemoryStore::with_clock(clock.clone());

        store.set("k", "v", Ttl::Never).await.unwrap();
        clock.advance(SignedDuration::from_hours(24 * 365));

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn incr_starts_at_one() {
        let store = InMemoryStore::new();

        assert_eq!(store.incr("counter").await.unwrap(), 1);
        assert_eq!(store.incr("counter").await.unwrap(), 2);
        assert_eq!(store.get("counter").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn incr_rejects_non_integer() {
        let store = InMemoryStore::new();
        store.set("counter", "abc", Ttl::Never).await.unwrap();

        let err = store.incr("counter").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[tokio::test]
    async fn incr_restarts_expired_counter() {
        let clock = ManualClock::default();
        let store = InMemoryStore::with_clock(clock.clone());

        store.set("counter", "41", minutes(1)).await.unwrap();
        clock.advance(SignedDuration::from_mins(2));

        assert_eq!(store.incr("counter").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_incr_is_atomic() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = vec![];

        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let mut seen = Vec::with_capacity(50);
                for _ in 0..50 {
                    seen.push(store.incr("counter").await.unwrap());
                }
                seen
            }));
        }

        let mut all = vec![];
        for handle in handles {
            all.extend(handle.await.unwrap());
        }
        all.sort_unstable();
        all.dedup();

        assert_eq!(all.len(), 16 * 50);
        assert_eq!(store.incr("counter").await.unwrap(), 16 * 50 + 1);
    }
}
