use crate::keys::Keyspace;
use shortlink_core::{Fingerprint, KvStore, ShortCode, StoreError, Ttl};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Maps URL fingerprints to the short code already allocated for them.
///
/// Entries are written with the same TTL as the URL record they point at, so
/// an entry never outlives its URL record. Callers still confirm the URL
/// record is live before trusting a hit, since the two writes are independent.
#[derive(Debug)]
pub struct DedupIndex<S> {
    store: Arc<S>,
    keys: Keyspace,
}

impl<S> Clone for DedupIndex<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            keys: self.keys.clone(),
        }
    }
}

impl<S: KvStore> DedupIndex<S> {
    pub fn new(store: Arc<S>, keys: Keyspace) -> Self {
        Self { store, keys }
    }

    /// Returns the code recorded for `fingerprint`.
    ///
    /// A missing entry, an empty value, or a value that is not a short code
    /// are all reported as `Ok(None)`.
    pub async fn lookup(&self, fingerprint: &Fingerprint) -> Result<Option<ShortCode>, StoreError> {
        let key = self.keys.url_hash(fingerprint);

        let Some(value) = self.store.get(&key).await? else {
            trace!(%fingerprint, "dedup miss");
            return Ok(None);
        };

        if value.is_empty() {
            debug!(%fingerprint, "empty dedup entry, treating as miss");
            return Ok(None);
        }

        match ShortCode::parse(value) {
            Ok(code) => {
                debug!(%fingerprint, code = %code, "dedup hit");
                Ok(Some(code))
            }
            Err(e) => {
                warn!(%fingerprint, error = %e, "invalid dedup entry, treating as miss");
                Ok(None)
            }
        }
    }

    /// Records `code` as the short code for `fingerprint`.
    pub async fn record(
        &self,
        fingerprint: &Fingerprint,
        code: &ShortCode,
        ttl: Ttl,
    ) -> Result<(), StoreError> {
        let key = self.keys.url_hash(fingerprint);
        self.store.set(&key, code.as_str(), ttl).await
    }
}
