use crate::allocator::CodeAllocator;
use crate::dedup::DedupIndex;
use crate::keys::Keyspace;
use crate::settings::EngineSettings;
use async_trait::async_trait;
use shortlink_core::{
    Fingerprint, KvStore, ShortCode, Shortlink, ShortlinkDetail, ShortlinkError, Shortlinks,
    StoreError, Ttl,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The shortlink engine.
///
/// Orchestrates dedup lookup, code allocation and the three record writes on
/// top of a [`KvStore`]:
/// - `shortlink:{code}:url` holds the original URL
/// - `urlhash:{fingerprint}:url` holds the code allocated for a URL
/// - `shortlink:{code}:detail` holds the JSON [`ShortlinkDetail`]
///
/// All three share the TTL requested by the first `shorten` call.
///
/// Note: the engine keeps no state of its own and takes no locks. Two
/// concurrent `shorten` calls for the same new URL may both allocate, leaving
/// two live codes for that URL until they expire. The three writes are not
/// transactional either; a failure part-way leaves the earlier records in
/// place until their TTL runs out.
#[derive(Debug)]
pub struct ShortlinkEngine<S> {
    store: Arc<S>,
    keys: Keyspace,
    allocator: CodeAllocator<S>,
    dedup: DedupIndex<S>,
    max_ttl_minutes: Option<u64>,
}

impl<S> Clone for ShortlinkEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            keys: self.keys.clone(),
            allocator: self.allocator.clone(),
            dedup: self.dedup.clone(),
            max_ttl_minutes: self.max_ttl_minutes,
        }
    }
}

impl<S: KvStore> ShortlinkEngine<S> {
    /// Creates a new engine that owns `store`.
    pub fn new(store: S, settings: EngineSettings) -> Self {
        Self::with_shared_store(Arc::new(store), settings)
    }

    /// Creates a new engine over a store that is shared with other owners.
    pub fn with_shared_store(store: Arc<S>, settings: EngineSettings) -> Self {
        let keys = Keyspace::new(settings.namespace.as_deref());
        Self {
            allocator: CodeAllocator::new(Arc::clone(&store), &keys),
            dedup: DedupIndex::new(Arc::clone(&store), keys.clone()),
            store,
            keys,
            max_ttl_minutes: settings.max_ttl_minutes,
        }
    }

    /// Validates that the URL is an absolute http(s) URL.
    fn validate_url(url: &str) -> Result<(), ShortlinkError> {
        if url.is_empty() {
            return Err(ShortlinkError::InvalidInput(
                "URL cannot be empty".to_string(),
            ));
        }

        let parsed = url::Url::parse(url)
            .map_err(|e| ShortlinkError::InvalidInput(format!("malformed URL '{}': {}", url, e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ShortlinkError::InvalidInput(format!(
                "URL scheme must be http or https: {}",
                scheme
            ))),
        }
    }

    /// Validates the requested expiration and converts it to the record TTL.
    fn validate_ttl(&self, ttl_minutes: i64) -> Result<(u64, Ttl), ShortlinkError> {
        let minutes = u64::try_from(ttl_minutes).map_err(|_| {
            ShortlinkError::InvalidInput(format!(
                "expiration must not be negative, got {} minutes",
                ttl_minutes
            ))
        })?;

        if let Some(max) = self.max_ttl_minutes {
            if minutes == 0 || minutes > max {
                return Err(ShortlinkError::InvalidInput(format!(
                    "expiration must be between 1 and {} minutes, got {}",
                    max, minutes
                )));
            }
        }

        let ttl = Ttl::from_minutes(minutes).ok_or_else(|| {
            ShortlinkError::InvalidInput(format!(
                "expiration must be at most {} minutes, got {}",
                Ttl::MAX_MINUTES,
                minutes
            ))
        })?;

        Ok((minutes, ttl))
    }

    /// Returns the live short link recorded for `fingerprint`, if any.
    ///
    /// A dedup hit is only trusted when both the URL record and the detail
    /// record of the code are still readable.
    async fn existing(&self, fingerprint: &Fingerprint) -> Result<Option<Shortlink>, StoreError> {
        let Some(code) = self.dedup.lookup(fingerprint).await? else {
            return Ok(None);
        };

        if !self.store.exists(&self.keys.url(&code)).await? {
            debug!(code = %code, "dedup entry points at a missing url record");
            return Ok(None);
        }

        let Some(raw) = self.store.get(&self.keys.detail(&code)).await? else {
            debug!(code = %code, "dedup entry points at a missing detail record");
            return Ok(None);
        };

        match decode_detail(&code, &raw) {
            Ok(detail) => Ok(Some(Shortlink { code, detail })),
            Err(e) => {
                warn!(code = %code, error = %e, "undecodable detail record, allocating a new code");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<S: KvStore> Shortlinks for ShortlinkEngine<S> {
    async fn shorten(&self, url: &str, ttl_minutes: i64) -> Result<Shortlink, ShortlinkError> {
        Self::validate_url(url)?;
        let (ttl_minutes, ttl) = self.validate_ttl(ttl_minutes)?;

        let fingerprint = Fingerprint::of(url);
        if let Some(existing) = self.existing(&fingerprint).await? {
            debug!(code = %existing.code, "returning existing short link");
            return Ok(existing);
        }

        let code = self.allocator.allocate().await?;
        let detail = ShortlinkDetail::new(url, self.store.now(), ttl_minutes);
        let encoded = serde_json::to_string(&detail)
            .map_err(|e| StoreError::InvalidData(format!("failed to encode detail record: {e}")))?;

        // Independent writes, no rollback on failure.
        self.store.set(&self.keys.url(&code), url, ttl).await?;
        self.dedup.record(&fingerprint, &code, ttl).await?;
        self.store
            .set(&self.keys.detail(&code), &encoded, ttl)
            .await?;

        info!(code = %code, ttl_minutes, "shortened url");
        Ok(Shortlink { code, detail })
    }

    async fn unshorten(&self, code: &str) -> Result<String, ShortlinkError> {
        let code = parse_code(code)?;

        self.store
            .get(&self.keys.url(&code))
            .await?
            .ok_or_else(|| ShortlinkError::NotFound(code.to_string()))
    }

    async fn shortlink_info(&self, code: &str) -> Result<ShortlinkDetail, ShortlinkError> {
        let code = parse_code(code)?;

        let raw = self
            .store
            .get(&self.keys.detail(&code))
            .await?
            .ok_or_else(|| ShortlinkError::NotFound(code.to_string()))?;

        Ok(decode_detail(&code, &raw)?)
    }
}

/// Parses a caller-supplied code. A string that can never be a short code
/// cannot have a record, so it is reported as not found.
fn parse_code(code: &str) -> Result<ShortCode, ShortlinkError> {
    ShortCode::parse(code).map_err(|e| {
        debug!(code, error = %e, "rejecting malformed short code");
        ShortlinkError::NotFound(code.to_string())
    })
}

fn decode_detail(code: &ShortCode, raw: &str) -> Result<ShortlinkDetail, StoreError> {
    serde_json::from_str(raw).map_err(|e| {
        StoreError::InvalidData(format!("invalid detail record for '{}': {}", code, e))
    })
}
