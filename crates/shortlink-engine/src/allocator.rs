use crate::keys::Keyspace;
use shortlink_core::{KvStore, ShortCode, StoreError};
use std::sync::Arc;
use tracing::debug;

/// Allocates fresh short codes from the store's global counter.
///
/// Each call performs a single atomic `incr` and encodes the value it
/// returns, so no two calls ever observe the same counter value, even across
/// processes sharing the store. Codes are not guaranteed to be handed out in
/// wall-clock order under concurrency.
#[derive(Debug)]
pub struct CodeAllocator<S> {
    store: Arc<S>,
    counter_key: String,
}

impl<S> Clone for CodeAllocator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            counter_key: self.counter_key.clone(),
        }
    }
}

impl<S: KvStore> CodeAllocator<S> {
    pub fn new(store: Arc<S>, keys: &Keyspace) -> Self {
        Self {
            store,
            counter_key: keys.counter(),
        }
    }

    /// Increments the global counter and returns its base-62 encoding.
    pub async fn allocate(&self) -> Result<ShortCode, StoreError> {
        let value = self.store.incr(&self.counter_key).await?;

        let counter = u64::try_from(value)
            .ok()
            .filter(|counter| *counter > 0)
            .ok_or_else(|| {
                StoreError::InvalidData(format!(
                    "counter '{}' returned non-positive value {value}",
                    self.counter_key
                ))
            })?;

        let code = ShortCode::from_counter(counter);
        debug!(counter, code = %code, "allocated short code");
        Ok(code)
    }
}
