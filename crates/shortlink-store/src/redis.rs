use async_trait::async_trait;
use redis::AsyncCommands;
use shortlink_core::store::{KvStore, Result};
use shortlink_core::{StoreError, Ttl};
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_REDIS_ADDR: &str = "127.0.0.1:6379";

/// Connection settings for [`RedisStore::connect`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisSettings {
    /// `host:port` of the Redis server.
    #[builder(default = DEFAULT_REDIS_ADDR.to_string(), setter(into))]
    pub addr: String,
    #[builder(default, setter(strip_option, into))]
    pub password: Option<String>,
    /// Logical database number.
    #[builder(default)]
    pub db: i64,
}

impl RedisSettings {
    /// Renders the settings as a `redis://` connection URL.
    ///
    /// The password is percent-encoded, so it may contain any character.
    pub fn connection_url(&self) -> Result<String> {
        let mut url = url::Url::parse(&format!("redis://{}/{}", self.addr, self.db))
            .map_err(|e| StoreError::Unavailable(format!("invalid redis address '{}': {e}", self.addr)))?;

        if let Some(password) = &self.password {
            url.set_password(Some(password))
                .map_err(|()| StoreError::Unavailable("redis address cannot carry a password".to_string()))?;
        }

        Ok(url.into())
    }
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("timed out") {
        StoreError::Timeout(message)
    } else if lowered.contains("connection refused")
        || lowered.contains("broken pipe")
        || lowered.contains("connection reset")
    {
        StoreError::Unavailable(message)
    } else {
        StoreError::Operation(message)
    }
}

/// A Redis-backed implementation of [`KvStore`].
///
/// `incr` maps to `INCR`, which Redis executes atomically for every client,
/// so any number of engine processes can share one counter.
#[derive(Debug, Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisStore {
    /// Creates a store over an existing multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Connects to Redis and verifies the server answers `PING`.
    pub async fn connect(settings: &RedisSettings) -> Result<Self> {
        let url = settings.connection_url()?;
        let client = redis::Client::open(url.as_str())
            .map_err(|e| map_redis_error("invalid redis connection settings", e))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to connect to redis: {e}")))?;

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| StoreError::Unavailable(format!("redis did not answer PING: {e}")))?;

        info!(addr = %settings.addr, db = settings.db, "connected to redis");
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        trace!(key, "INCR");

        let mut conn = self.conn.clone();
        conn.incr::<_, _, i64>(key, 1).await.map_err(|e| {
            warn!(key, error = %e, "Redis error on incr");
            map_redis_error("failed to increment counter in Redis", e)
        })
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        trace!(key, "GET");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => {
                debug!(key, hit = value.is_some(), "fetched value from Redis");
                Ok(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Ttl) -> Result<()> {
        trace!(key, ?ttl, "SET");

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(duration) = ttl.as_duration() {
            let millis = u64::try_from(duration.as_millis()).map_err(|_| {
                StoreError::InvalidData(format!("ttl for '{key}' is out of range"))
            })?;
            cmd.arg("PX").arg(millis);
        }

        let mut conn = self.conn.clone();
        match cmd.query_async::<()>(&mut conn).await {
            Ok(()) => {
                debug!(key, "stored value in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to store value in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        conn.exists::<_, bool>(key).await.map_err(|e| {
            warn!(key, error = %e, "Redis error on exists");
            map_redis_error("failed to check key in Redis", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_url() {
        let settings = RedisSettings::builder().build();
        assert_eq!(settings.connection_url().unwrap(), "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn settings_url_with_password_and_db() {
        let settings = RedisSettings::builder()
            .addr("cache.internal:6380")
            .password("secret")
            .db(2)
            .build();
        assert_eq!(
            settings.connection_url().unwrap(),
            "redis://:secret@cache.internal:6380/2"
        );
    }

    #[test]
    fn settings_url_rejects_garbage_addr() {
        let settings = RedisSettings::builder().addr("not a host").build();
        assert!(matches!(
            settings.connection_url(),
            Err(StoreError::Unavailable(_))
        ));
    }
}
