//! [`KvStore`](shortlink_core::KvStore) implementations for the shortlink engine.

pub mod clock;
pub mod memory;
pub mod redis;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::InMemoryStore;
pub use redis::{RedisSettings, RedisStore};
