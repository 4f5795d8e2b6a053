use std::time::Duration;

use redis::AsyncCommands;
use shortlink_core::{KvStore, StoreError, Ttl};
use shortlink_store::{RedisSettings, RedisStore};
use shortlink_test_infra::redis::RedisServer;

async fn start() -> (RedisServer, RedisStore) {
    let server = RedisServer::start()
        .await
        .expect("Failed to start Redis container");
    let settings = RedisSettings::builder()
        .addr(server.addr().await.expect("Failed to get Redis address"))
        .build();
    let store = RedisStore::connect(&settings)
        .await
        .expect("Failed to connect to Redis");
    (server, store)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_redis_store_set_get_exists() {
    let (_server, store) = start().await;

    assert!(store.get("k").await.unwrap().is_none());
    assert!(!store.exists("k").await.unwrap());

    store.set("k", "v", Ttl::Never).await.unwrap();

    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    assert!(store.exists("k").await.unwrap());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_redis_store_incr_is_sequential() {
    let (_server, store) = start().await;

    assert_eq!(store.incr("next.url.id").await.unwrap(), 1);
    assert_eq!(store.incr("next.url.id").await.unwrap(), 2);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_redis_store_incr_non_integer_fails() {
    let (_server, store) = start().await;
    store.set("k", "abc", Ttl::Never).await.unwrap();

    let err = store.incr("k").await.unwrap_err();
    assert!(matches!(err, StoreError::Operation(_)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_redis_store_ttl_is_applied() {
    let (server, store) = start().await;

    store
        .set("short", "v", Ttl::After(Duration::from_secs(60)))
        .await
        .unwrap();
    store.set("forever", "v", Ttl::Never).await.unwrap();

    let mut conn = server.connection().await.unwrap();
    let short_ttl: i64 = conn.ttl("short").await.unwrap();
    let forever_ttl: i64 = conn.ttl("forever").await.unwrap();

    assert!(short_ttl > 0 && short_ttl <= 60, "ttl was {short_ttl}");
    assert_eq!(forever_ttl, -1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_redis_store_value_expires() {
    let (_server, store) = start().await;

    store
        .set("k", "v", Ttl::After(Duration::from_millis(200)))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(store.get("k").await.unwrap().is_none());
    assert!(!store.exists("k").await.unwrap());
}

#[tokio::test]
async fn test_redis_store_connect_refused() {
    let settings = RedisSettings::builder().addr("127.0.0.1:1").build();

    let err = RedisStore::connect(&settings).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}
