use testcontainers::TestcontainersError;
use thiserror::Error;

/// Ways a Redis test fixture can fail before a test gets to run.
#[derive(Debug, Error)]
pub enum TestInfraError {
    /// The `redis` container did not start or never logged readiness.
    #[error("failed to start redis:{tag} container: {source}")]
    Start {
        tag: String,
        #[source]
        source: TestcontainersError,
    },

    /// The host or mapped port of a running container could not be resolved.
    #[error("failed to resolve {what} of redis container: {source}")]
    Endpoint {
        what: &'static str,
        #[source]
        source: TestcontainersError,
    },

    /// The container is up but a client could not connect to it.
    #[error("failed to connect to redis at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: redis::RedisError,
    },
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
