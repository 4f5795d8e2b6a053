use crate::error::{Result, TestInfraError};
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const REDIS_PORT: u16 = 6379;

/// Settings for a throwaway Redis container.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisServerConfig {
    /// Tag of the `redis` image to run.
    #[builder(default = "8.6.0".to_string(), setter(into))]
    pub tag: String,

    /// Extra wait after the readiness log line before handing out the server.
    #[builder(default = Duration::from_millis(200))]
    pub settle: Duration,
}

impl Default for RedisServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A single Redis server running in a container.
///
/// The container is removed when this value is dropped.
pub struct RedisServer {
    container: ContainerAsync<GenericImage>,
}

impl RedisServer {
    /// Starts a Redis server with the default configuration.
    pub async fn start() -> Result<Self> {
        Self::start_with(RedisServerConfig::default()).await
    }

    pub async fn start_with(config: RedisServerConfig) -> Result<Self> {
        let container = GenericImage::new("redis", config.tag.as_str())
            .with_exposed_port(REDIS_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await
            .map_err(|source| TestInfraError::Start {
                tag: config.tag.clone(),
                source,
            })?;

        tokio::time::sleep(config.settle).await;

        Ok(Self { container })
    }

    pub async fn host(&self) -> Result<String> {
        let host = self
            .container
            .get_host()
            .await
            .map_err(|source| TestInfraError::Endpoint {
                what: "host",
                source,
            })?
            .to_string();

        Ok(match host.as_str() {
            "localhost" => String::from("127.0.0.1"),
            _ => host,
        })
    }

    pub async fn port(&self) -> Result<u16> {
        self.container
            .get_host_port_ipv4(REDIS_PORT)
            .await
            .map_err(|source| TestInfraError::Endpoint {
                what: "port",
                source,
            })
    }

    /// `host:port` of the server as seen from the test process.
    pub async fn addr(&self) -> Result<String> {
        Ok(format!("{}:{}", self.host().await?, self.port().await?))
    }

    /// Opens a new multiplexed connection to the server.
    pub async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        let addr = self.addr().await?;
        let connect = |source| TestInfraError::Connect {
            addr: addr.clone(),
            source,
        };

        let client = redis::Client::open(format!("redis://{addr}")).map_err(connect)?;
        client.get_multiplexed_async_connection().await.map_err(connect)
    }
}
