use clap::{Parser, Subcommand, ValueEnum};
use shortlink_engine::EngineSettings;
use shortlink_store::redis::DEFAULT_REDIS_ADDR;
use shortlink_store::RedisSettings;
use std::fmt::{Display, Formatter};

pub const STORE_BACKEND_ENV: &str = "SHORTLINK_STORE";
pub const REDIS_ADDR_ENV: &str = "SHORTLINK_REDIS_ADDR";
pub const REDIS_PASSWORD_ENV: &str = "SHORTLINK_REDIS_PASSWORD";
pub const REDIS_DB_ENV: &str = "SHORTLINK_REDIS_DB";
pub const NAMESPACE_ENV: &str = "SHORTLINK_NAMESPACE";
pub const MAX_TTL_MINUTES_ENV: &str = "SHORTLINK_MAX_TTL_MINUTES";
pub const LOG_JSON_ENV: &str = "SHORTLINK_LOG_JSON";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StoreBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackendArg::InMemory => write!(f, "in-memory"),
            StoreBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "shortlink", about = "Shorten URLs and resolve short codes")]
pub struct CLI {
    #[arg(
        long,
        env = STORE_BACKEND_ENV,
        value_enum,
        default_value_t = StoreBackendArg::Redis
    )]
    pub store: StoreBackendArg,

    #[arg(long, env = REDIS_ADDR_ENV, default_value = DEFAULT_REDIS_ADDR)]
    pub redis_addr: String,

    #[arg(long, env = REDIS_PASSWORD_ENV, hide_env_values = true)]
    pub redis_password: Option<String>,

    #[arg(long, env = REDIS_DB_ENV, default_value_t = 0)]
    pub redis_db: i64,

    #[arg(long, env = NAMESPACE_ENV)]
    pub namespace: Option<String>,

    #[arg(long, env = MAX_TTL_MINUTES_ENV)]
    pub max_ttl_minutes: Option<u64>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, env = LOG_JSON_ENV)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a URL and print the short link as JSON.
    Shorten {
        url: String,
        /// Minutes until the short link expires; 0 keeps it forever.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        ttl_minutes: i64,
    },
    /// Print the URL a short code points to.
    Unshorten { code: String },
    /// Print the detail record of a short code as JSON.
    Info { code: String },
}

impl CLI {
    pub fn redis_settings(&self) -> RedisSettings {
        RedisSettings {
            addr: self.redis_addr.clone(),
            password: self.redis_password.clone(),
            db: self.redis_db,
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            namespace: self.namespace.clone(),
            max_ttl_minutes: self.max_ttl_minutes,
        }
    }
}
