mod cli;

use crate::cli::{Command, StoreBackendArg, CLI};
use clap::Parser;
use shortlink_engine::{ShortlinkEngine, Shortlinks};
use shortlink_store::{InMemoryStore, RedisStore};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_json);

    debug!(
        store_backend = %config.store,
        namespace = ?config.namespace,
        "starting shortlink"
    );

    let settings = config.engine_settings();
    match config.store {
        StoreBackendArg::InMemory => {
            run(ShortlinkEngine::new(InMemoryStore::new(), settings), config.command).await
        }
        StoreBackendArg::Redis => {
            let store = RedisStore::connect(&config.redis_settings()).await?;
            run(ShortlinkEngine::new(store, settings), config.command).await
        }
    }
}

async fn run<E: Shortlinks>(engine: E, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Shorten { url, ttl_minutes } => {
            let link = engine.shorten(&url, ttl_minutes).await?;
            println!("{}", serde_json::to_string_pretty(&link)?);
        }
        Command::Unshorten { code } => {
            println!("{}", engine.unshorten(&code).await?);
        }
        Command::Info { code } => {
            let detail = engine.shortlink_info(&code).await?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
    }
    Ok(())
}

/// Logs go to stderr so stdout only carries command output.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
