//! Spell lobby TCP server.

use lobby_server::config::Config;
use lobby_server::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        slot_reuse = ?config.slot_reuse,
        "starting lobby-server"
    );

    server::run(config).await
}
