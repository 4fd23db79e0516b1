use anyhow::{anyhow, Context};
use std::sync::Arc;
use tracing::info;

use dungeon_core::logging::init_tracing;
use dungeon_server::{api, InMemoryProfileStore, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("failed to load server configuration")?;
    init_tracing(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.bind_addr(),
        "starting dungeon server"
    );

    // Profiles live for the lifetime of the process
    let profiles = Arc::new(InMemoryProfileStore::new());

    api::start_api_server(&config, profiles)
        .await
        .map_err(|e| anyhow!("API server error: {e}"))?;

    info!("server stopped");
    Ok(())
}
