use anyhow::{Context, Result};
use roomkey_core::RoomkeyConfig;
use roomkey_server::RoomkeyServer;
use roomkey_server::telemetry::init_tracing;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config path as the only argument; otherwise ROOMKEY_CONFIG / roomkey.yaml.
    let path = std::env::args_os().nth(1).map(PathBuf::from);

    let config = RoomkeyConfig::load(path.as_deref()).context("failed to load configuration")?;

    init_tracing(&config.logging)?;

    let server = RoomkeyServer::from_config(config).context("failed to configure server")?;
    server.run().await?;

    Ok(())
}
