//! Serve command.
//!
//! `roomkey serve` - Start the HTTP token service.

use anyhow::Context;
use roomkey_core::RoomkeyConfig;
use roomkey_server::RoomkeyServer;
use roomkey_server::telemetry::init_tracing;
use std::path::PathBuf;

/// Load configuration, apply CLI overrides and run until Ctrl-C.
pub async fn serve(config_path: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<()> {
    let config = load_config(config_path, port)?;

    init_tracing(&config.logging)?;

    let server = RoomkeyServer::from_config(config).context("Failed to configure server")?;
    println!("✔ Listening on {}", server.bind_address());

    server.run().await?;
    Ok(())
}

fn load_config(path: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<RoomkeyConfig> {
    let mut config = RoomkeyConfig::load(path.as_deref()).with_context(|| match &path {
        Some(p) => format!("Failed to load configuration from {}", p.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    if let Some(port) = port {
        config.server.port = port;
    }

    Ok(config)
}
