//! Room commands.
//!
//! `roomkey room delete` - Delete a room on the platform.

use super::CredentialArgs;
use anyhow::Context;
use roomkey_server::{LiveKitRoomService, RoomService};
use roomkey_token::TokenIssuer;
use std::time::Duration;

/// Lifetime of the service token used for one CLI call.
const SERVICE_TOKEN_TTL_SECONDS: i64 = 600;

/// Delete `room` via the platform's room API at `url`.
pub async fn delete(
    credentials: CredentialArgs,
    url: Option<String>,
    room: String,
    timeout_seconds: u64,
) -> anyhow::Result<()> {
    let url = url.context("Platform URL not provided. Pass --url or set LIVEKIT_URL")?;
    let issuer = TokenIssuer::new(credentials.resolve()?);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .context("Failed to build HTTP client")?;

    let service = LiveKitRoomService::new(&url, issuer, SERVICE_TOKEN_TTL_SECONDS, client);

    service
        .delete_room(&room)
        .await
        .with_context(|| format!("✖ Failed to delete room '{room}'"))?;

    println!("✔ Room deleted: {room}");
    Ok(())
}
