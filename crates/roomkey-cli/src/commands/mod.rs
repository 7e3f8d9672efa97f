//! CLI command implementations.

pub mod keys;
pub mod room;
pub mod serve;
pub mod token;

use anyhow::Context;
use clap::Args;
use roomkey_token::SigningCredentials;
use std::fs;
use std::path::Path;

/// Key/secret flags shared by every command that signs or verifies.
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// API key (token issuer id)
    #[arg(long, env = "LIVEKIT_API_KEY")]
    pub api_key: Option<String>,

    /// API secret
    #[arg(long, env = "LIVEKIT_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,
}

impl CredentialArgs {
    pub fn resolve(&self) -> anyhow::Result<SigningCredentials> {
        let api_key = self
            .api_key
            .as_deref()
            .context("API key not provided. Pass --api-key or set LIVEKIT_API_KEY")?;
        let api_secret = self
            .api_secret
            .as_deref()
            .context("API secret not provided. Pass --api-secret or set LIVEKIT_API_SECRET")?;

        SigningCredentials::new(api_key, api_secret).context("Invalid signing credentials")
    }
}

/// Accept either a token or a path to a file containing one.
pub(crate) fn read_token_arg(token: &str) -> anyhow::Result<String> {
    let path = Path::new(token);
    if path.exists() {
        return Ok(fs::read_to_string(path)
            .with_context(|| format!("Failed to read token file: {}", path.display()))?
            .trim()
            .to_string());
    }
    Ok(token.trim().to_string())
}
