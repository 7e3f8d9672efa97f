//! Key management commands.
//!
//! `roomkey keys generate` - Generate a new API key/secret pair.

use roomkey_token::SigningCredentials;
use std::fs;
use std::path::PathBuf;

fn env_lines(credentials: &SigningCredentials) -> String {
    format!(
        "LIVEKIT_API_KEY={}\nLIVEKIT_API_SECRET={}\n",
        credentials.api_key(),
        credentials.api_secret()
    )
}

/// Generate a new API key/secret pair.
pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let credentials = SigningCredentials::generate();

    if let Some(output_path) = output {
        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, env_lines(&credentials))?;

        println!("✔ Generated API key/secret pair:");
        println!("  API key: {}", credentials.api_key());
        println!("  Written to: {}", output_path.display());
        println!();
        println!("⚠️  Keep the secret secure! Never commit it to version control.");
        println!();
        println!("Load into your shell:");
        println!("  set -a; . {}; set +a", output_path.display());
    } else {
        println!("export LIVEKIT_API_KEY={}", credentials.api_key());
        println!("export LIVEKIT_API_SECRET={}", credentials.api_secret());
    }

    Ok(())
}
