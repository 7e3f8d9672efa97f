//! Token commands.
//!
//! `roomkey token mint` - Mint a participant token.
//! `roomkey token verify` - Verify a token against the configured secret.
//! `roomkey token inspect` - Decode a token without verifying it.

use super::{CredentialArgs, read_token_arg};
use anyhow::Context;
use clap::Args;
use roomkey_token::{
    Capabilities, DEFAULT_TTL_SECONDS, TokenIssuer, TokenRequest, TokenVerifier,
    inspect_token_unverified,
};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct MintArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Participant identity
    #[arg(long)]
    pub identity: String,

    /// Room the token grants access to
    #[arg(long)]
    pub room: String,

    /// Token lifetime, e.g. "3600", "90s", "30m", "1h", "7d"
    #[arg(long)]
    pub ttl: Option<String>,

    /// Display name (defaults to the identity)
    #[arg(long)]
    pub name: Option<String>,

    /// Opaque participant metadata
    #[arg(long)]
    pub metadata: Option<String>,

    /// Do not allow publishing tracks
    #[arg(long, default_value_t = false)]
    pub no_publish: bool,

    /// Do not allow subscribing to tracks
    #[arg(long, default_value_t = false)]
    pub no_subscribe: bool,

    /// Do not allow publishing data messages
    #[arg(long, default_value_t = false)]
    pub no_publish_data: bool,

    /// Write the token to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl MintArgs {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            room_join: true,
            can_publish: !self.no_publish,
            can_subscribe: !self.no_subscribe,
            can_publish_data: !self.no_publish_data,
        }
    }
}

/// Parse a lifetime like "3600", "90s", "30m", "1h" or "7d" into seconds.
///
/// A bare number is seconds.
fn parse_duration(s: &str) -> anyhow::Result<i64> {
    let s = s.trim().to_lowercase();

    let (number, unit) = match s.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&s[..i], c),
        _ => (s.as_str(), 's'),
    };

    let value: i64 = number
        .trim()
        .parse()
        .with_context(|| format!("Invalid duration: {s}"))?;

    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86_400,
        other => anyhow::bail!("Unknown duration unit '{other}' in {s}"),
    };

    value
        .checked_mul(multiplier)
        .with_context(|| format!("Duration too large: {s}"))
}

/// Mint a participant token.
pub fn mint(args: MintArgs) -> anyhow::Result<()> {
    let issuer = TokenIssuer::new(args.credentials.resolve()?);

    let ttl_seconds = args
        .ttl
        .as_deref()
        .map(parse_duration)
        .transpose()?
        .unwrap_or(DEFAULT_TTL_SECONDS);

    let request = TokenRequest {
        identity: args.identity.clone(),
        room: args.room.clone(),
        ttl_seconds: Some(ttl_seconds),
        name: args.name.clone(),
        metadata: args.metadata.clone(),
    };

    let issued = issuer
        .issue(&request, args.capabilities())
        .context("Failed to mint token")?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &issued.credential)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        println!("✔ Token written to: {}", output_path.display());
        println!("  Identity: {}", issued.identity);
        println!("  Room: {}", issued.room);
        println!("  Expires: {}", issued.expires_at.to_rfc3339());
    } else {
        println!("{}", issued.credential);
    }

    Ok(())
}

/// Verify a token and print its claims.
///
/// `leeway_seconds` tolerates clock skew on `nbf`/`exp`.
pub fn verify(
    credentials: CredentialArgs,
    token: String,
    leeway_seconds: u64,
) -> anyhow::Result<()> {
    let verifier = TokenVerifier::new(credentials.resolve()?).with_leeway(leeway_seconds);
    let token = read_token_arg(&token)?;

    let claims = verifier
        .verify(&token)
        .context("✖ Token verification failed")?;

    println!("✔ Token is valid");
    println!();
    println!("Token Details:");
    println!("  Identity: {}", claims.sub);
    if let Some(name) = &claims.name {
        println!("  Name: {name}");
    }
    println!("  Room: {}", claims.video.room);
    println!(
        "  Join: {}  Publish: {}  Subscribe: {}  Data: {}",
        claims.video.room_join,
        claims.video.can_publish,
        claims.video.can_subscribe,
        claims.video.can_publish_data
    );
    if let Some(issued_at) = claims.issued_at() {
        println!("  Issued: {}", issued_at.to_rfc3339());
    }
    if let Some(expires_at) = claims.expires_at() {
        println!(
            "  Expires: {} (in {}s)",
            expires_at.to_rfc3339(),
            claims.time_until_expiration().num_seconds()
        );
    }

    Ok(())
}

/// Decode a token without verifying its signature.
pub fn inspect(token: String) -> anyhow::Result<()> {
    let token = read_token_arg(&token)?;
    let info = inspect_token_unverified(&token).context("Failed to decode token")?;

    println!("Token Information (signature NOT verified):");
    println!();
    println!("{}", info.pretty());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn credentials() -> CredentialArgs {
        CredentialArgs {
            api_key: Some("APIcli".to_string()),
            api_secret: Some("cli-secret".to_string()),
        }
    }

    fn mint_args(output: Option<PathBuf>) -> MintArgs {
        MintArgs {
            credentials: credentials(),
            identity: "alice".to_string(),
            room: "studio-1".to_string(),
            ttl: Some("30m".to_string()),
            name: None,
            metadata: None,
            no_publish: true,
            no_subscribe: false,
            no_publish_data: false,
            output,
        }
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("3600").unwrap(), 3600);
        assert_eq!(parse_duration("90s").unwrap(), 90);
        assert_eq!(parse_duration("30m").unwrap(), 1800);
        assert_eq!(parse_duration("1H").unwrap(), 3600);
        assert_eq!(parse_duration("7d").unwrap(), 604_800);
        assert!(parse_duration("1w").is_err());
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_mint_to_file_and_verify() {
        let dir = tempdir().unwrap();
        let token_path = dir.path().join("token.jwt");

        mint(mint_args(Some(token_path.clone()))).unwrap();

        let token = fs::read_to_string(&token_path).unwrap();
        let claims = TokenVerifier::new(credentials().resolve().unwrap())
            .verify(&token)
            .unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.nbf, 1800);
        assert!(!claims.video.can_publish);
        assert!(claims.video.can_subscribe);

        // Both commands accept a file path.
        verify(credentials(), token_path.to_string_lossy().to_string(), 0).unwrap();
        inspect(token_path.to_string_lossy().to_string()).unwrap();
    }

    #[test]
    fn test_verify_wrong_secret() {
        let dir = tempdir().unwrap();
        let token_path = dir.path().join("token.jwt");
        mint(mint_args(Some(token_path.clone()))).unwrap();

        let wrong = CredentialArgs {
            api_key: Some("APIcli".to_string()),
            api_secret: Some("other-secret".to_string()),
        };
        assert!(verify(wrong, token_path.to_string_lossy().to_string(), 0).is_err());
    }

    #[test]
    fn test_verify_leeway_accepts_just_expired_token() {
        let issuer = TokenIssuer::new(credentials().resolve().unwrap());
        let request = TokenRequest {
            ttl_seconds: Some(60),
            ..TokenRequest::new("alice", "studio-1")
        };
        let issued = issuer
            .issue_at(
                &request,
                Capabilities::all(),
                chrono::Utc::now() - chrono::TimeDelta::seconds(90),
            )
            .unwrap();

        assert!(verify(credentials(), issued.credential.clone(), 0).is_err());
        verify(credentials(), issued.credential, 300).unwrap();
    }

    #[test]
    fn test_mint_requires_credentials() {
        let mut args = mint_args(None);
        args.credentials = CredentialArgs::default();
        assert!(mint(args).is_err());
    }

    #[test]
    fn test_inspect_garbage() {
        assert!(inspect("not-a-token".to_string()).is_err());
    }
}
