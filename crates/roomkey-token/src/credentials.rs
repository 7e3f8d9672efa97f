//! API key/secret pair used to sign room tokens.

use crate::error::TokenError;
use base64::{Engine, engine::general_purpose::STANDARD};
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::distr::Alphanumeric;
use rand::{Rng, RngCore};
use std::fmt;

/// Prefix of generated API keys.
pub const API_KEY_PREFIX: &str = "API";

/// The shared-secret signer for HS256 tokens.
///
/// The key id travels in the token's `iss` claim; the secret never leaves
/// the process.
#[derive(Clone)]
pub struct SigningCredentials {
    api_key: String,
    api_secret: String,
}

impl SigningCredentials {
    /// Build credentials from a key id and secret. Both must be non-empty.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let api_key = api_key.into().trim().to_string();
        let api_secret = api_secret.into().trim().to_string();

        if api_key.is_empty() {
            return Err(TokenError::MisconfiguredSigner(
                "API key is missing".to_string(),
            ));
        }
        if api_secret.is_empty() {
            return Err(TokenError::MisconfiguredSigner(
                "API secret is missing".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            api_secret,
        })
    }

    /// Generate a fresh random key/secret pair.
    pub fn generate() -> Self {
        let mut rng = rand::rng();

        let suffix: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();

        let mut secret = [0u8; 32];
        rng.fill_bytes(&mut secret);

        Self {
            api_key: format!("{API_KEY_PREFIX}{suffix}"),
            api_secret: STANDARD.encode(secret),
        }
    }

    /// The key id placed in `iss`.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The shared secret (for export only; never log it).
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.api_secret.as_bytes())
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.api_secret.as_bytes())
    }
}

impl fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}
