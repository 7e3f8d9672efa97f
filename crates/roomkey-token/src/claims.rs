//! Token request and claims types.

use crate::error::TokenError;
use crate::grant::Grant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime applied when a request does not name one.
pub const DEFAULT_TTL_SECONDS: i64 = 3600;

/// Input to token issuance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Participant identity; also the display name unless `name` is set.
    pub identity: String,

    /// Room the token is scoped to.
    pub room: String,

    /// Lifetime in seconds. `None` means [`DEFAULT_TTL_SECONDS`].
    #[serde(default)]
    pub ttl_seconds: Option<i64>,

    /// Display name override.
    #[serde(default)]
    pub name: Option<String>,

    /// Opaque participant metadata passed through to the room.
    #[serde(default)]
    pub metadata: Option<String>,
}

impl TokenRequest {
    /// Request a token for `identity` in `room` with the default lifetime.
    pub fn new(identity: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            room: room.into(),
            ..Default::default()
        }
    }

    /// Check required fields and resolve the lifetime.
    pub(crate) fn validate(&self) -> Result<i64, TokenError> {
        if self.identity.trim().is_empty() {
            return Err(TokenError::InvalidArgument(
                "identity must not be empty".to_string(),
            ));
        }
        if self.room.trim().is_empty() {
            return Err(TokenError::InvalidArgument(
                "room must not be empty".to_string(),
            ));
        }

        let ttl = self.ttl_seconds.unwrap_or(DEFAULT_TTL_SECONDS);
        if ttl <= 0 {
            return Err(TokenError::InvalidArgument(format!(
                "ttl_seconds must be positive, got {ttl}"
            )));
        }

        Ok(ttl)
    }

    /// The display name placed in the `name` claim.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.identity)
    }
}

/// Claims carried by a signed room token.
///
/// `G` is the shape of the `video` grant: [`Grant`] for participants,
/// [`ServiceGrant`](crate::ServiceGrant) for the server's own API calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims<G = Grant> {
    /// API key that signed the token.
    pub iss: String,

    /// Participant identity.
    pub sub: String,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Not valid before (Unix seconds); equals the issue instant.
    pub nbf: i64,

    /// Expiry (Unix seconds).
    pub exp: i64,

    /// Room permissions.
    pub video: G,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

impl<G> AccessClaims<G> {
    /// When the token became valid.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.nbf, 0)
    }

    /// When the token stops being valid.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Get time until expiration.
    pub fn time_until_expiration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.exp - Utc::now().timestamp())
    }
}
