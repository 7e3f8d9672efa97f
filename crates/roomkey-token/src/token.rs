//! Token issuance and verification.

use crate::claims::{AccessClaims, TokenRequest};
use crate::credentials::SigningCredentials;
use crate::error::TokenError;
use crate::grant::{Capabilities, Grant, ServiceGrant};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, Header, Validation};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A signed participant token plus the values it was minted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    /// The compact JWT.
    pub credential: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub identity: String,
    pub room: String,
}

impl IssuedToken {
    /// Lifetime embedded in the token.
    pub fn ttl_seconds(&self) -> i64 {
        (self.expires_at - self.issued_at).num_seconds()
    }
}

/// Mints room tokens with a fixed key/secret pair.
///
/// Holds no mutable state; clone it freely across tasks.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    credentials: SigningCredentials,
}

impl TokenIssuer {
    /// Create a new token issuer with the given credentials.
    pub fn new(credentials: SigningCredentials) -> Self {
        Self { credentials }
    }

    /// Mint a participant token valid from now.
    pub fn issue(
        &self,
        request: &TokenRequest,
        capabilities: Capabilities,
    ) -> Result<IssuedToken, TokenError> {
        self.issue_at(request, capabilities, Utc::now())
    }

    /// Mint a participant token valid from `now`.
    pub fn issue_at(
        &self,
        request: &TokenRequest,
        capabilities: Capabilities,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let ttl = request.validate()?;
        let (issued_at, expires_at) = validity_window(now, ttl)?;

        let claims = AccessClaims {
            iss: self.credentials.api_key().to_string(),
            sub: request.identity.clone(),
            name: Some(request.display_name().to_string()),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            video: Grant::new(request.room.clone(), capabilities),
            metadata: request.metadata.clone(),
        };

        let credential = self.sign(&claims)?;

        tracing::debug!(
            identity = %request.identity,
            room = %request.room,
            ttl_seconds = ttl,
            "Issued room token"
        );

        Ok(IssuedToken {
            credential,
            issued_at,
            expires_at,
            identity: request.identity.clone(),
            room: request.room.clone(),
        })
    }

    /// Mint a token for this server's own calls to the room API.
    pub fn issue_service_token(
        &self,
        grant: ServiceGrant,
        ttl_seconds: i64,
    ) -> Result<String, TokenError> {
        if ttl_seconds <= 0 {
            return Err(TokenError::InvalidArgument(format!(
                "ttl_seconds must be positive, got {ttl_seconds}"
            )));
        }
        let (issued_at, expires_at) = validity_window(Utc::now(), ttl_seconds)?;

        let claims = AccessClaims {
            iss: self.credentials.api_key().to_string(),
            sub: self.credentials.api_key().to_string(),
            name: None,
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            video: grant,
            metadata: None,
        };

        self.sign(&claims)
    }

    fn sign<G: Serialize>(&self, claims: &AccessClaims<G>) -> Result<String, TokenError> {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.credentials.encoding_key(),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

/// Mint a participant token from raw key material.
///
/// The signer is checked before the request, so a missing key or secret is
/// reported as [`TokenError::MisconfiguredSigner`] whatever the request holds.
pub fn issue(
    request: &TokenRequest,
    capabilities: Capabilities,
    signing_key: &str,
    signing_secret: &str,
) -> Result<IssuedToken, TokenError> {
    let credentials = SigningCredentials::new(signing_key, signing_secret)?;
    TokenIssuer::new(credentials).issue(request, capabilities)
}

/// Whole-second `[issued_at, expires_at]` window starting at `now`.
fn validity_window(
    now: DateTime<Utc>,
    ttl_seconds: i64,
) -> Result<(DateTime<Utc>, DateTime<Utc>), TokenError> {
    let out_of_range =
        || TokenError::InvalidArgument(format!("ttl_seconds {ttl_seconds} is out of range"));

    let issued_at = DateTime::from_timestamp(now.timestamp(), 0).ok_or_else(out_of_range)?;
    let ttl = TimeDelta::try_seconds(ttl_seconds).ok_or_else(out_of_range)?;
    let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(out_of_range)?;

    Ok((issued_at, expires_at))
}

/// Verifier for room tokens signed with a shared secret.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    credentials: SigningCredentials,
    leeway_seconds: u64,
}

impl TokenVerifier {
    /// Create a verifier with no clock leeway.
    pub fn new(credentials: SigningCredentials) -> Self {
        Self {
            credentials,
            leeway_seconds: 0,
        }
    }

    /// Allow `seconds` of clock skew on `nbf`/`exp`.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Verify a participant token and return its claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims<Grant>, TokenError> {
        self.verify_as(token)
    }

    /// Verify a token whose `video` claim has shape `G`.
    pub fn verify_as<G: DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<AccessClaims<G>, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_seconds;
        validation.validate_nbf = true;
        validation.set_issuer(&[self.credentials.api_key()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);

        let data = jsonwebtoken::decode::<AccessClaims<G>>(
            token.trim(),
            &self.credentials.decoding_key(),
            &validation,
        )?;

        Ok(data.claims)
    }
}

/// Information about a token (for inspection).
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// Decoded JOSE header.
    pub header: serde_json::Value,
    /// Decoded claims, unverified.
    pub claims: serde_json::Value,
}

impl TokenInfo {
    /// Human-readable representation.
    pub fn pretty(&self) -> String {
        let header = serde_json::to_string_pretty(&self.header).unwrap_or_default();
        let claims = serde_json::to_string_pretty(&self.claims).unwrap_or_default();
        format!("Header:\n{header}\n\nClaims:\n{claims}")
    }
}

/// Inspect a token without verification (for debugging).
pub fn inspect_token_unverified(token: &str) -> Result<TokenInfo, TokenError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed(format!(
            "expected 3 segments, found {}",
            parts.len()
        )));
    }

    Ok(TokenInfo {
        header: decode_segment(parts[0])?,
        claims: decode_segment(parts[1])?,
    })
}

fn decode_segment(segment: &str) -> Result<serde_json::Value, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Malformed(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SigningCredentials::new("K", "S").unwrap())
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SigningCredentials::new("K", "S").unwrap())
    }

    #[test]
    fn test_issue_and_verify_default_grant() {
        let request = TokenRequest {
            ttl_seconds: Some(3600),
            ..TokenRequest::new("alice", "studio-1")
        };
        let issued = issuer().issue(&request, Capabilities::default()).unwrap();

        assert_eq!(issued.identity, "alice");
        assert_eq!(issued.room, "studio-1");

        let claims = verifier().verify(&issued.credential).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.name.as_deref(), Some("alice"));
        assert_eq!(claims.iss, "K");
        assert_eq!(claims.video, Grant::new("studio-1", Capabilities::all()));
        assert_eq!(claims.nbf, issued.issued_at.timestamp());
        assert_eq!(claims.exp, issued.issued_at.timestamp() + 3600);
    }

    #[test]
    fn test_claims_payload_shape() {
        let issued = issuer()
            .issue(&TokenRequest::new("alice", "studio-1"), Capabilities::all())
            .unwrap();
        let info = inspect_token_unverified(&issued.credential).unwrap();

        assert_eq!(info.header["alg"], "HS256");
        assert_eq!(info.claims["sub"], "alice");
        assert_eq!(info.claims["name"], "alice");
        assert_eq!(
            info.claims["video"],
            json!({
                "room": "studio-1",
                "roomJoin": true,
                "canPublish": true,
                "canSubscribe": true,
                "canPublishData": true,
            })
        );
        assert!(info.claims.get("metadata").is_none());
    }

    #[test]
    fn test_caller_capabilities_are_not_escalated() {
        let issued = issuer()
            .issue(
                &TokenRequest::new("viewer", "studio-1"),
                Capabilities::subscribe_only(),
            )
            .unwrap();
        let claims = verifier().verify(&issued.credential).unwrap();

        assert_eq!(claims.video.capabilities(), Capabilities::subscribe_only());
    }

    #[test]
    fn test_expiry_matches_ttl_exactly() {
        for ttl in [1, 59, 3600, 86_400 * 30] {
            let request = TokenRequest {
                ttl_seconds: Some(ttl),
                ..TokenRequest::new("alice", "studio-1")
            };
            let issued = issuer().issue(&request, Capabilities::all()).unwrap();
            assert_eq!(issued.expires_at - issued.issued_at, TimeDelta::seconds(ttl));
            assert_eq!(issued.ttl_seconds(), ttl);
        }
    }

    #[test]
    fn test_different_instants_give_different_valid_tokens() {
        let request = TokenRequest::new("alice", "studio-1");
        let now = Utc::now();

        let first = issuer()
            .issue_at(&request, Capabilities::all(), now - TimeDelta::seconds(5))
            .unwrap();
        let second = issuer().issue_at(&request, Capabilities::all(), now).unwrap();

        assert_ne!(first.credential, second.credential);
        assert!(verifier().verify(&first.credential).is_ok());
        assert!(verifier().verify(&second.credential).is_ok());
    }

    #[test]
    fn test_same_instant_is_deterministic() {
        let request = TokenRequest::new("alice", "studio-1");
        let now = Utc::now();

        let first = issuer().issue_at(&request, Capabilities::all(), now).unwrap();
        let second = issuer().issue_at(&request, Capabilities::all(), now).unwrap();
        assert_eq!(first.credential, second.credential);
    }

    #[test]
    fn test_invalid_arguments() {
        let cases = [
            TokenRequest::new("", "x"),
            TokenRequest::new("alice", ""),
            TokenRequest {
                ttl_seconds: Some(0),
                ..TokenRequest::new("alice", "x")
            },
            TokenRequest {
                ttl_seconds: Some(-30),
                ..TokenRequest::new("alice", "x")
            },
        ];

        for request in cases {
            let result = issuer().issue(&request, Capabilities::all());
            assert!(
                matches!(result, Err(TokenError::InvalidArgument(_))),
                "{request:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_huge_ttl_rejected() {
        let request = TokenRequest {
            ttl_seconds: Some(i64::MAX),
            ..TokenRequest::new("alice", "x")
        };
        assert!(matches!(
            issuer().issue(&request, Capabilities::all()),
            Err(TokenError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_signer_wins_over_valid_request() {
        let request = TokenRequest::new("alice", "studio-1");
        assert!(matches!(
            issue(&request, Capabilities::all(), "", "S"),
            Err(TokenError::MisconfiguredSigner(_))
        ));
        assert!(matches!(
            issue(&request, Capabilities::all(), "K", ""),
            Err(TokenError::MisconfiguredSigner(_))
        ));

        let bad_request = TokenRequest::new("", "");
        assert!(matches!(
            issue(&bad_request, Capabilities::all(), "K", ""),
            Err(TokenError::MisconfiguredSigner(_))
        ));
    }

    #[test]
    fn test_free_function_matches_issuer() {
        let issued = issue(
            &TokenRequest::new("alice", "studio-1"),
            Capabilities::all(),
            "K",
            "S",
        )
        .unwrap();
        assert!(verifier().verify(&issued.credential).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = issuer()
            .issue(&TokenRequest::new("alice", "studio-1"), Capabilities::all())
            .unwrap();
        let other = TokenVerifier::new(SigningCredentials::new("K", "other").unwrap());

        assert!(matches!(
            other.verify(&issued.credential),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let request = TokenRequest {
            ttl_seconds: Some(60),
            ..TokenRequest::new("alice", "studio-1")
        };
        let issued = issuer()
            .issue_at(
                &request,
                Capabilities::all(),
                Utc::now() - TimeDelta::hours(2),
            )
            .unwrap();

        assert!(matches!(
            verifier().verify(&issued.credential),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_leeway_tolerates_recent_expiry() {
        let request = TokenRequest {
            ttl_seconds: Some(60),
            ..TokenRequest::new("alice", "studio-1")
        };
        let issued = issuer()
            .issue_at(
                &request,
                Capabilities::all(),
                Utc::now() - TimeDelta::seconds(90),
            )
            .unwrap();

        assert!(matches!(
            verifier().verify(&issued.credential),
            Err(TokenError::Expired)
        ));
        let claims = verifier()
            .with_leeway(120)
            .verify(&issued.credential)
            .unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_future_token_not_yet_valid() {
        let issued = issuer()
            .issue_at(
                &TokenRequest::new("alice", "studio-1"),
                Capabilities::all(),
                Utc::now() + TimeDelta::hours(1),
            )
            .unwrap();

        assert!(matches!(
            verifier().verify(&issued.credential),
            Err(TokenError::NotYetValid)
        ));
    }

    #[test]
    fn test_service_token_carries_room_create() {
        let token = issuer()
            .issue_service_token(ServiceGrant::room_create(), 600)
            .unwrap();
        let claims = verifier().verify_as::<ServiceGrant>(&token).unwrap();

        assert!(claims.video.room_create);
        assert!(!claims.video.room_admin);
        assert_eq!(claims.sub, "K");
        assert_eq!(claims.exp - claims.nbf, 600);
    }

    #[test]
    fn test_metadata_passed_through() {
        let request = TokenRequest {
            metadata: Some(r#"{"seat":3}"#.to_string()),
            name: Some("Alice".to_string()),
            ..TokenRequest::new("alice", "studio-1")
        };
        let issued = issuer().issue(&request, Capabilities::all()).unwrap();
        let claims = verifier().verify(&issued.credential).unwrap();

        assert_eq!(claims.metadata.as_deref(), Some(r#"{"seat":3}"#));
        assert_eq!(claims.name.as_deref(), Some("Alice"));
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        assert!(matches!(
            inspect_token_unverified("not-a-token"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            inspect_token_unverified("a.b.c"),
            Err(TokenError::Malformed(_))
        ));
    }
}
