//! Error types for the token crate.

use thiserror::Error;

/// Errors that can occur while issuing or checking room access tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// A request field is empty or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The API key or secret is absent or empty.
    #[error("misconfigured signer: {0}")]
    MisconfiguredSigner(String),

    /// The JWT encoder refused the claims.
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// Signature does not match the configured secret.
    #[error("token signature is invalid")]
    InvalidSignature,

    /// Token `exp` is in the past.
    #[error("token has expired")]
    Expired,

    /// Token `nbf` is in the future.
    #[error("token is not valid yet")]
    NotYetValid,

    /// Token is not a well-formed JWT or its claims do not decode.
    #[error("malformed token: {0}")]
    Malformed(String),
}

impl TokenError {
    /// Whether this error comes from caller input rather than server state.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TokenError::InvalidArgument(_))
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}
