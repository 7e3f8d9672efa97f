//! # roomkey-token
//!
//! Room access token handling for roomkey.
//!
//! This crate provides functionality for:
//! - Holding the API key/secret pair that signs tokens
//! - Minting participant tokens scoped to exactly one room
//! - Minting short-lived service tokens for the room-management API
//! - Verifying tokens and decoding their claims
//!
//! ## Token Model
//!
//! | Token Type | Minted For | `video` grant | Lifetime |
//! |------------|------------|---------------|----------|
//! | **Participant** | A client joining a room | [`Grant`]: room + join/publish/subscribe/data | Default 1h |
//! | **Service** | This server calling the room API | [`ServiceGrant`]: roomCreate/roomList/roomAdmin | Minutes |
//!
//! Tokens are compact HS256 JWTs. The issuer is keyed by the API key (`iss`),
//! so the real-time platform can pick the matching secret to verify them.
//! Nothing is stored server-side: validity lives entirely in the signature
//! and the embedded `nbf`/`exp`.

pub mod claims;
pub mod credentials;
pub mod error;
pub mod grant;
pub mod token;

pub use claims::{AccessClaims, DEFAULT_TTL_SECONDS, TokenRequest};
pub use credentials::SigningCredentials;
pub use error::TokenError;
pub use grant::{Capabilities, Grant, ServiceGrant};
pub use token::{
    IssuedToken, TokenInfo, TokenIssuer, TokenVerifier, inspect_token_unverified, issue,
};
