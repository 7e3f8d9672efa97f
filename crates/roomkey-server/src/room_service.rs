//! Client for the platform's room-management API.
//!
//! Deleting a room is a single Twirp call:
//! `POST <http url>/twirp/livekit.RoomService/DeleteRoom` with body
//! `{"room": "<name>"}` and a bearer token carrying `roomCreate`.

use async_trait::async_trait;
use roomkey_token::{ServiceGrant, TokenError, TokenIssuer};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const DELETE_ROOM_PATH: &str = "/twirp/livekit.RoomService/DeleteRoom";

/// Outcome of a failed room API call.
///
/// `Transport` means no answer came back; `Rejected` means the platform
/// answered and said no.
#[derive(Debug, Error)]
pub enum RoomServiceError {
    #[error("room name must not be empty")]
    InvalidRoom,

    #[error("failed to sign room service token: {0}")]
    Token(#[from] TokenError),

    #[error("room service unreachable: {0}")]
    Transport(String),

    #[error("room service rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Room management operations used by the HTTP layer.
#[async_trait]
pub trait RoomService: Send + Sync {
    async fn delete_room(&self, room: &str) -> Result<(), RoomServiceError>;
}

/// [`RoomService`] backed by the platform's Twirp API.
pub struct LiveKitRoomService {
    base_url: String,
    issuer: TokenIssuer,
    token_ttl_seconds: i64,
    client: reqwest::Client,
}

impl LiveKitRoomService {
    /// `url` may be the client-facing `ws(s)://` URL; it is mapped to HTTP.
    pub fn new(
        url: &str,
        issuer: TokenIssuer,
        token_ttl_seconds: i64,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: http_base_url(url),
            issuer,
            token_ttl_seconds,
            client,
        }
    }

    /// The HTTP base the API is called on.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn service_token(&self) -> Result<String, TokenError> {
        self.issuer
            .issue_service_token(ServiceGrant::room_create(), self.token_ttl_seconds)
    }
}

#[async_trait]
impl RoomService for LiveKitRoomService {
    async fn delete_room(&self, room: &str) -> Result<(), RoomServiceError> {
        let room = room.trim();
        if room.is_empty() {
            return Err(RoomServiceError::InvalidRoom);
        }

        let token = self.service_token()?;
        let url = format!("{}{}", self.base_url, DELETE_ROOM_PATH);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "room": room }))
            .send()
            .await
            .map_err(|e| RoomServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(room = %room, "Room deleted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = twirp_message(&body).unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body
            }
        });

        tracing::warn!(room = %room, status = status.as_u16(), %message, "Room deletion rejected");

        Err(RoomServiceError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Deserialize)]
struct TwirpError {
    msg: String,
}

fn twirp_message(body: &str) -> Option<String> {
    serde_json::from_str::<TwirpError>(body)
        .ok()
        .map(|e| e.msg)
        .filter(|m| !m.is_empty())
}

/// Map a client-facing URL to the HTTP origin the API listens on.
pub fn http_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if let Some(rest) = url.strip_prefix("wss://") {
        format!("https://{rest}")
    } else if let Some(rest) = url.strip_prefix("ws://") {
        format!("http://{rest}")
    } else {
        url.to_string()
    }
}
