//! Request handlers.

use crate::air_quality::AirQualityReport;
use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use roomkey_token::{Capabilities, TokenRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

// =============================================================================
// Health
// =============================================================================

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "roomkey-server" }))
}

// =============================================================================
// Token issuance
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub room: String,
    pub identity: String,
    /// Lifetime in seconds; the configured default when absent.
    pub ttl: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    /// Where the client should connect with `token`.
    pub url: String,
    pub room: String,
    pub identity: String,
    pub expires_at: DateTime<Utc>,
}

/// `GET /token?room=&identity=[&ttl=][&name=]`
///
/// Every caller gets the full participant capability set.
pub async fn token(
    State(state): State<AppState>,
    query: Result<Query<TokenQuery>, QueryRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let request = TokenRequest {
        identity: query.identity,
        room: query.room,
        ttl_seconds: Some(query.ttl.unwrap_or(state.default_ttl_seconds())),
        name: query.name.filter(|n| !n.trim().is_empty()),
        metadata: None,
    };

    let issued = state.issuer().issue(&request, Capabilities::default())?;

    tracing::info!(
        identity = %issued.identity,
        room = %issued.room,
        expires_at = %issued.expires_at,
        "Issued participant token"
    );

    Ok(Json(TokenResponse {
        token: issued.credential,
        url: state.livekit_url().to_string(),
        room: issued.room,
        identity: issued.identity,
        expires_at: issued.expires_at,
    }))
}

// =============================================================================
// Room management
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    pub room: String,
}

/// `DELETE /rooms/{room}`
pub async fn delete_room_path(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<Json<Value>, ApiError> {
    delete_room(&state, room).await
}

/// `POST /delete-room?room=`
pub async fn delete_room_query(
    State(state): State<AppState>,
    query: Result<Query<RoomQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    delete_room(&state, query.room).await
}

async fn delete_room(state: &AppState, room: String) -> Result<Json<Value>, ApiError> {
    state.room_service().delete_room(&room).await?;
    Ok(Json(json!({ "status": "ok", "room": room.trim() })))
}

// =============================================================================
// Air quality
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AirQualityQuery {
    pub location: String,
}

/// `GET /aqi?location=`
pub async fn air_quality(
    State(state): State<AppState>,
    query: Result<Query<AirQualityQuery>, QueryRejection>,
) -> Result<Json<AirQualityReport>, ApiError> {
    let source = state
        .air_quality()
        .ok_or_else(|| ApiError::NotFound("air-quality lookup is disabled".to_string()))?;
    let Query(query) = query.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let report = source.lookup(&query.location).await?;
    Ok(Json(report))
}
