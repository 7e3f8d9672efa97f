//! Shared application state.

use crate::air_quality::AirQualitySource;
use crate::room_service::RoomService;
use roomkey_token::TokenIssuer;
use std::sync::Arc;

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    issuer: TokenIssuer,
    /// Client-facing URL returned next to each token.
    livekit_url: String,
    default_ttl_seconds: i64,
    room_service: Arc<dyn RoomService>,
    /// `None` when the lookup proxy is disabled.
    air_quality: Option<Arc<dyn AirQualitySource>>,
}

impl AppState {
    pub fn new(
        issuer: TokenIssuer,
        livekit_url: impl Into<String>,
        default_ttl_seconds: i64,
        room_service: Arc<dyn RoomService>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                issuer,
                livekit_url: livekit_url.into(),
                default_ttl_seconds,
                room_service,
                air_quality: None,
            }),
        }
    }

    /// Enable the air-quality proxy.
    ///
    /// Must be called before the state is cloned into the router.
    pub fn with_air_quality(self, source: Arc<dyn AirQualitySource>) -> Self {
        let inner = match Arc::try_unwrap(self.inner) {
            Ok(inner) => inner,
            Err(shared) => AppStateInner {
                issuer: shared.issuer.clone(),
                livekit_url: shared.livekit_url.clone(),
                default_ttl_seconds: shared.default_ttl_seconds,
                room_service: Arc::clone(&shared.room_service),
                air_quality: None,
            },
        };

        Self {
            inner: Arc::new(AppStateInner {
                air_quality: Some(source),
                ..inner
            }),
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.inner.issuer
    }

    pub fn livekit_url(&self) -> &str {
        &self.inner.livekit_url
    }

    pub fn default_ttl_seconds(&self) -> i64 {
        self.inner.default_ttl_seconds
    }

    pub fn room_service(&self) -> &dyn RoomService {
        self.inner.room_service.as_ref()
    }

    pub fn air_quality(&self) -> Option<&dyn AirQualitySource> {
        self.inner.air_quality.as_deref()
    }
}
