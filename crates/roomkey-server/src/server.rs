//! Server assembly and lifecycle.

use crate::air_quality::WaqiClient;
use crate::error::ServerError;
use crate::room_service::LiveKitRoomService;
use crate::routes;
use crate::state::AppState;
use axum::Router;
use axum::http::{HeaderValue, StatusCode};
use roomkey_core::{CorsConfig, RoomkeyConfig};
use roomkey_token::{SigningCredentials, TokenIssuer};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// The roomkey HTTP server.
pub struct RoomkeyServer {
    bind_address: String,
    request_timeout: Duration,
    cors: CorsConfig,
    state: AppState,
}

impl RoomkeyServer {
    /// Resolve credentials and upstream clients from configuration.
    ///
    /// Fails when a value is out of range or the platform URL, key or
    /// secret is unresolved.
    pub fn from_config(config: RoomkeyConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let livekit = config.resolve_livekit()?;
        let credentials = SigningCredentials::new(&livekit.api_key, &livekit.api_secret)?;
        let issuer = TokenIssuer::new(credentials);

        let request_timeout = Duration::from_secs(config.server.request_timeout_seconds);
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ServerError::StartupFailed(format!("HTTP client: {e}")))?;

        let room_service = LiveKitRoomService::new(
            &livekit.url,
            issuer.clone(),
            livekit.service_token_ttl_seconds,
            client.clone(),
        );
        tracing::debug!(base_url = %room_service.base_url(), "Room service configured");

        let mut state = AppState::new(
            issuer,
            livekit.url.clone(),
            livekit.default_ttl_seconds,
            Arc::new(room_service),
        );

        if config.air_quality.enabled {
            let source = WaqiClient::new(
                config.air_quality.base_url.clone(),
                config.air_quality.resolve_token(),
                client,
            );
            state = state.with_air_quality(Arc::new(source));
        }

        Ok(Self {
            bind_address: config.server.bind_address(),
            request_timeout,
            cors: config.server.cors,
            state,
        })
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    /// The router with CORS, tracing and timeout layers applied.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.request_timeout,
            ))
            .layer(cors_layer(&self.cors))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = self.router();

        let listener = TcpListener::bind(&self.bind_address)
            .await
            .map_err(|e| ServerError::StartupFailed(format!("{}: {e}", self.bind_address)))?;

        tracing::info!(address = %self.bind_address, "Starting roomkey server");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::StartupFailed(e.to_string()))?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
