//! # roomkey-server
//!
//! HTTP service around the roomkey token issuer.
//!
//! ## Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/`, `/healthz` | Liveness |
//! | GET | `/token?room=&identity=` | Mint a participant token |
//! | DELETE | `/rooms/{room}` | Delete a room upstream |
//! | POST | `/delete-room?room=` | Same, for clients that cannot send DELETE |
//! | GET | `/aqi?location=` | Air-quality lookup proxy |
//!
//! ## Architecture
//!
//! ```text
//! Browser / app
//!       │  HTTP + CORS
//!       ▼
//! ┌────────────────────┐
//! │  roomkey-server    │
//! │  /token ───────────┼──► roomkey-token (pure, in-process)
//! │  /rooms ───────────┼──► RoomService ──► platform room API
//! │  /aqi ─────────────┼──► AirQualitySource ──► provider feed
//! └────────────────────┘
//! ```

pub mod air_quality;
pub mod error;
pub mod handlers;
pub mod room_service;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use air_quality::{AirQualityError, AirQualityReport, AirQualitySource, WaqiClient};
pub use error::{ApiError, ServerError};
pub use room_service::{LiveKitRoomService, RoomService, RoomServiceError};
pub use routes::create_router;
pub use server::RoomkeyServer;
pub use state::AppState;
