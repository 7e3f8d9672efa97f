//! Configuration types shared by the roomkey binaries.

pub mod config;

pub use config::{
    AirQualityConfig, ConfigError, CorsConfig, LiveKitConfig, LogFormat, LoggingConfig,
    ResolvedLiveKit, RoomkeyConfig, ServerConfig,
};
