//! Configuration types for roomkey.
//!
//! Configuration is read once at startup from a YAML file (`roomkey.yaml` by
//! default) and from environment variables, then shared read-only.
//!
//! # Sources
//!
//! - **roomkey.yaml**: optional; every section has defaults
//! - **Environment**: secrets and deployment values. Each secret-bearing field
//!   has a companion `*_env` field naming the variable to read; the variable
//!   wins over an inline value.
//! - **PORT**: overrides `server.port`, as container platforms expect.

pub mod air_quality;
pub mod livekit;
pub mod logging;
pub mod server;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use air_quality::AirQualityConfig;
pub use livekit::{LiveKitConfig, ResolvedLiveKit};
pub use logging::{LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "ROOMKEY_CONFIG";

/// File read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "roomkey.yaml";

/// Complete roomkey configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomkeyConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Real-time platform connection and signing credentials.
    #[serde(default)]
    pub livekit: LiveKitConfig,

    /// Air-quality proxy settings.
    #[serde(default)]
    pub air_quality: AirQualityConfig,

    /// Log filter and output format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing configuration value: {field} (set {hint})")]
    Missing { field: String, hint: String },

    #[error("configuration error: {0}")]
    Invalid(String),
}

impl RoomkeyConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration the way the binaries do.
    ///
    /// An explicit `path` must exist. Without one, `ROOMKEY_CONFIG` is
    /// consulted, then `roomkey.yaml`; a missing default file means "all
    /// defaults". Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides that are not `*_env` indirections.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_port_override(std::env::var(server::PORT_ENV).ok().as_deref())
    }

    fn apply_port_override(&mut self, port: Option<&str>) -> Result<(), ConfigError> {
        if let Some(port) = port {
            self.server.port = port.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} is not a valid port: {port}", server::PORT_ENV))
            })?;
        }
        Ok(())
    }

    /// Check values that have no sensible fallback.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.livekit.default_ttl_seconds <= 0 {
            return Err(ConfigError::Invalid(
                "livekit.default_ttl_seconds must be positive".to_string(),
            ));
        }
        if self.livekit.service_token_ttl_seconds <= 0 {
            return Err(ConfigError::Invalid(
                "livekit.service_token_ttl_seconds must be positive".to_string(),
            ));
        }
        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the real-time platform settings; fails if any is absent.
    pub fn resolve_livekit(&self) -> Result<ResolvedLiveKit, ConfigError> {
        self.livekit.resolve()
    }
}

fn default_config_path() -> PathBuf {
    if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(p);
    }
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Read `env_var` if named and set to a non-blank value, else `inline`.
pub(crate) fn env_or_inline(env_var: Option<&str>, inline: Option<&str>) -> Option<String> {
    if let Some(name) = env_var
        && let Ok(value) = std::env::var(name)
        && !value.trim().is_empty()
    {
        return Some(value.trim().to_string());
    }

    inline
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
