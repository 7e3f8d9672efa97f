//! Air-quality proxy configuration.

use super::env_or_inline;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityConfig {
    /// Whether `/aqi` is served at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Provider base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Provider API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable containing the provider token.
    #[serde(default = "default_token_env")]
    pub token_env: Option<String>,
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            token: None,
            token_env: default_token_env(),
        }
    }
}

impl AirQualityConfig {
    /// Resolve the provider token; the public `demo` token when unset.
    pub fn resolve_token(&self) -> String {
        env_or_inline(self.token_env.as_deref(), self.token.as_deref())
            .unwrap_or_else(|| "demo".to_string())
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.waqi.info".to_string()
}

fn default_token_env() -> Option<String> {
    Some("AQI_API_TOKEN".to_string())
}
