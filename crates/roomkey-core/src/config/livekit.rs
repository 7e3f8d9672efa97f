//! Real-time platform (LiveKit) configuration.
//!
//! Each value can come from an environment variable (highest precedence) or
//! be written inline. The default variable names match the platform's own
//! tooling: `LIVEKIT_URL`, `LIVEKIT_API_KEY`, `LIVEKIT_API_SECRET`.

use super::{ConfigError, env_or_inline};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection URL and signing credentials for the real-time platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveKitConfig {
    /// Client-facing URL, e.g. `wss://project.livekit.cloud`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Environment variable containing the URL.
    #[serde(default = "default_url_env")]
    pub url_env: Option<String>,

    /// API key (token issuer id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable containing the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,

    /// API secret. Prefer `api_secret_env` over writing it inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,

    /// Environment variable containing the API secret.
    #[serde(default = "default_api_secret_env")]
    pub api_secret_env: Option<String>,

    /// Lifetime of participant tokens when the request names none.
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: i64,

    /// Lifetime of the server's own room-API tokens.
    #[serde(default = "default_service_token_ttl_seconds")]
    pub service_token_ttl_seconds: i64,
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: None,
            url_env: default_url_env(),
            api_key: None,
            api_key_env: default_api_key_env(),
            api_secret: None,
            api_secret_env: default_api_secret_env(),
            default_ttl_seconds: default_ttl_seconds(),
            service_token_ttl_seconds: default_service_token_ttl_seconds(),
        }
    }
}

/// Fully resolved platform settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedLiveKit {
    pub url: String,
    pub api_key: String,
    pub api_secret: String,
    pub default_ttl_seconds: i64,
    pub service_token_ttl_seconds: i64,
}

impl fmt::Debug for ResolvedLiveKit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedLiveKit")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("default_ttl_seconds", &self.default_ttl_seconds)
            .field("service_token_ttl_seconds", &self.service_token_ttl_seconds)
            .finish()
    }
}

impl LiveKitConfig {
    /// Resolve the URL from environment or inline value.
    pub fn resolve_url(&self) -> Option<String> {
        env_or_inline(self.url_env.as_deref(), self.url.as_deref())
    }

    /// Resolve the API key from environment or inline value.
    pub fn resolve_api_key(&self) -> Option<String> {
        env_or_inline(self.api_key_env.as_deref(), self.api_key.as_deref())
    }

    /// Resolve the API secret from environment or inline value.
    pub fn resolve_api_secret(&self) -> Option<String> {
        env_or_inline(self.api_secret_env.as_deref(), self.api_secret.as_deref())
    }

    /// Resolve every value, reporting the first one that is missing.
    pub fn resolve(&self) -> Result<ResolvedLiveKit, ConfigError> {
        let url = self
            .resolve_url()
            .ok_or_else(|| missing("livekit.url", self.url_env.as_deref()))?;
        let api_key = self
            .resolve_api_key()
            .ok_or_else(|| missing("livekit.api_key", self.api_key_env.as_deref()))?;
        let api_secret = self
            .resolve_api_secret()
            .ok_or_else(|| missing("livekit.api_secret", self.api_secret_env.as_deref()))?;

        Ok(ResolvedLiveKit {
            url,
            api_key,
            api_secret,
            default_ttl_seconds: self.default_ttl_seconds,
            service_token_ttl_seconds: self.service_token_ttl_seconds,
        })
    }
}

fn missing(field: &str, env_var: Option<&str>) -> ConfigError {
    let hint = match env_var {
        Some(var) => format!("{var} or {field}"),
        None => field.to_string(),
    };
    ConfigError::Missing {
        field: field.to_string(),
        hint,
    }
}

fn default_url_env() -> Option<String> {
    Some("LIVEKIT_URL".to_string())
}

fn default_api_key_env() -> Option<String> {
    Some("LIVEKIT_API_KEY".to_string())
}

fn default_api_secret_env() -> Option<String> {
    Some("LIVEKIT_API_SECRET".to_string())
}

fn default_ttl_seconds() -> i64 {
    3600
}

fn default_service_token_ttl_seconds() -> i64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline_only() -> LiveKitConfig {
        LiveKitConfig {
            url: Some("wss://rtc.example.com".to_string()),
            url_env: None,
            api_key: Some("K".to_string()),
            api_key_env: None,
            api_secret: Some("S".to_string()),
            api_secret_env: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_inline_values() {
        let resolved = inline_only().resolve().unwrap();
        assert_eq!(resolved.url, "wss://rtc.example.com");
        assert_eq!(resolved.api_key, "K");
        assert_eq!(resolved.api_secret, "S");
        assert_eq!(resolved.default_ttl_seconds, 3600);
    }

    #[test]
    fn test_env_beats_inline() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("ROOMKEY_TEST_LK_SECRET", "from-env");
        }

        let config = LiveKitConfig {
            api_secret_env: Some("ROOMKEY_TEST_LK_SECRET".to_string()),
            ..inline_only()
        };
        assert_eq!(config.resolve().unwrap().api_secret, "from-env");

        // SAFETY: Cleanup in test
        unsafe {
            std::env::remove_var("ROOMKEY_TEST_LK_SECRET");
        }
    }

    #[test]
    fn test_missing_secret_reported() {
        let config = LiveKitConfig {
            api_secret: None,
            api_secret_env: Some("ROOMKEY_TEST_LK_NEVER_SET".to_string()),
            ..inline_only()
        };

        match config.resolve() {
            Err(ConfigError::Missing { field, hint }) => {
                assert_eq!(field, "livekit.api_secret");
                assert!(hint.contains("ROOMKEY_TEST_LK_NEVER_SET"));
            }
            other => panic!("expected missing secret, got {other:?}"),
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let resolved = inline_only().resolve().unwrap();
        assert!(!format!("{resolved:?}").contains("\"S\""));
    }
}
