//! Air-quality lookup proxy.
//!
//! Forwards a location to the WAQI feed API
//! (`GET <base>/feed/<location>/?token=<token>`) and reshapes the answer
//! into [`AirQualityReport`].

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirQualityError {
    #[error("location must not be empty")]
    InvalidLocation,

    #[error("air-quality provider unreachable: {0}")]
    Transport(String),

    #[error("air-quality provider error: {0}")]
    Provider(String),

    #[error("unexpected air-quality response: {0}")]
    Decode(String),
}

/// Reshaped air-quality reading for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReport {
    /// The location as requested.
    pub location: String,
    /// Overall index; `None` when the station reports no value.
    pub aqi: Option<i64>,
    /// Station name.
    pub city: Option<String>,
    pub dominant_pollutant: Option<String>,
    /// Local observation time as reported by the station.
    pub observed_at: Option<String>,
    /// Individual readings keyed by pollutant (`pm25`, `o3`, ...).
    pub pollutants: BTreeMap<String, f64>,
}

/// Source of air-quality readings.
#[async_trait]
pub trait AirQualitySource: Send + Sync {
    async fn lookup(&self, location: &str) -> Result<AirQualityReport, AirQualityError>;
}

/// [`AirQualitySource`] backed by the WAQI feed API.
pub struct WaqiClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl WaqiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            client,
        }
    }

    fn feed_url(&self, location: &str) -> Result<Url, AirQualityError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AirQualityError::Transport(format!("invalid base URL: {e}")))?;

        url.path_segments_mut()
            .map_err(|_| AirQualityError::Transport("base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(["feed", location, ""]);
        url.query_pairs_mut().append_pair("token", &self.token);

        Ok(url)
    }
}

#[async_trait]
impl AirQualitySource for WaqiClient {
    async fn lookup(&self, location: &str) -> Result<AirQualityReport, AirQualityError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(AirQualityError::InvalidLocation);
        }

        let url = self.feed_url(location)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AirQualityError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AirQualityError::Provider(format!("HTTP {status}")));
        }

        let feed: FeedResponse = response
            .json()
            .await
            .map_err(|e| AirQualityError::Decode(e.to_string()))?;

        let report = feed.into_report(location)?;
        tracing::debug!(location = %location, aqi = ?report.aqi, "Air-quality lookup");
        Ok(report)
    }
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    status: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedData {
    aqi: serde_json::Value,
    city: Option<FeedCity>,
    // Provider spelling.
    dominentpol: Option<String>,
    iaqi: BTreeMap<String, FeedReading>,
    time: Option<FeedTime>,
}

#[derive(Debug, Deserialize)]
struct FeedCity {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeedReading {
    v: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct FeedTime {
    s: Option<String>,
}

impl FeedResponse {
    fn into_report(self, location: &str) -> Result<AirQualityReport, AirQualityError> {
        if self.status != "ok" {
            let message = self
                .data
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("status {}", self.status));
            return Err(AirQualityError::Provider(message));
        }

        let data: FeedData = serde_json::from_value(self.data)
            .map_err(|e| AirQualityError::Decode(e.to_string()))?;

        let pollutants = data
            .iaqi
            .into_iter()
            .filter_map(|(name, reading)| reading.v.as_f64().map(|v| (name, v)))
            .collect();

        Ok(AirQualityReport {
            location: location.to_string(),
            // "-" when the station has no current reading
            aqi: data.aqi.as_i64(),
            city: data.city.and_then(|c| c.name),
            dominant_pollutant: data.dominentpol.filter(|p| !p.is_empty()),
            observed_at: data.time.and_then(|t| t.s),
            pollutants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_feed() -> serde_json::Value {
        json!({
            "status": "ok",
            "data": {
                "aqi": 57,
                "idx": 1451,
                "city": { "name": "Beijing (北京)" },
                "dominentpol": "pm25",
                "iaqi": {
                    "pm25": { "v": 57 },
                    "o3": { "v": 12.4 },
                    "t": { "v": -1 }
                },
                "time": { "s": "2024-01-15 14:00:00", "tz": "+08:00" }
            }
        })
    }

    #[test]
    fn test_reshape_ok_feed() {
        let feed: FeedResponse = serde_json::from_value(sample_feed()).unwrap();
        let report = feed.into_report("beijing").unwrap();

        assert_eq!(report.location, "beijing");
        assert_eq!(report.aqi, Some(57));
        assert_eq!(report.city.as_deref(), Some("Beijing (北京)"));
        assert_eq!(report.dominant_pollutant.as_deref(), Some("pm25"));
        assert_eq!(report.observed_at.as_deref(), Some("2024-01-15 14:00:00"));
        assert_eq!(report.pollutants.get("o3"), Some(&12.4));
        assert_eq!(report.pollutants.len(), 3);
    }

    #[test]
    fn test_reshape_missing_index() {
        let feed: FeedResponse =
            serde_json::from_value(json!({ "status": "ok", "data": { "aqi": "-" } })).unwrap();
        let report = feed.into_report("nowhere").unwrap();
        assert_eq!(report.aqi, None);
        assert!(report.pollutants.is_empty());
    }

    #[test]
    fn test_provider_error_message() {
        let feed: FeedResponse =
            serde_json::from_value(json!({ "status": "error", "data": "Unknown station" }))
                .unwrap();
        match feed.into_report("atlantis") {
            Err(AirQualityError::Provider(msg)) => assert_eq!(msg, "Unknown station"),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_feed_url_encodes_location() {
        let client = WaqiClient::new("https://api.waqi.info", "t0k", reqwest::Client::new());
        let url = client.feed_url("new york").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.waqi.info/feed/new%20york/?token=t0k"
        );
    }

    #[tokio::test]
    async fn test_lookup_against_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed/beijing/"))
            .and(query_param("token", "t0k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_feed()))
            .mount(&server)
            .await;

        let client = WaqiClient::new(server.uri(), "t0k", reqwest::Client::new());
        let report = client.lookup("beijing").await.unwrap();
        assert_eq!(report.aqi, Some(57));
    }

    #[tokio::test]
    async fn test_lookup_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = WaqiClient::new(server.uri(), "t0k", reqwest::Client::new());
        assert!(matches!(
            client.lookup("beijing").await,
            Err(AirQualityError::Provider(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_rejects_blank_location() {
        let client = WaqiClient::new("https://api.waqi.info", "t0k", reqwest::Client::new());
        assert!(matches!(
            client.lookup(" ").await,
            Err(AirQualityError::InvalidLocation)
        ));
    }
}
