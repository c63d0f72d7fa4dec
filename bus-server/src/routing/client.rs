//! OSRM route client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use crate::domain::Stop;

use super::error::RoutingError;

/// Default base URL of the public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Top-level OSRM `route` response.
#[derive(Debug, Deserialize)]
pub struct OsrmResponse {
    pub code: String,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    pub geometry: OsrmGeometry,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

/// GeoJSON line string; coordinates are `[lng, lat]`.
#[derive(Debug, Deserialize)]
pub struct OsrmGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the routing service
    pub base_url: String,
    /// Routing profile
    pub profile: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    /// Set a custom base URL (for testing or a self-hosted router).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: "driving".to_string(),
            timeout_secs: 20,
        }
    }
}

/// Client for the OSRM `route` service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    config: OsrmConfig,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, RoutingError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("DBUS-Visualizer/1.0"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Road geometry through every stop, as `[lng, lat]` pairs.
    pub async fn fetch_route(&self, stops: &[Stop]) -> Result<Vec<[f64; 2]>, RoutingError> {
        if stops.len() < 2 {
            return Err(RoutingError::TooFewStops(stops.len()));
        }

        let url = route_url(&self.config, stops);
        debug!(stops = stops.len(), "requesting OSRM route");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_route(&body)
    }
}

/// Build the request URL. OSRM takes `lng,lat` pairs separated by `;`.
pub fn route_url(config: &OsrmConfig, stops: &[Stop]) -> String {
    let coordinates = stops
        .iter()
        .map(|s| format!("{},{}", s.longitude, s.latitude))
        .collect::<Vec<_>>()
        .join(";");

    format!(
        "{}/route/v1/{}/{}?overview=full&geometries=geojson",
        config.base_url, config.profile, coordinates
    )
}

/// Extract the first route's coordinates from an OSRM response body.
pub fn parse_route(body: &str) -> Result<Vec<[f64; 2]>, RoutingError> {
    let response: OsrmResponse = serde_json::from_str(body).map_err(|e| RoutingError::Json {
        message: e.to_string(),
    })?;

    if response.code != "Ok" {
        return Err(RoutingError::NoRoute {
            code: response.code,
        });
    }

    response
        .routes
        .into_iter()
        .next()
        .map(|r| r.geometry.coordinates)
        .filter(|c| !c.is_empty())
        .ok_or(RoutingError::NoRoute {
            code: "empty".to_string(),
        })
}
