use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::utils::geo::Coordinates;

/// Distance and travel time between two points, however obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Failures from the external mapping provider. These are never surfaced
/// to callers: the fare service recovers by falling back to Haversine.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Seam for the optional external mapping/distance provider.
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    async fn estimate(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteEstimate, ProviderError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderResponse {
    distance_meters: f64,
    duration_seconds: f64,
}

fn to_estimate(body: ProviderResponse) -> Result<RouteEstimate, ProviderError> {
    if !body.distance_meters.is_finite()
        || !body.duration_seconds.is_finite()
        || body.distance_meters < 0.0
        || body.duration_seconds < 0.0
    {
        return Err(ProviderError::Malformed(format!(
            "distanceMeters={}, durationSeconds={}",
            body.distance_meters, body.duration_seconds
        )));
    }

    Ok(RouteEstimate {
        distance_km: body.distance_meters / 1000.0,
        duration_min: body.duration_seconds / 60.0,
    })
}

/// HTTP client for the mapping provider. Single attempt per quote, no
/// retries; the request timeout comes from config.
pub struct MapsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl MapsClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl DistanceProvider for MapsClient {
    async fn estimate(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteEstimate, ProviderError> {
        let mut request = self.http.post(&self.base_url).json(&json!({
            "origin": { "latitude": origin.latitude, "longitude": origin.longitude },
            "destination": { "latitude": destination.latitude, "longitude": destination.longitude },
        }));

        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let body: ProviderResponse = response.json().await?;
        to_estimate(body)
    }
}
