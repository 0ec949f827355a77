use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::types::Coordinate;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Client for the Geocoding endpoint: free-text destination to a
/// representative coordinate.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl GeocodingClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `Ok(None)` when the provider cannot place the destination.
    pub async fn locate(&self, destination: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/geocode/json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("address", destination), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::Api {
                provider: "geocoding",
                message: format!("HTTP {status}"),
            });
        }

        let geocode: GeocodeResponse = response.json().await?;
        if geocode.status != "OK" {
            debug!(destination, provider_status = %geocode.status, "geocoding returned no match");
            return Ok(None);
        }

        Ok(geocode
            .results
            .first()
            .map(|result| Coordinate::new(result.geometry.location.lat, result.geometry.location.lng)))
    }
}
