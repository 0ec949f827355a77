use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::polyline;
use crate::types::{Coordinate, RouteSegment};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Mode of travel passed to the Directions API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelMode {
    Driving,
    Walking,
    #[default]
    Transit,
    Bicycling,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Transit => "transit",
            TravelMode::Bicycling => "bicycling",
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    legs: Vec<Leg>,
    overview_polyline: OverviewPolyline,
}

#[derive(Debug, Deserialize)]
struct Leg {
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
    points: String,
}

/// Client for the Directions endpoint: a recommended path and travel
/// duration between two coordinates.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl DirectionsClient {
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

    /// Fetch a route between two points. `Ok(None)` when the provider has
    /// no route (status other than `OK`, or an empty route list).
    pub async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<RouteSegment>> {
        let url = format!("{}/directions/json", self.base_url);
        let origin_param = format!("{},{}", origin.lat, origin.lon);
        let destination_param = format!("{},{}", destination.lat, destination.lon);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("origin", origin_param.as_str()),
                ("destination", destination_param.as_str()),
                ("mode", mode.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::Api {
                provider: "directions",
                message: format!("HTTP {status}"),
            });
        }

        let directions: DirectionsResponse = response.json().await?;
        if directions.status != "OK" || directions.routes.is_empty() {
            debug!(provider_status = %directions.status, "no route available");
            return Ok(None);
        }

        let route = &directions.routes[0];
        let Some(leg) = route.legs.first() else {
            return Ok(None);
        };

        let path = polyline::decode(&route.overview_polyline.points)?;
        Ok(Some(RouteSegment {
            path,
            duration_text: leg.duration.text.clone(),
        }))
    }
}
