use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::types::{placeholder_photo_url, Coordinate, LodgingCandidate, PlaceDetails};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
const DETAILS_FIELDS: &str = "name,rating,formatted_address,photos,geometry,website,url";
const MAX_PHOTOS: usize = 3;
const LODGING_RADIUS_METERS: u32 = 2000;
const MAX_LODGING_CANDIDATES: usize = 10;

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    results: Vec<TextSearchResult>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResult {
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    result: Option<PlaceData>,
}

#[derive(Debug, Deserialize)]
struct PlaceData {
    name: Option<String>,
    rating: Option<f64>,
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
    #[serde(default)]
    photos: Vec<PhotoReference>,
    website: Option<String>,
    url: Option<String>,
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

#[derive(Debug, Deserialize)]
struct PhotoReference {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    #[serde(default)]
    results: Vec<NearbyPlace>,
}

#[derive(Debug, Deserialize)]
struct NearbyPlace {
    name: Option<String>,
    rating: Option<f64>,
    vicinity: Option<String>,
}

/// Client for the Places text-search, details and nearby-search endpoints.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl PlacesClient {
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

    /// Resolve the best matching place for a POI name near a destination
    /// and fetch its details. `Ok(None)` means the provider found nothing;
    /// transport and decode failures are `Err` and left to the caller's
    /// degradation policy.
    pub async fn find_place(
        &self,
        poi_name: &str,
        destination: &str,
    ) -> Result<Option<PlaceDetails>> {
        let query = format!("{poi_name} in {destination}");
        let search_url = format!("{}/place/textsearch/json", self.base_url);
        let search: TextSearchResponse = self
            .get_json(&search_url, &[("query", query.as_str())])
            .await?;

        let Some(first) = search.results.first() else {
            debug!(poi_name, "text search returned no results");
            return Ok(None);
        };

        let details_url = format!("{}/place/details/json", self.base_url);
        let details: DetailsResponse = self
            .get_json(
                &details_url,
                &[
                    ("place_id", first.place_id.as_str()),
                    ("fields", DETAILS_FIELDS),
                ],
            )
            .await?;

        let Some(place) = details.result else {
            debug!(poi_name, "details lookup returned no result");
            return Ok(None);
        };

        let mut photos: Vec<String> = place
            .photos
            .iter()
            .take(MAX_PHOTOS)
            .map(|photo| {
                format!(
                    "{}/place/photo?maxwidth=400&photoreference={}&key={}",
                    self.base_url, photo.photo_reference, self.api_key
                )
            })
            .collect();
        if photos.is_empty() {
            photos.push(placeholder_photo_url(poi_name));
        }

        Ok(Some(PlaceDetails {
            name: place.name.unwrap_or_else(|| poi_name.to_string()),
            rating: place.rating,
            address: place.formatted_address,
            coordinate: place
                .geometry
                .map(|geometry| Coordinate::new(geometry.location.lat, geometry.location.lng)),
            website: place.website,
            map_url: place.url,
            photos,
        }))
    }

    /// Lodging candidates within walking distance of a coordinate, best
    /// rated first as the provider returns them. An empty list is a valid
    /// "nothing nearby" answer.
    pub async fn nearby_lodging(&self, coordinate: Coordinate) -> Result<Vec<LodgingCandidate>> {
        let url = format!("{}/place/nearbysearch/json", self.base_url);
        let location = format!("{},{}", coordinate.lat, coordinate.lon);
        let radius = LODGING_RADIUS_METERS.to_string();
        let nearby: NearbySearchResponse = self
            .get_json(
                &url,
                &[
                    ("location", location.as_str()),
                    ("radius", radius.as_str()),
                    ("type", "lodging"),
                ],
            )
            .await?;

        Ok(nearby
            .results
            .into_iter()
            .take(MAX_LODGING_CANDIDATES)
            .filter_map(|place| {
                place.name.map(|name| LodgingCandidate {
                    name,
                    rating: place.rating,
                    vicinity: place.vicinity,
                })
            })
            .collect())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::Api {
                provider: "places",
                message: format!("HTTP {status}"),
            });
        }

        response.json::<T>().await.map_err(PlannerError::from)
    }
}
