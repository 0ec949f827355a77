use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::clients::{
    DirectionsClient, GeocodingClient, PlacesClient, TravelMode, WeatherClient,
};
use crate::config::PlannerConfig;
use crate::types::{
    Coordinate, DayRoute, EnrichedTrip, MapPoint, PlaceResolution, TripPlan, TripRequest,
};

const DEFAULT_LOOKUP_CONCURRENCY: usize = 8;

/// Attaches place details, travel estimates, weather and lodging to a
/// generated plan. Enrichment is best-effort per item: a failed lookup
/// becomes an unresolved placeholder and never aborts the pass.
pub struct EnrichmentOrchestrator {
    places: PlacesClient,
    directions: DirectionsClient,
    geocoding: GeocodingClient,
    weather: WeatherClient,
    travel_mode: TravelMode,
    lookup_concurrency: usize,
}

impl EnrichmentOrchestrator {
    pub fn new(config: &PlannerConfig) -> Self {
        Self::with_clients(
            PlacesClient::new(&config.maps_api_key),
            DirectionsClient::new(&config.maps_api_key),
            GeocodingClient::new(&config.maps_api_key),
            WeatherClient::new(&config.weather_api_key),
        )
    }

    /// Construct from prebuilt clients; this is also the seam tests use to
    /// point every client at a mock server.
    pub fn with_clients(
        places: PlacesClient,
        directions: DirectionsClient,
        geocoding: GeocodingClient,
        weather: WeatherClient,
    ) -> Self {
        Self {
            places,
            directions,
            geocoding,
            weather,
            travel_mode: TravelMode::default(),
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
        }
    }

    pub fn with_travel_mode(mut self, travel_mode: TravelMode) -> Self {
        self.travel_mode = travel_mode;
        self
    }

    pub fn with_lookup_concurrency(mut self, lookup_concurrency: usize) -> Self {
        self.lookup_concurrency = lookup_concurrency.max(1);
        self
    }

    /// Run the full enrichment sweep over a generated plan.
    pub async fn enrich(&self, mut plan: TripPlan, request: &TripRequest) -> EnrichedTrip {
        let center = match self.geocoding.locate(&request.destination).await {
            Ok(center) => center,
            Err(err) => {
                warn!(destination = %request.destination, error = %err, "geocoding failed");
                None
            }
        };

        self.resolve_places(&mut plan, &request.destination).await;

        let mut map_points = Vec::new();
        let mut routes = Vec::new();
        for day in &mut plan.itinerary {
            // Resolved coordinate per activity position; unresolved
            // activities leave a hole instead of shifting later ones.
            let coordinates: Vec<Option<Coordinate>> = day
                .activities
                .iter()
                .map(|activity| activity.details.as_ref().and_then(PlaceResolution::coordinate))
                .collect();

            for (index, coordinate) in coordinates.iter().enumerate() {
                let Some(coordinate) = coordinate else {
                    continue;
                };
                let name = day.activities[index]
                    .details
                    .as_ref()
                    .and_then(PlaceResolution::as_resolved)
                    .map(|details| details.name.clone())
                    .unwrap_or_else(|| day.activities[index].poi_name.clone());
                map_points.push(MapPoint {
                    name,
                    coordinate: *coordinate,
                    day: day.day,
                });
            }

            // Route only between immediately consecutive resolved
            // activities; the annotation goes on the second of the pair,
            // so the first activity of a day never carries one.
            for index in 1..day.activities.len() {
                let (Some(origin), Some(destination)) =
                    (coordinates[index - 1], coordinates[index])
                else {
                    continue;
                };
                match self.directions.route(origin, destination, self.travel_mode).await {
                    Ok(Some(route)) => {
                        day.activities[index].travel_from_previous = Some(format!(
                            "~ {} by {}",
                            route.duration_text,
                            self.travel_mode.as_str()
                        ));
                        routes.push(DayRoute {
                            day: day.day,
                            route,
                        });
                    }
                    Ok(None) => {
                        debug!(day = day.day, "no route between consecutive activities");
                    }
                    Err(err) => {
                        warn!(day = day.day, error = %err, "route lookup failed");
                    }
                }
            }
        }

        // Weather and lodging anchor on the destination center, falling
        // back to the first resolved activity coordinate.
        let anchor = center.or_else(|| map_points.first().map(|point| point.coordinate));
        let (weather, lodging) = match anchor {
            Some(anchor) => {
                let (weather, lodging) = tokio::join!(
                    self.weather.forecast(anchor, request.duration_days),
                    self.places.nearby_lodging(anchor),
                );
                let weather = weather.unwrap_or_else(|err| {
                    warn!(error = %err, "weather lookup failed");
                    Vec::new()
                });
                let lodging = lodging.unwrap_or_else(|err| {
                    warn!(error = %err, "lodging lookup failed");
                    Vec::new()
                });
                (weather, lodging)
            }
            None => {
                warn!("no usable coordinate; skipping weather and lodging");
                (Vec::new(), Vec::new())
            }
        };

        info!(
            days = plan.itinerary.len(),
            map_points = map_points.len(),
            routes = routes.len(),
            "enrichment complete"
        );

        EnrichedTrip {
            plan,
            center,
            map_points,
            routes,
            weather,
            lodging,
        }
    }

    /// Resolve every activity's place details through a bounded concurrent
    /// task group. Lookups are independent and idempotent, so order does
    /// not affect correctness, only display order, which is preserved by
    /// writing results back by index.
    async fn resolve_places(&self, plan: &mut TripPlan, destination: &str) {
        let semaphore = Arc::new(Semaphore::new(self.lookup_concurrency));
        let mut lookups: JoinSet<(usize, usize, PlaceResolution)> = JoinSet::new();

        for (day_index, day) in plan.itinerary.iter().enumerate() {
            for (activity_index, activity) in day.activities.iter().enumerate() {
                let permit_source = Arc::clone(&semaphore);
                let places = self.places.clone();
                let poi_name = activity.poi_name.clone();
                let destination = destination.to_string();

                lookups.spawn(async move {
                    let _permit = permit_source
                        .acquire_owned()
                        .await
                        .expect("semaphore is never closed");
                    let resolution = match places.find_place(&poi_name, &destination).await {
                        Ok(Some(details)) => PlaceResolution::Resolved(details),
                        Ok(None) => {
                            warn!(poi_name, "place could not be resolved");
                            PlaceResolution::unresolved(&poi_name)
                        }
                        Err(err) => {
                            warn!(poi_name, error = %err, "place lookup failed");
                            PlaceResolution::unresolved(&poi_name)
                        }
                    };
                    (day_index, activity_index, resolution)
                });
            }
        }

        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((day_index, activity_index, resolution)) => {
                    plan.itinerary[day_index].activities[activity_index].details =
                        Some(resolution);
                }
                Err(err) => warn!(error = %err, "place lookup task failed"),
            }
        }

        // Catch-all so every activity leaves enrichment with a resolution.
        for day in &mut plan.itinerary {
            for activity in &mut day.activities {
                if activity.details.is_none() {
                    activity.details = Some(PlaceResolution::unresolved(&activity.poi_name));
                }
            }
        }
    }
}
