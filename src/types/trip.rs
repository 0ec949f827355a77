use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured trip plan returned by the generative model.
///
/// The wire shape is an envelope `{ "trip": { ... } }`; see [`TripEnvelope`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TripPlan {
    /// A creative title for the trip
    pub trip_title: String,
    /// An engaging 2-3 sentence summary of the trip
    pub summary: String,
    /// Day-by-day itinerary in calendar order
    pub itinerary: Vec<Day>,
    /// Local dishes the traveler should try
    #[serde(default)]
    pub local_food_suggestions: Vec<String>,
    /// Essential safety and cultural tips for the destination
    #[serde(default)]
    pub safety_tips: String,
}

/// Envelope the model is instructed to emit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TripEnvelope {
    pub trip: TripPlan,
}

/// One day of the itinerary.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Day {
    /// 1-based day counter matching the itinerary position
    pub day: u32,
    /// Short theme for the day (e.g. "Historical Heart & Culinary Kickstart")
    pub theme: String,
    /// Activities in chronological order
    pub activities: Vec<Activity>,
}

/// Rough slot of the day an activity occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
        }
    }
}

/// A single planned activity. `details` and `travel_from_previous` are
/// absent until the enrichment pass fills them in; they never come from
/// the model and are excluded from the response schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Activity {
    pub time_of_day: TimeOfDay,
    /// Specific name of a place of interest (e.g. "Tokyo National Museum")
    pub poi_name: String,
    /// Coarse category such as "Museum" or "Restaurant"
    #[serde(default)]
    pub category: Option<String>,
    /// A 2-3 sentence description of the activity
    pub description: String,
    /// Suggested time to spend, in minutes
    #[serde(default)]
    pub estimated_duration_mins: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub details: Option<PlaceResolution>,
    /// Human-readable travel estimate from the previous activity of the
    /// same day, e.g. "~ 12 mins by transit"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub travel_from_previous: Option<String>,
}

/// Outcome of a place lookup. Enrichment is best-effort per item, so a
/// failed lookup becomes `Unresolved` instead of aborting the pass; the
/// presentation layer checks this one variant instead of scattered "N/A"
/// sentinels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaceResolution {
    Resolved(PlaceDetails),
    Unresolved {
        /// Placeholder image standing in for real photos
        placeholder_photo: String,
    },
}

impl PlaceResolution {
    pub fn unresolved(poi_name: &str) -> Self {
        PlaceResolution::Unresolved {
            placeholder_photo: placeholder_photo_url(poi_name),
        }
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            PlaceResolution::Resolved(details) => details.coordinate,
            PlaceResolution::Unresolved { .. } => None,
        }
    }

    pub fn as_resolved(&self) -> Option<&PlaceDetails> {
        match self {
            PlaceResolution::Resolved(details) => Some(details),
            PlaceResolution::Unresolved { .. } => None,
        }
    }
}

/// Placeholder image URL used whenever no real photo is available.
pub fn placeholder_photo_url(name: &str) -> String {
    format!(
        "https://placehold.co/400x300/E0E0E0/000000?text={}",
        name.replace(' ', "+")
    )
}

/// Factual place data resolved through the Places API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub name: String,
    /// Provider rating; `None` when the provider reports none
    pub rating: Option<f64>,
    pub address: Option<String>,
    /// Absent when the provider returned no geometry
    pub coordinate: Option<Coordinate>,
    pub website: Option<String>,
    pub map_url: Option<String>,
    /// Up to 3 photo URLs; never empty (placeholder fallback)
    pub photos: Vec<String>,
}

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A decoded route between two consecutive activities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSegment {
    /// Decoded overview polyline in travel order
    pub path: Vec<Coordinate>,
    /// Human-readable duration, e.g. "23 mins"
    pub duration_text: String,
}

/// A route segment tagged with the day it belongs to, for per-day map
/// coloring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRoute {
    pub day: u32,
    pub route: RouteSegment,
}

/// One aggregated forecast day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    /// Arithmetic mean of the day's 3-hour samples, degrees Celsius
    pub avg_temp_c: f64,
    /// Most frequent condition label of the day
    pub condition: String,
    pub icon_url: String,
}

/// A lodging suggestion near the destination center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LodgingCandidate {
    pub name: String,
    pub rating: Option<f64>,
    pub vicinity: Option<String>,
}

/// A labeled coordinate for the map layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapPoint {
    pub name: String,
    pub coordinate: Coordinate,
    pub day: u32,
}

/// Final pipeline output: the generated plan plus everything the
/// enrichment pass attached. Replaces the original's ambient session
/// state with an explicit value handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedTrip {
    pub plan: TripPlan,
    /// Representative destination coordinate, when geocoding succeeded
    pub center: Option<Coordinate>,
    pub map_points: Vec<MapPoint>,
    pub routes: Vec<DayRoute>,
    /// At most min(duration, provider horizon) entries
    pub weather: Vec<WeatherDay>,
    pub lodging: Vec<LodgingCandidate>,
}
