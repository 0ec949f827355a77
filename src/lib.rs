//! odyssey-planner: an AI travel-itinerary pipeline
//!
//! This library turns structured trip preferences into a day-by-day plan:
//! a generative model produces a schema-validated itinerary, which is then
//! enriched with place details, inter-activity routes, weather, and lodging
//! suggestions from geo/weather REST APIs. Generation failures are terminal
//! for a request; enrichment failures degrade gracefully per item.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use odyssey_planner::{
//!     services::GeminiClient, EnrichmentOrchestrator, ItineraryGenerator, PlannerConfig,
//!     TripRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlannerConfig::from_env()?;
//!     let request = TripRequest::new(
//!         "Kyoto",
//!         2,
//!         NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
//!     );
//!
//!     let generator = ItineraryGenerator::new(GeminiClient::new(&config.gemini_api_key));
//!     let plan = generator.generate(&request).await?;
//!
//!     let trip = EnrichmentOrchestrator::new(&config).enrich(plan, &request).await;
//!     println!("{}", odyssey_planner::export::render_markdown(&trip));
//!     Ok(())
//! }
//! ```

pub mod clients;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod polyline;
pub mod schemas;
pub mod services;
pub mod types;

pub use config::PlannerConfig;
pub use core::{parse_trip_response, EnrichmentOrchestrator, ItineraryGenerator};
pub use error::{PlannerError, Result};
pub use export::render_markdown;
pub use services::{GeminiClient, GenerativeModel};
pub use types::{
    Activity, BudgetTier, Coordinate, Day, DayRoute, EnrichedTrip, LodgingCandidate, MapPoint,
    PlaceDetails, PlaceResolution, RouteSegment, TimeOfDay, TravelStyle, TripPlan, TripRequest,
    WeatherDay,
};

#[cfg(feature = "cli")]
pub mod cli;
