pub mod enrichment;
pub mod generator;

pub use enrichment::EnrichmentOrchestrator;
pub use generator::{parse_trip_response, ItineraryGenerator};
