//! Stateless REST clients for the geo and weather providers.
//!
//! Every call is a single GET with the process-wide credential attached:
//! no retries, no caching, no shared state between invocations. Provider
//! "no results" answers are explicit absences (`Ok(None)` / empty vec) so
//! the enrichment pass can degrade per item.

pub mod directions;
pub mod geocoding;
pub mod places;
pub mod weather;

pub use directions::{DirectionsClient, TravelMode};
pub use geocoding::GeocodingClient;
pub use places::PlacesClient;
pub use weather::{aggregate_daily, ForecastEntry, WeatherClient};
