pub mod request;
pub mod trip;

pub use request::{BudgetTier, TravelStyle, TripRequest};
pub use trip::{
    placeholder_photo_url, Activity, Coordinate, Day, DayRoute, EnrichedTrip, LodgingCandidate,
    MapPoint, PlaceDetails, PlaceResolution, RouteSegment, TimeOfDay, TripEnvelope, TripPlan,
    WeatherDay,
};
