//! JSON schema for the model's itinerary payload.

mod validation;

pub use validation::validate_trip_payload;

use std::sync::OnceLock;

use schemars::schema_for;
use serde_json::Value;

use crate::types::TripEnvelope;

/// Cached Draft-7 schema for the `{ "trip": ... }` envelope.
pub fn trip_envelope_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        serde_json::to_value(schema_for!(TripEnvelope))
            .expect("trip envelope schema serializes to JSON")
    })
}
