use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::error::{PlannerError, Result};

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validate a candidate trip payload against the envelope schema before
/// deserialization, so a missing required field surfaces here as a typed
/// error instead of later as an absent-field failure in a consumer.
pub fn validate_trip_payload(payload: &Value) -> Result<()> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(super::trip_envelope_schema())
        .map_err(|err| {
            PlannerError::Validation(format!(
                "Failed to prepare trip schema for validation: {err}"
            ))
        })?;

    if let Err(errors) = validator.validate(payload) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{path}: {error}"));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "trip payload failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(PlannerError::Validation(format!(
            "Model output does not match the trip schema: {detail_str}"
        )));
    }

    Ok(())
}
