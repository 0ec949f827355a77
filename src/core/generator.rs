use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{PlannerError, Result};
use crate::schemas::validate_trip_payload;
use crate::services::{build_itinerary_prompt, GenerativeModel};
use crate::types::{TripEnvelope, TripPlan, TripRequest};

/// Turns a [`TripRequest`] into a validated [`TripPlan`] through the
/// generative model. A failure at any step aborts the request; no partial
/// plan is ever returned.
pub struct ItineraryGenerator<M> {
    model: M,
}

impl<M: GenerativeModel> ItineraryGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub async fn generate(&self, request: &TripRequest) -> Result<TripPlan> {
        let prompt = build_itinerary_prompt(request);
        debug!(destination = %request.destination, "requesting itinerary from model");

        let raw = self.model.generate(&prompt).await?;
        let plan = parse_trip_response(&raw)?;

        if plan.itinerary.len() as u32 != request.duration_days {
            warn!(
                requested = request.duration_days,
                generated = plan.itinerary.len(),
                "model returned a different day count than requested"
            );
        }

        Ok(plan)
    }
}

/// Parse the model's reply: strip any code fencing, require valid JSON,
/// validate against the envelope schema, then deserialize. The raw text
/// rides along in parse errors for diagnosis.
pub fn parse_trip_response(raw: &str) -> Result<TripPlan> {
    let cleaned = strip_code_fences(raw);

    let value: Value = serde_json::from_str(cleaned).map_err(|err| PlannerError::Parse {
        message: format!("model output is not valid JSON: {err}"),
        raw: raw.to_string(),
    })?;

    validate_trip_payload(&value)?;

    let envelope: TripEnvelope = serde_path_to_error::deserialize(&value).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::Parse {
            message: format!("failed to deserialize trip at {location}: {err}"),
            raw: raw.to_string(),
        }
    })?;

    check_day_numbering(&envelope.trip)?;
    Ok(envelope.trip)
}

/// Day numbers must be contiguous starting at 1; downstream route and map
/// logic indexes by them.
fn check_day_numbering(plan: &TripPlan) -> Result<()> {
    for (index, day) in plan.itinerary.iter().enumerate() {
        let expected = index as u32 + 1;
        if day.day != expected {
            return Err(PlannerError::Validation(format!(
                "itinerary day numbers must be contiguous from 1: position {} is numbered {}",
                index + 1,
                day.day
            )));
        }
    }
    Ok(())
}

/// Drop a single surrounding triple-backtick fence, with or without a
/// `json` language tag. Bare JSON passes through untouched.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimeOfDay;

    const VALID_REPLY: &str = r#"{
        "trip": {
            "trip_title": "Kyoto in Two Days",
            "summary": "Temples and tea houses.",
            "itinerary": [
                {
                    "day": 1,
                    "theme": "Old Kyoto",
                    "activities": [
                        {
                            "time_of_day": "Morning",
                            "poi_name": "Fushimi Inari Taisha",
                            "category": "Shrine",
                            "description": "Walk the torii gates.",
                            "estimated_duration_mins": 120
                        }
                    ]
                },
                {
                    "day": 2,
                    "theme": "Arashiyama",
                    "activities": [
                        {
                            "time_of_day": "Afternoon",
                            "poi_name": "Bamboo Grove",
                            "description": "Stroll the bamboo forest."
                        }
                    ]
                }
            ],
            "local_food_suggestions": ["Yudofu", "Matcha sweets"],
            "safety_tips": "Mind temple etiquette."
        }
    }"#;

    #[test]
    fn parses_valid_json_verbatim() {
        let plan = parse_trip_response(VALID_REPLY).unwrap();
        assert_eq!(plan.trip_title, "Kyoto in Two Days");
        assert_eq!(plan.itinerary.len(), 2);
        assert_eq!(plan.itinerary[0].theme, "Old Kyoto");
        let activity = &plan.itinerary[0].activities[0];
        assert_eq!(activity.time_of_day, TimeOfDay::Morning);
        assert_eq!(activity.poi_name, "Fushimi Inari Taisha");
        assert_eq!(activity.estimated_duration_mins, Some(120));
        // Optional fields omitted by the model stay absent.
        assert_eq!(plan.itinerary[1].activities[0].category, None);
        assert_eq!(plan.local_food_suggestions.len(), 2);
    }

    #[test]
    fn strips_code_fences_before_parsing() {
        let fenced = format!("```json\n{VALID_REPLY}\n```");
        let plan = parse_trip_response(&fenced).unwrap();
        assert_eq!(plan.itinerary.len(), 2);

        let bare_fence = format!("```\n{VALID_REPLY}\n```");
        assert!(parse_trip_response(&bare_fence).is_ok());
    }

    #[test]
    fn malformed_json_is_a_parse_error_carrying_the_raw_text() {
        let err = parse_trip_response("here is your itinerary!").unwrap_err();
        match err {
            PlannerError::Parse { raw, .. } => {
                assert_eq!(raw, "here is your itinerary!");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_keys_fail_validation() {
        let err = parse_trip_response(r#"{"trip": {"summary": "no title"}}"#).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn non_contiguous_day_numbers_are_rejected() {
        let reply = VALID_REPLY.replace("\"day\": 2", "\"day\": 3");
        let err = parse_trip_response(&reply).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("contiguous"));
    }
}
