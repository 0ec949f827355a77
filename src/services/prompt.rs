use std::fmt::Write;

use crate::types::TripRequest;

/// Build the itinerary-generation instruction. Every request field is
/// embedded, and the demanded output is a single JSON object matching the
/// envelope schema the generator validates against.
pub fn build_itinerary_prompt(request: &TripRequest) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are an expert travel planner AI. Create a detailed, exciting, and logical travel itinerary.\n\
         Your output MUST be a single valid JSON object, with no markdown formatting before or after.\n\n\
         **User Request:**\n",
    );

    let _ = writeln!(prompt, "- Destination: {}", request.destination);
    let _ = writeln!(
        prompt,
        "- Duration: {} days, starting on {}",
        request.duration_days, request.start_date
    );
    let _ = writeln!(prompt, "- Budget: {}", request.budget.as_str());
    let _ = writeln!(prompt, "- Travel Style: {}", request.travel_style.as_str());
    let _ = writeln!(prompt, "- Interests: {}", join_or_none(&request.interests));
    let _ = writeln!(
        prompt,
        "- Dietary Needs: {}",
        join_or_none(&request.dietary_needs)
    );
    if let Some(requirements) = &request.special_requirements {
        let _ = writeln!(prompt, "- Special Requirements: {requirements}");
    }

    prompt.push_str(
        r#"
**JSON Output Structure:**
{
  "trip": {
    "trip_title": "A creative title for the trip.",
    "summary": "An engaging 2-3 sentence summary of the trip.",
    "itinerary": [
      {
        "day": 1,
        "theme": "A theme for the day (e.g., 'Historical Heart & Culinary Kickstart').",
        "activities": [
          {
            "time_of_day": "Morning",
            "poi_name": "Specific Name of a Place of Interest (e.g., 'Tokyo National Museum').",
            "category": "Museum",
            "description": "A 2-3 sentence description of the activity.",
            "estimated_duration_mins": 180
          },
          {
            "time_of_day": "Afternoon",
            "poi_name": "Specific Name of a Restaurant or Cafe (e.g., 'Ichiran Ramen Ueno').",
            "category": "Restaurant",
            "description": "Why this place is a good choice for lunch, fitting the user's needs.",
            "estimated_duration_mins": 60
          },
          {
            "time_of_day": "Evening",
            "poi_name": "Specific Name of an evening activity (e.g., 'Tokyo Skytree').",
            "category": "Viewpoint",
            "description": "Description of the evening experience.",
            "estimated_duration_mins": 120
          }
        ]
      }
    ],
    "local_food_suggestions": ["List of local dishes to try."],
    "safety_tips": "Essential safety and cultural tips for the destination."
  }
}

Day numbers must start at 1 and increase by one per day. "time_of_day" must be
one of "Morning", "Afternoon" or "Evening".

Generate the complete JSON object now based on the user request.
"#,
    );

    prompt
}

fn join_or_none(tags: &[String]) -> String {
    if tags.is_empty() {
        "None".to_string()
    } else {
        tags.join(", ")
    }
}
