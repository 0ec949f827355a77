//! Markdown rendering of an enriched trip, the downloadable artifact.

use std::fmt::Write;

use crate::types::{EnrichedTrip, PlaceResolution};

/// Render a complete enriched trip as a markdown document.
pub fn render_markdown(trip: &EnrichedTrip) -> String {
    let mut out = String::new();
    let plan = &trip.plan;

    let _ = writeln!(out, "# {}\n", plan.trip_title);
    let _ = writeln!(out, "_{}_\n", plan.summary);

    for day in &plan.itinerary {
        let _ = writeln!(out, "## Day {}: {}\n", day.day, day.theme);
        for activity in &day.activities {
            let _ = writeln!(out, "### {}: {}", activity.time_of_day.as_str(), activity.poi_name);
            if let Some(travel) = &activity.travel_from_previous {
                let _ = writeln!(out, "*Travel: {travel}*");
            }
            let _ = writeln!(out, "\n{}", activity.description);
            match &activity.details {
                Some(PlaceResolution::Resolved(details)) => {
                    let rating = details
                        .rating
                        .map(|rating| format!("{rating:.1}"))
                        .unwrap_or_else(|| "unrated".to_string());
                    let address = details.address.as_deref().unwrap_or("address unknown");
                    let _ = writeln!(out, "\nRating: {rating} — {address}");
                    if let Some(map_url) = &details.map_url {
                        let _ = writeln!(out, "[Map]({map_url})");
                    }
                }
                Some(PlaceResolution::Unresolved { .. }) => {
                    let _ = writeln!(out, "\n_Details could not be resolved._");
                }
                None => {}
            }
            out.push('\n');
        }
    }

    if !trip.weather.is_empty() {
        out.push_str("## Weather Forecast\n\n");
        out.push_str("| Date | Avg Temp | Conditions |\n|---|---|---|\n");
        for day in &trip.weather {
            let _ = writeln!(
                out,
                "| {} | {:.1} °C | {} |",
                day.date.format("%b %d"),
                day.avg_temp_c,
                day.condition
            );
        }
        out.push('\n');
    }

    if !trip.lodging.is_empty() {
        out.push_str("## Lodging Suggestions\n\n");
        for candidate in &trip.lodging {
            let rating = candidate
                .rating
                .map(|rating| format!(" — rated {rating:.1}"))
                .unwrap_or_default();
            let vicinity = candidate
                .vicinity
                .as_deref()
                .map(|vicinity| format!(" ({vicinity})"))
                .unwrap_or_default();
            let _ = writeln!(out, "- **{}**{rating}{vicinity}", candidate.name);
        }
        out.push('\n');
    }

    if !plan.local_food_suggestions.is_empty() {
        out.push_str("## Local Foods to Try\n\n");
        for food in &plan.local_food_suggestions {
            let _ = writeln!(out, "- {food}");
        }
        out.push('\n');
    }

    if !plan.safety_tips.is_empty() {
        out.push_str("## Safety & Cultural Notes\n\n");
        let _ = writeln!(out, "{}", plan.safety_tips);
    }

    out
}
