use async_trait::async_trait;
use chrono::NaiveDate;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use odyssey_planner::{
    clients::{DirectionsClient, GeocodingClient, PlacesClient, TravelMode, WeatherClient},
    services::{GeminiClient, GenerativeModel},
    Activity, Coordinate, Day, EnrichmentOrchestrator, ItineraryGenerator, PlaceResolution,
    PlannerError, TimeOfDay, TripPlan, TripRequest,
};

const REFERENCE_POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

fn trip_request() -> TripRequest {
    TripRequest::new("Kyoto", 2, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap())
        .with_interests(vec!["History".to_string()])
}

fn activity(time_of_day: TimeOfDay, poi_name: &str) -> Activity {
    Activity {
        time_of_day,
        poi_name: poi_name.to_string(),
        category: None,
        description: format!("Visit {poi_name}."),
        estimated_duration_mins: Some(90),
        details: None,
        travel_from_previous: None,
    }
}

fn two_day_plan() -> TripPlan {
    TripPlan {
        trip_title: "Kyoto in Two Days".to_string(),
        summary: "Temples and tea houses.".to_string(),
        itinerary: vec![
            Day {
                day: 1,
                theme: "Old Kyoto".to_string(),
                activities: vec![
                    activity(TimeOfDay::Morning, "Fushimi Inari Taisha"),
                    activity(TimeOfDay::Afternoon, "Nishiki Market"),
                    activity(TimeOfDay::Evening, "Gion District"),
                ],
            },
            Day {
                day: 2,
                theme: "Zen and Gardens".to_string(),
                activities: vec![
                    activity(TimeOfDay::Morning, "Kinkaku-ji"),
                    activity(TimeOfDay::Afternoon, "Hidden Teahouse"),
                    activity(TimeOfDay::Evening, "Pontocho Alley"),
                ],
            },
        ],
        local_food_suggestions: vec!["Yudofu".to_string()],
        safety_tips: "Mind temple etiquette.".to_string(),
    }
}

async fn mock_text_search(server: &mut ServerGuard, poi: &str, place_id: Option<&str>) {
    let body = match place_id {
        Some(place_id) => json!({ "status": "OK", "results": [{ "place_id": place_id }] }),
        None => json!({ "status": "ZERO_RESULTS", "results": [] }),
    };
    server
        .mock("GET", "/place/textsearch/json")
        .match_query(Matcher::UrlEncoded(
            "query".to_string(),
            format!("{poi} in Kyoto"),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;
}

async fn mock_details(server: &mut ServerGuard, place_id: &str, name: &str, lat: f64, lon: f64) {
    let body = json!({
        "result": {
            "name": name,
            "rating": 4.5,
            "formatted_address": format!("{name}, Kyoto"),
            "geometry": { "location": { "lat": lat, "lng": lon } },
            "photos": [{ "photo_reference": format!("ref-{place_id}") }],
            "website": "https://example.com",
            "url": "https://maps.example.com"
        }
    });
    server
        .mock("GET", "/place/details/json")
        .match_query(Matcher::UrlEncoded("place_id".to_string(), place_id.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;
}

#[tokio::test]
async fn places_client_resolves_a_poi_with_photos() {
    let mut server = Server::new_async().await;
    mock_text_search(&mut server, "Fushimi Inari Taisha", Some("pid-1")).await;
    mock_details(&mut server, "pid-1", "Fushimi Inari Taisha", 34.9671, 135.7727).await;

    let client = PlacesClient::new("test-key").with_base_url(server.url());
    let details = client
        .find_place("Fushimi Inari Taisha", "Kyoto")
        .await
        .unwrap()
        .expect("place should resolve");

    assert_eq!(details.name, "Fushimi Inari Taisha");
    assert_eq!(details.rating, Some(4.5));
    assert_eq!(details.coordinate, Some(Coordinate::new(34.9671, 135.7727)));
    assert_eq!(details.photos.len(), 1);
    assert!(details.photos[0].contains("photoreference=ref-pid-1"));
}

#[tokio::test]
async fn places_client_falls_back_to_a_placeholder_photo() {
    let mut server = Server::new_async().await;
    mock_text_search(&mut server, "Obscure Shrine", Some("pid-2")).await;
    server
        .mock("GET", "/place/details/json")
        .match_query(Matcher::UrlEncoded("place_id".to_string(), "pid-2".to_string()))
        .with_status(200)
        .with_body(json!({ "result": { "name": "Obscure Shrine" } }).to_string())
        .create_async()
        .await;

    let client = PlacesClient::new("test-key").with_base_url(server.url());
    let details = client
        .find_place("Obscure Shrine", "Kyoto")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(details.photos.len(), 1);
    assert!(details.photos[0].contains("placehold.co"));
    assert_eq!(details.rating, None);
    assert_eq!(details.coordinate, None);
}

#[tokio::test]
async fn places_client_reports_no_results_as_absence() {
    let mut server = Server::new_async().await;
    mock_text_search(&mut server, "Nowhere", None).await;

    let client = PlacesClient::new("test-key").with_base_url(server.url());
    assert!(client.find_place("Nowhere", "Kyoto").await.unwrap().is_none());
}

#[tokio::test]
async fn geocoding_client_locates_a_destination() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/geocode/json")
        .match_query(Matcher::UrlEncoded("address".to_string(), "Kyoto".to_string()))
        .with_status(200)
        .with_body(
            json!({
                "status": "OK",
                "results": [{ "geometry": { "location": { "lat": 35.0116, "lng": 135.7681 } } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = GeocodingClient::new("test-key").with_base_url(server.url());
    let center = client.locate("Kyoto").await.unwrap();
    assert_eq!(center, Some(Coordinate::new(35.0116, 135.7681)));
}

#[tokio::test]
async fn geocoding_client_reports_zero_results_as_absence() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/geocode/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "status": "ZERO_RESULTS", "results": [] }).to_string())
        .create_async()
        .await;

    let client = GeocodingClient::new("test-key").with_base_url(server.url());
    assert!(client.locate("Atlantis").await.unwrap().is_none());
}

#[tokio::test]
async fn directions_client_decodes_the_overview_polyline() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/directions/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "status": "OK",
                "routes": [{
                    "legs": [{ "duration": { "text": "23 mins" } }],
                    "overview_polyline": { "points": REFERENCE_POLYLINE }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = DirectionsClient::new("test-key").with_base_url(server.url());
    let route = client
        .route(
            Coordinate::new(38.5, -120.2),
            Coordinate::new(43.252, -126.453),
            TravelMode::Transit,
        )
        .await
        .unwrap()
        .expect("route should exist");

    assert_eq!(route.duration_text, "23 mins");
    assert_eq!(route.path.len(), 3);
    assert_eq!(route.path[0], Coordinate::new(38.5, -120.2));
}

#[tokio::test]
async fn directions_client_reports_unroutable_pairs_as_absence() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/directions/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "status": "ZERO_RESULTS", "routes": [] }).to_string())
        .create_async()
        .await;

    let client = DirectionsClient::new("test-key").with_base_url(server.url());
    let route = client
        .route(
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 1.0),
            TravelMode::Transit,
        )
        .await
        .unwrap();
    assert!(route.is_none());
}

#[tokio::test]
async fn weather_client_aggregates_and_truncates_to_the_trip_duration() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/data/2.5/forecast")
        .match_query(Matcher::UrlEncoded("units".to_string(), "metric".to_string()))
        .with_status(200)
        .with_body(
            json!({
                "list": [
                    { "dt_txt": "2025-04-01 09:00:00", "main": { "temp": 12.0 },
                      "weather": [{ "main": "Clear", "icon": "01d" }] },
                    { "dt_txt": "2025-04-01 12:00:00", "main": { "temp": 16.0 },
                      "weather": [{ "main": "Clear", "icon": "01d" }] },
                    { "dt_txt": "2025-04-02 09:00:00", "main": { "temp": 10.0 },
                      "weather": [{ "main": "Rain", "icon": "10d" }] },
                    { "dt_txt": "2025-04-03 09:00:00", "main": { "temp": 11.0 },
                      "weather": [{ "main": "Clouds", "icon": "03d" }] }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = WeatherClient::new("test-key").with_base_url(server.url());
    let days = client
        .forecast(Coordinate::new(35.0116, 135.7681), 2)
        .await
        .unwrap();

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].avg_temp_c, 14.0);
    assert_eq!(days[0].condition, "Clear");
    assert_eq!(days[1].condition, "Rain");
}

#[tokio::test]
async fn gemini_client_extracts_candidate_text() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/models/gemini-test:generateContent")
        .match_query(Matcher::UrlEncoded("key".to_string(), "test-key".to_string()))
        .with_status(200)
        .with_body(
            json!({
                "candidates": [{ "content": { "parts": [{ "text": "hello traveler" }] } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = GeminiClient::new("test-key")
        .with_base_url(server.url())
        .with_model("gemini-test");
    let text = client.generate("say hi").await.unwrap();
    assert_eq!(text, "hello traveler");
}

#[tokio::test]
async fn gemini_client_surfaces_provider_errors() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/models/gemini-test:generateContent")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(json!({ "error": { "message": "API key not valid" } }).to_string())
        .create_async()
        .await;

    let client = GeminiClient::new("bad-key")
        .with_base_url(server.url())
        .with_model("gemini-test");
    let err = client.generate("say hi").await.unwrap_err();
    assert_eq!(err.error_code(), "MODEL_ERROR");
    assert!(err.to_string().contains("API key not valid"));
}

/// Stub model returning a canned reply, for driving the generator
/// without a network.
struct StubModel {
    reply: String,
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn generate(&self, _prompt: &str) -> odyssey_planner::Result<String> {
        Ok(self.reply.clone())
    }
}

fn plan_as_fenced_json(plan: &TripPlan) -> String {
    let envelope = json!({ "trip": plan });
    format!("```json\n{}\n```", envelope)
}

#[tokio::test]
async fn generator_parses_a_fenced_model_reply() {
    let stub = StubModel {
        reply: plan_as_fenced_json(&two_day_plan()),
    };
    let plan = ItineraryGenerator::new(stub)
        .generate(&trip_request())
        .await
        .unwrap();

    assert_eq!(plan.itinerary.len(), 2);
    assert_eq!(plan.itinerary[0].theme, "Old Kyoto");
    assert_eq!(
        plan.itinerary[1].activities[2].poi_name,
        "Pontocho Alley"
    );
}

#[tokio::test]
async fn generator_rejects_malformed_replies_without_a_partial_plan() {
    let stub = StubModel {
        reply: "Sure! Here is your itinerary: Day 1 ...".to_string(),
    };
    let err = ItineraryGenerator::new(stub)
        .generate(&trip_request())
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::Parse { .. }));
}

#[tokio::test]
async fn generator_tolerates_a_day_count_mismatch() {
    // Three generated days against a two-day request parse fine; the
    // mismatch is logged, not fatal.
    let mut plan = two_day_plan();
    plan.itinerary.push(Day {
        day: 3,
        theme: "Departure".to_string(),
        activities: vec![activity(TimeOfDay::Morning, "Kyoto Station")],
    });
    let stub = StubModel {
        reply: plan_as_fenced_json(&plan),
    };
    let parsed = ItineraryGenerator::new(stub)
        .generate(&trip_request())
        .await
        .unwrap();
    assert_eq!(parsed.itinerary.len(), 3);
}

async fn mock_enrichment_backends(server: &mut ServerGuard) {
    // Every POI except "Hidden Teahouse" resolves.
    let pois: [(&str, &str, f64, f64); 5] = [
        ("Fushimi Inari Taisha", "pid-1", 34.9671, 135.7727),
        ("Nishiki Market", "pid-2", 35.0050, 135.7649),
        ("Gion District", "pid-3", 35.0037, 135.7752),
        ("Kinkaku-ji", "pid-4", 35.0394, 135.7292),
        ("Pontocho Alley", "pid-5", 35.0094, 135.7707),
    ];
    for (poi, place_id, lat, lon) in pois {
        mock_text_search(server, poi, Some(place_id)).await;
        mock_details(server, place_id, poi, lat, lon).await;
    }
    mock_text_search(server, "Hidden Teahouse", None).await;

    server
        .mock("GET", "/geocode/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "status": "OK",
                "results": [{ "geometry": { "location": { "lat": 35.0116, "lng": 135.7681 } } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    server
        .mock("GET", "/directions/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "status": "OK",
                "routes": [{
                    "legs": [{ "duration": { "text": "12 mins" } }],
                    "overview_polyline": { "points": REFERENCE_POLYLINE }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    server
        .mock("GET", "/data/2.5/forecast")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "list": [
                    { "dt_txt": "2025-04-01 09:00:00", "main": { "temp": 12.0 },
                      "weather": [{ "main": "Clear", "icon": "01d" }] },
                    { "dt_txt": "2025-04-02 09:00:00", "main": { "temp": 10.0 },
                      "weather": [{ "main": "Rain", "icon": "10d" }] },
                    { "dt_txt": "2025-04-03 09:00:00", "main": { "temp": 11.0 },
                      "weather": [{ "main": "Clouds", "icon": "03d" }] }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    server
        .mock("GET", "/place/nearbysearch/json")
        .match_query(Matcher::UrlEncoded("type".to_string(), "lodging".to_string()))
        .with_status(200)
        .with_body(
            json!({
                "results": [
                    { "name": "Hotel Gion", "rating": 4.3, "vicinity": "Higashiyama Ward" },
                    { "name": "Kyoto Inn", "rating": 4.0, "vicinity": "Nakagyo Ward" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
}

fn orchestrator_for(server: &ServerGuard) -> EnrichmentOrchestrator {
    EnrichmentOrchestrator::with_clients(
        PlacesClient::new("maps-key").with_base_url(server.url()),
        DirectionsClient::new("maps-key").with_base_url(server.url()),
        GeocodingClient::new("maps-key").with_base_url(server.url()),
        WeatherClient::new("weather-key").with_base_url(server.url()),
    )
}

#[tokio::test]
async fn enrichment_degrades_only_the_failing_activity() {
    let mut server = Server::new_async().await;
    mock_enrichment_backends(&mut server).await;

    let trip = orchestrator_for(&server)
        .enrich(two_day_plan(), &trip_request())
        .await;

    let mut unresolved = Vec::new();
    for day in &trip.plan.itinerary {
        for activity in &day.activities {
            match activity.details.as_ref().expect("every activity gets a resolution") {
                PlaceResolution::Resolved(details) => {
                    assert!(details.coordinate.is_some());
                }
                PlaceResolution::Unresolved { placeholder_photo } => {
                    assert!(placeholder_photo.contains("placehold.co"));
                    unresolved.push(activity.poi_name.clone());
                }
            }
        }
    }
    assert_eq!(unresolved, vec!["Hidden Teahouse".to_string()]);
}

#[tokio::test]
async fn travel_annotations_require_adjacent_resolved_activities() {
    let mut server = Server::new_async().await;
    mock_enrichment_backends(&mut server).await;

    let trip = orchestrator_for(&server)
        .enrich(two_day_plan(), &trip_request())
        .await;

    let day1 = &trip.plan.itinerary[0];
    assert!(day1.activities[0].travel_from_previous.is_none());
    assert_eq!(
        day1.activities[1].travel_from_previous.as_deref(),
        Some("~ 12 mins by transit")
    );
    assert!(day1.activities[2].travel_from_previous.is_some());

    // Day 2: the unresolved middle activity breaks both adjacencies.
    let day2 = &trip.plan.itinerary[1];
    assert!(day2.activities[0].travel_from_previous.is_none());
    assert!(day2.activities[1].travel_from_previous.is_none());
    assert!(day2.activities[2].travel_from_previous.is_none());

    // Two routed pairs, both on day 1, with decoded paths.
    assert_eq!(trip.routes.len(), 2);
    assert!(trip.routes.iter().all(|route| route.day == 1));
    assert_eq!(trip.routes[0].route.path.len(), 3);
}

#[tokio::test]
async fn enrichment_attaches_weather_lodging_and_map_data() {
    let mut server = Server::new_async().await;
    mock_enrichment_backends(&mut server).await;

    let request = trip_request();
    let trip = orchestrator_for(&server).enrich(two_day_plan(), &request).await;

    assert_eq!(trip.center, Some(Coordinate::new(35.0116, 135.7681)));
    // Weather is capped at the requested duration.
    assert_eq!(trip.weather.len(), 2);
    assert_eq!(trip.weather[0].condition, "Clear");
    assert_eq!(trip.lodging.len(), 2);
    assert_eq!(trip.lodging[0].name, "Hotel Gion");
    // One map point per resolved activity, tagged with its day.
    assert_eq!(trip.map_points.len(), 5);
    assert_eq!(
        trip.map_points.iter().filter(|point| point.day == 2).count(),
        2
    );
}

#[tokio::test]
async fn enrichment_survives_total_backend_failure() {
    // A server with no mocks set up answers 501 to everything; every
    // lookup degrades and the plan still comes back whole.
    let server = Server::new_async().await;

    let trip = orchestrator_for(&server)
        .enrich(two_day_plan(), &trip_request())
        .await;

    assert_eq!(trip.plan.itinerary.len(), 2);
    assert!(trip.center.is_none());
    assert!(trip.map_points.is_empty());
    assert!(trip.routes.is_empty());
    assert!(trip.weather.is_empty());
    assert!(trip.lodging.is_empty());
    for day in &trip.plan.itinerary {
        for activity in &day.activities {
            assert!(matches!(
                activity.details,
                Some(PlaceResolution::Unresolved { .. })
            ));
        }
    }
}

#[tokio::test]
async fn end_to_end_kyoto_two_day_scenario() {
    let mut server = Server::new_async().await;
    mock_enrichment_backends(&mut server).await;

    let request = trip_request();
    let stub = StubModel {
        reply: plan_as_fenced_json(&two_day_plan()),
    };

    let plan = ItineraryGenerator::new(stub).generate(&request).await.unwrap();
    assert_eq!(plan.itinerary.len(), 2);

    let trip = orchestrator_for(&server).enrich(plan, &request).await;
    assert!(trip.weather.len() <= 2);

    let markdown = odyssey_planner::render_markdown(&trip);
    assert!(markdown.contains("# Kyoto in Two Days"));
    assert!(markdown.contains("## Day 2: Zen and Gardens"));
    assert!(markdown.contains("Hotel Gion"));
}
