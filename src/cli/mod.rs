use std::fs;

use chrono::{Duration, Local, NaiveDate};
use clap::{Arg, Command};
use tracing::{error, info};

use crate::{
    export::render_markdown,
    services::GeminiClient,
    types::{BudgetTier, TravelStyle, TripRequest},
    EnrichmentOrchestrator, ItineraryGenerator, PlannerConfig,
};

/// CLI entry point for the odyssey binary
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("odyssey")
        .version("0.1.0")
        .about("AI travel planner: generate an itinerary and enrich it with places, routes, weather, and lodging")
        .arg(
            Arg::new("destination")
                .help("Destination country or city, e.g. \"Kyoto\"")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("days")
                .short('d')
                .long("days")
                .value_name("COUNT")
                .help("Trip duration in days")
                .default_value("5"),
        )
        .arg(
            Arg::new("start-date")
                .short('s')
                .long("start-date")
                .value_name("YYYY-MM-DD")
                .help("Trip start date (defaults to two weeks from today)"),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("TIER")
                .help("Budget tier: budget, mid-range, or luxury")
                .default_value("mid-range"),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .value_name("STYLE")
                .help("Travel style: relaxing, adventure, cultural, foodie, or family")
                .default_value("cultural"),
        )
        .arg(
            Arg::new("interests")
                .short('i')
                .long("interests")
                .value_name("TAGS")
                .help("Comma-separated interest tags, e.g. \"History,Cuisine\""),
        )
        .arg(
            Arg::new("dietary")
                .long("dietary")
                .value_name("TAGS")
                .help("Comma-separated dietary needs, e.g. \"Vegetarian\""),
        )
        .arg(
            Arg::new("requirements")
                .long("requirements")
                .value_name("TEXT")
                .help("Free-text special requirements passed to the model"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Gemini model name")
                .default_value("gemini-1.5-pro-latest"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the markdown itinerary to a file instead of stdout"),
        )
        .get_matches();

    // Credentials are fatal at startup, never per request.
    let config = PlannerConfig::from_env()?;

    let days: u32 = matches.get_one::<String>("days").unwrap().parse()?;
    let start_date = match matches.get_one::<String>("start-date") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
        None => Local::now().date_naive() + Duration::days(14),
    };
    let budget = parse_budget(matches.get_one::<String>("budget").unwrap())?;
    let style = parse_style(matches.get_one::<String>("style").unwrap())?;

    let mut request = TripRequest::new(
        matches.get_one::<String>("destination").unwrap().clone(),
        days,
        start_date,
    )
    .with_budget(budget)
    .with_travel_style(style)
    .with_interests(parse_tags(matches.get_one::<String>("interests")))
    .with_dietary_needs(parse_tags(matches.get_one::<String>("dietary")));
    if let Some(requirements) = matches.get_one::<String>("requirements") {
        request = request.with_special_requirements(requirements.clone());
    }

    let model = GeminiClient::new(&config.gemini_api_key)
        .with_model(matches.get_one::<String>("model").unwrap().as_str());
    let generator = ItineraryGenerator::new(model);
    let orchestrator = EnrichmentOrchestrator::new(&config);

    info!(destination = %request.destination, days, "generating itinerary");
    let plan = match generator.generate(&request).await {
        Ok(plan) => plan,
        Err(err) => {
            error!("itinerary generation failed: {err}");
            return Err(err.into());
        }
    };

    info!("enriching itinerary with places, routes, weather, and lodging");
    let trip = orchestrator.enrich(plan, &request).await;
    let markdown = render_markdown(&trip);

    match matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, markdown)?;
            info!("itinerary written to {path}");
        }
        None => println!("{markdown}"),
    }

    Ok(())
}

fn parse_budget(raw: &str) -> Result<BudgetTier, String> {
    match raw.to_ascii_lowercase().as_str() {
        "budget" => Ok(BudgetTier::Budget),
        "mid-range" | "midrange" | "mid" => Ok(BudgetTier::MidRange),
        "luxury" => Ok(BudgetTier::Luxury),
        other => Err(format!("unknown budget tier: {other}")),
    }
}

fn parse_style(raw: &str) -> Result<TravelStyle, String> {
    match raw.to_ascii_lowercase().as_str() {
        "relaxing" => Ok(TravelStyle::Relaxing),
        "adventure" => Ok(TravelStyle::Adventure),
        "cultural" => Ok(TravelStyle::Cultural),
        "foodie" => Ok(TravelStyle::Foodie),
        "family" => Ok(TravelStyle::Family),
        other => Err(format!("unknown travel style: {other}")),
    }
}

fn parse_tags(raw: Option<&String>) -> Vec<String> {
    raw.map(|tags| {
        tags.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
