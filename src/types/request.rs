use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Spending level the plan should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum BudgetTier {
    Budget,
    MidRange,
    Luxury,
}

impl BudgetTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Budget => "Budget",
            BudgetTier::MidRange => "Mid-range",
            BudgetTier::Luxury => "Luxury",
        }
    }
}

/// Overall tone of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TravelStyle {
    Relaxing,
    Adventure,
    Cultural,
    Foodie,
    Family,
}

impl TravelStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelStyle::Relaxing => "Relaxing",
            TravelStyle::Adventure => "Adventure",
            TravelStyle::Cultural => "Cultural",
            TravelStyle::Foodie => "Foodie",
            TravelStyle::Family => "Family",
        }
    }
}

/// Everything the traveler tells us before generation. Created once per
/// request and never mutated by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    /// Free-text destination, e.g. "Kyoto" or "Portugal"
    pub destination: String,
    /// Trip length in days, at least 1
    pub duration_days: u32,
    pub start_date: NaiveDate,
    pub budget: BudgetTier,
    pub travel_style: TravelStyle,
    /// Interest tags, e.g. "History", "Cuisine"
    pub interests: Vec<String>,
    /// Dietary tags, e.g. "Vegetarian", "Gluten-Free"
    pub dietary_needs: Vec<String>,
    /// Free-text special requirements passed through to the model
    pub special_requirements: Option<String>,
}

impl TripRequest {
    pub fn new(destination: impl Into<String>, duration_days: u32, start_date: NaiveDate) -> Self {
        Self {
            destination: destination.into(),
            duration_days,
            start_date,
            budget: BudgetTier::MidRange,
            travel_style: TravelStyle::Cultural,
            interests: Vec::new(),
            dietary_needs: Vec::new(),
            special_requirements: None,
        }
    }

    pub fn with_budget(mut self, budget: BudgetTier) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_travel_style(mut self, style: TravelStyle) -> Self {
        self.travel_style = style;
        self
    }

    pub fn with_interests(mut self, interests: Vec<String>) -> Self {
        self.interests = interests;
        self
    }

    pub fn with_dietary_needs(mut self, dietary_needs: Vec<String>) -> Self {
        self.dietary_needs = dietary_needs;
        self
    }

    pub fn with_special_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.special_requirements = Some(requirements.into());
        self
    }
}
