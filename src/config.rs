use std::env;

use crate::error::{PlannerError, Result};

/// Process-wide credentials, loaded once at startup. A missing key is a
/// fatal configuration error, never a per-request failure.
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    pub gemini_api_key: String,
    pub maps_api_key: String,
    pub weather_api_key: String,
}

impl PlannerConfig {
    pub fn new(
        gemini_api_key: impl Into<String>,
        maps_api_key: impl Into<String>,
        weather_api_key: impl Into<String>,
    ) -> Self {
        Self {
            gemini_api_key: gemini_api_key.into(),
            maps_api_key: maps_api_key.into(),
            weather_api_key: weather_api_key.into(),
        }
    }

    /// Build the config from `GEMINI_API_KEY`, `GOOGLE_MAPS_API_KEY` and
    /// `OPENWEATHER_API_KEY` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            gemini_api_key: require_var("GEMINI_API_KEY")?,
            maps_api_key: require_var("GOOGLE_MAPS_API_KEY")?,
            weather_api_key: require_var("OPENWEATHER_API_KEY")?,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    env::var(name)
        .map_err(|_| PlannerError::Config(format!("Missing {name} environment variable")))
}
