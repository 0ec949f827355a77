use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{PlannerError, Result};
use crate::types::{Coordinate, WeatherDay};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// One 3-hour forecast sample as the provider returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    /// Timestamp text, "YYYY-MM-DD HH:MM:SS"
    pub dt_txt: String,
    pub main: ForecastMain,
    #[serde(default)]
    pub weather: Vec<ForecastCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastMain {
    /// Degrees Celsius (metric units are requested)
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCondition {
    /// Condition label, e.g. "Clouds"
    pub main: String,
    /// Provider icon code, e.g. "04d"
    pub icon: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

/// Collapse 3-hour samples into one record per calendar date, in
/// first-seen date order, truncated to `max_days`. Temperature is the
/// arithmetic mean of the date's samples; the condition is the most
/// frequent label, ties broken by first appearance.
pub fn aggregate_daily(entries: &[ForecastEntry], max_days: usize) -> Vec<WeatherDay> {
    let mut days: Vec<(NaiveDate, Vec<&ForecastEntry>)> = Vec::new();

    for entry in entries {
        let Some(date_part) = entry.dt_txt.split_whitespace().next() else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
            continue;
        };
        match days.iter_mut().find(|(day, _)| *day == date) {
            Some((_, bucket)) => bucket.push(entry),
            None => days.push((date, vec![entry])),
        }
    }

    days.into_iter()
        .take(max_days)
        .map(|(date, bucket)| {
            let mean = bucket.iter().map(|entry| entry.main.temp).sum::<f64>()
                / bucket.len() as f64;

            // Labels in first-appearance order so ties resolve stably.
            let mut labels: Vec<(&str, usize)> = Vec::new();
            for entry in &bucket {
                let Some(condition) = entry.weather.first() else {
                    continue;
                };
                match labels.iter_mut().find(|(label, _)| *label == condition.main) {
                    Some((_, count)) => *count += 1,
                    None => labels.push((condition.main.as_str(), 1)),
                }
            }

            // Replace only on a strictly greater count: ties keep the
            // first-seen label.
            let mut dominant: Option<(&str, usize)> = None;
            for &(label, count) in &labels {
                if dominant.map_or(true, |(_, best)| count > best) {
                    dominant = Some((label, count));
                }
            }

            let (condition, icon_url) = match dominant {
                Some((dominant, _)) => {
                    let icon = bucket.iter().find_map(|entry| {
                        entry
                            .weather
                            .first()
                            .filter(|condition| condition.main == dominant)
                            .map(|condition| condition.icon.clone())
                    });
                    (
                        dominant.to_string(),
                        icon.map(|icon| format!("{ICON_BASE_URL}/{icon}@2x.png"))
                            .unwrap_or_default(),
                    )
                }
                // Samples without condition data still count as a day.
                None => ("Unknown".to_string(), String::new()),
            };

            WeatherDay {
                date,
                avg_temp_c: (mean * 10.0).round() / 10.0,
                condition,
                icon_url,
            }
        })
        .collect()
}

/// Client for the 3-hour forecast endpoint. The free tier caps the
/// horizon at about five days; longer trips simply get fewer entries.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch and aggregate the forecast for a coordinate, one record per
    /// day, at most `duration_days` records.
    pub async fn forecast(
        &self,
        coordinate: Coordinate,
        duration_days: u32,
    ) -> Result<Vec<WeatherDay>> {
        let url = format!("{}/data/2.5/forecast", self.base_url);
        let lat = coordinate.lat.to_string();
        let lon = coordinate.lon.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::Api {
                provider: "weather",
                message: format!("HTTP {status}"),
            });
        }

        let forecast: ForecastResponse = response.json().await?;
        Ok(aggregate_daily(&forecast.list, duration_days as usize))
    }
}
