use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::Units;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Current conditions for a city, as returned by the weather API.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub name: String,
    pub sys: SysInfo,
    pub weather: Vec<ConditionInfo>,
    pub main: Measurements,
}

impl CurrentWeather {
    /// The primary condition description, e.g. "scattered clouds".
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|w| w.description.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SysInfo {
    pub country: String,
    /// Unix timestamps, UTC.
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionInfo {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Measurements {
    pub temp: f64,
    pub humidity: f64,
}

/// 5-day forecast in 3-hour slots.
#[derive(Debug, Clone, Deserialize)]
pub struct Forecast {
    pub list: Vec<ForecastSlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSlot {
    pub dt_txt: String,
    pub main: Measurements,
}

/// One point per forecast day.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub date: String,
    pub temp: f64,
}

/// Sample the 3-hourly forecast down to one point per day
/// (every 8th slot, matching the API's 8 slots per day).
pub fn daily_series(forecast: &Forecast) -> Vec<ForecastPoint> {
    forecast
        .list
        .iter()
        .step_by(8)
        .map(|slot| ForecastPoint {
            date: slot
                .dt_txt
                .split_whitespace()
                .next()
                .unwrap_or(slot.dt_txt.as_str())
                .to_string(),
            temp: slot.main.temp,
        })
        .collect()
}

/// Format a Unix timestamp as a UTC wall-clock time.
pub fn format_unix_time(secs: i64) -> String {
    match chrono::DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "??:??:??".to_string(),
    }
}

/// Blocking client for the OpenWeatherMap API.
///
/// An unknown city (any non-success status) is `Ok(None)` so callers can
/// report "not found" per city; transport failures propagate as errors.
pub struct WeatherClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch current conditions for a city.
    pub fn current(&self, city: &str, units: Units) -> Result<Option<CurrentWeather>> {
        self.get("weather", city, units)
    }

    /// Fetch the 5-day / 3-hour forecast for a city.
    pub fn forecast(&self, city: &str, units: Units) -> Result<Option<Forecast>> {
        self.get("forecast", city, units)
    }

    fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
        units: Units,
    ) -> Result<Option<T>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", units.as_str()),
            ])
            .send()
            .with_context(|| format!("Weather API request failed for city '{}'", city))?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let payload = response
            .json()
            .with_context(|| format!("Malformed weather API response for city '{}'", city))?;
        Ok(Some(payload))
    }
}
