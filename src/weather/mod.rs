//! Current weather retrieval
//!
//! The overlay only needs one thing from a weather provider: the current
//! temperature and a short description for a coordinate. [`WeatherSource`]
//! is that seam; [`OpenWeatherClient`] is the production implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::projection::GeoCoordinate;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Failure of a single weather request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// The provider rejected our credentials (HTTP 401)
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Any other non-success HTTP status
    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Configuration errors will not go away by asking again
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, WeatherError::InvalidApiKey)
    }
}

/// Weather observed for one city at fetch time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub city: String,
    /// Temperature in whole degrees Celsius
    pub temperature_celsius: i32,
    /// Provider description, e.g. "scattered clouds"
    pub description: String,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSample {
    #[must_use]
    pub fn new(city: impl Into<String>, temperature_celsius: i32, description: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            temperature_celsius,
            description: description.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature_celsius)
    }
}

/// Round a temperature to whole degrees, halves going up
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_temperature(celsius: f64) -> i32 {
    let whole = celsius.floor();
    if celsius - whole >= 0.5 {
        whole as i32 + 1
    } else {
        whole as i32
    }
}

/// Source of current weather samples
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_weather(
        &self,
        city: &str,
        coordinate: GeoCoordinate,
    ) -> Result<WeatherSample, WeatherError>;
}
