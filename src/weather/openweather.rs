//! OpenWeatherMap current weather client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::{WeatherError, WeatherSample, WeatherSource, round_temperature};
use crate::GlobeError;
use crate::config::WeatherConfig;
use crate::projection::GeoCoordinate;

/// Response body of `GET /weather`, reduced to the fields we read
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub main: MainReadings,
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub description: String,
}

impl CurrentWeatherResponse {
    /// Convert into a sample for `city`
    pub fn into_sample(self, city: &str) -> Result<WeatherSample, WeatherError> {
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|condition| condition.description)
            .ok_or_else(|| WeatherError::Parse("response has no weather conditions".to_string()))?;

        Ok(WeatherSample::new(
            city,
            round_temperature(self.main.temp),
            description,
        ))
    }
}

/// Map an HTTP status onto the weather error taxonomy
pub fn check_status(status: StatusCode, body: &str) -> Result<(), WeatherError> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::UNAUTHORIZED => Err(WeatherError::InvalidApiKey),
        _ => Err(WeatherError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        }),
    }
}

/// Transport failure without the request URL, whose query carries the API key
fn network_error(err: reqwest::Error) -> WeatherError {
    WeatherError::Network(err.without_url().to_string())
}

/// OpenWeatherMap API client
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    units: String,
}

impl OpenWeatherClient {
    /// Create a new client from the weather configuration
    pub fn new(config: &WeatherConfig) -> Result<Self, GlobeError> {
        let mut builder = Client::builder().user_agent(concat!("globe-weather/", env!("CARGO_PKG_VERSION")));
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds.into()));
        }
        let client = builder
            .build()
            .map_err(|e| GlobeError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            units: config.units.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/weather", self.base_url)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn fetch_weather(
        &self,
        city: &str,
        coordinate: GeoCoordinate,
    ) -> Result<WeatherSample, WeatherError> {
        debug!("Requesting current weather for {city}");
        let start_time = Instant::now();

        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("units", self.units.clone()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(network_error)?;

        // 401 is decided on the status line alone
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(WeatherError::InvalidApiKey);
        }

        let body = response.text().await;
        if !status.is_success() {
            check_status(status, body.as_deref().unwrap_or_default())?;
        }
        let body = body.map_err(network_error)?;

        let parsed: CurrentWeatherResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("Invalid weather response: {e}")))?;
        let sample = parsed.into_sample(city)?;

        let total_duration = start_time.elapsed();
        info!(
            "Weather for {city}: {} ({}) in {:.3}s",
            sample.format_temperature(),
            sample.description,
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!("Slow weather response for {city}: {:.3}s", total_duration.as_secs_f64());
        }

        Ok(sample)
    }
}
