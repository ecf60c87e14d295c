//! Configuration management for the globe weather overlay
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::GlobeError;
use crate::models::City;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Key shipped in the default configuration; requests made with it fail with 401
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobeConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Globe geometry
    #[serde(default)]
    pub globe: GeometryConfig,
    /// Camera placement and projection
    #[serde(default)]
    pub camera: CameraConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP surface
    #[serde(default)]
    pub server: ServerConfig,
    /// Cities to place markers for, in request order
    #[serde(default = "default_cities")]
    pub cities: Vec<City>,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Unit system requested from the API
    #[serde(default = "default_units")]
    pub units: String,
    /// Request timeout in seconds, none by default
    #[serde(default)]
    pub timeout_seconds: Option<u32>,
}

/// Globe geometry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Radius of the earth sphere
    #[serde(default = "default_globe_radius")]
    pub radius: f64,
    /// Height of markers above the earth surface
    #[serde(default = "default_marker_altitude")]
    pub marker_altitude: f64,
}

/// Perspective camera settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_degrees: f64,
    /// Distance of the camera from the globe centre
    #[serde(default = "default_camera_distance")]
    pub distance: f64,
    /// Closest the orbit camera may zoom in
    #[serde(default = "default_min_distance")]
    pub min_distance: f64,
    /// Farthest the orbit camera may zoom out
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,
    #[serde(default = "default_near")]
    pub near: f64,
    #[serde(default = "default_far")]
    pub far: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for everything outside `/api`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

// Default value functions
fn default_api_key() -> String {
    API_KEY_PLACEHOLDER.to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_globe_radius() -> f64 {
    2.0
}

fn default_marker_altitude() -> f64 {
    0.05
}

fn default_fov() -> f64 {
    75.0
}

fn default_camera_distance() -> f64 {
    4.5
}

fn default_min_distance() -> f64 {
    2.5
}

fn default_max_distance() -> f64 {
    10.0
}

fn default_near() -> f64 {
    0.1
}

fn default_far() -> f64 {
    1000.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_cities() -> Vec<City> {
    vec![
        City::new("Pune", 18.5204, 73.8567),
        City::new("London", 51.5074, -0.1278),
        City::new("New York", 40.7128, -74.0060),
        City::new("Tokyo", 35.6895, 139.6917),
        City::new("Sydney", -33.8688, 151.2093),
        City::new("Cairo", 30.0444, 31.2357),
        City::new("Moscow", 55.7558, 37.6173),
        City::new("Rio de Janeiro", -22.9068, -43.1729),
    ]
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            globe: GeometryConfig::default(),
            camera: CameraConfig::default(),
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
            cities: default_cities(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_weather_base_url(),
            units: default_units(),
            timeout_seconds: None,
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            radius: default_globe_radius(),
            marker_altitude: default_marker_altitude(),
        }
    }
}

impl GeometryConfig {
    /// Distance of marker centres from the globe centre
    #[must_use]
    pub fn marker_radius(&self) -> f64 {
        self.radius + self.marker_altitude
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            distance: default_camera_distance(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            near: default_near(),
            far: default_far(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl GlobeConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // GLOBE_WEATHER_WEATHER__API_KEY=... overrides weather.api_key
        builder = builder.add_source(
            Environment::with_prefix("GLOBE_WEATHER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GlobeConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("globe-weather").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.units.is_empty() {
            self.weather.units = default_units();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_geometry()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the API key
    pub fn validate_api_key(&self) -> Result<()> {
        if self.weather.api_key.trim().is_empty() {
            return Err(GlobeError::config(
                "Weather API key cannot be empty. Set weather.api_key or GLOBE_WEATHER_WEATHER__API_KEY.",
            )
            .into());
        }
        Ok(())
    }

    /// Validate globe and camera geometry
    fn validate_geometry(&self) -> Result<()> {
        if self.globe.radius <= 0.0 {
            return Err(GlobeError::config("Globe radius must be positive").into());
        }

        if self.globe.marker_altitude < 0.0 {
            return Err(GlobeError::config("Marker altitude cannot be negative").into());
        }

        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(
                GlobeError::config("Camera field of view must be between 0 and 180 degrees").into(),
            );
        }

        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return Err(GlobeError::config(
                "Camera clip planes must satisfy 0 < near < far",
            )
            .into());
        }

        if self.camera.distance <= self.globe.marker_radius() {
            return Err(GlobeError::config(
                "Camera must be placed outside the marker shell",
            )
            .into());
        }

        if self.camera.min_distance <= self.globe.marker_radius() {
            return Err(GlobeError::config(
                "Camera minimum distance must keep the camera outside the marker shell",
            )
            .into());
        }

        if !(self.camera.min_distance..=self.camera.max_distance).contains(&self.camera.distance) {
            return Err(GlobeError::config(
                "Camera distance must lie between min_distance and max_distance",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GlobeError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GlobeError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(GlobeError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GlobeConfig::default();
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.weather.units, "metric");
        assert_eq!(config.weather.api_key, API_KEY_PLACEHOLDER);
        assert!(config.weather.timeout_seconds.is_none());
        assert!((config.globe.marker_radius() - 2.05).abs() < 1e-12);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.min_distance, 2.5);
        assert_eq!(config.camera.max_distance, 10.0);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cities.len(), 8);
        assert_eq!(config.cities[0].name, "Pune");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = GlobeConfig::default();
        config.weather.api_key = "   ".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key cannot be empty"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = GlobeConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_geometry() {
        let mut config = GlobeConfig::default();
        config.camera.distance = 2.0;
        assert!(config.validate().unwrap_err().to_string().contains("outside the marker shell"));

        let mut config = GlobeConfig::default();
        config.camera.far = 0.05;
        assert!(config.validate().unwrap_err().to_string().contains("clip planes"));

        let mut config = GlobeConfig::default();
        config.globe.radius = 0.0;
        assert!(config.validate().is_err());

        let mut config = GlobeConfig::default();
        config.camera.max_distance = 4.0;
        assert!(config.validate().unwrap_err().to_string().contains("min_distance and max_distance"));

        let mut config = GlobeConfig::default();
        config.camera.min_distance = 2.0;
        assert!(config.validate().unwrap_err().to_string().contains("minimum distance"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("globe-weather-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[weather]
api_key = "abc123def456"
timeout_seconds = 15

[globe]
radius = 3.0

[[cities]]
name = "Reykjavik"
latitude = 64.1466
longitude = -21.9426
"#
        )
        .unwrap();

        let config = GlobeConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.weather.api_key, "abc123def456");
        assert_eq!(config.weather.timeout_seconds, Some(15));
        assert_eq!(config.weather.units, "metric");
        assert_eq!(config.globe.radius, 3.0);
        assert_eq!(config.globe.marker_altitude, 0.05);
        assert_eq!(config.cities.len(), 1);
        assert_eq!(config.cities[0].name, "Reykjavik");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = GlobeConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("globe-weather"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
