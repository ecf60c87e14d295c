//! `globe-weather` - weather markers on a 3D globe
//!
//! This library projects city coordinates onto a globe, fetches current
//! weather for each city, publishes coloured markers into a scene graph and
//! hit-tests pointer positions against them to drive a tooltip.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod marker;
pub mod models;
pub mod overlay;
pub mod picking;
pub mod projection;
pub mod registry;
pub mod scene;
pub mod tooltip;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::GlobeConfig;
pub use error::GlobeError;
pub use marker::{Marker, MarkerSpec, TemperatureClass};
pub use models::City;
pub use overlay::{LoadOutcome, MarkerOverlay};
pub use picking::{Camera, Viewport};
pub use projection::{GeoCoordinate, SurfacePoint, project};
pub use registry::HitTestRegistry;
pub use scene::{Scene, SceneGraph};
pub use tooltip::{Tooltip, TooltipUpdate};
pub use weather::{OpenWeatherClient, WeatherError, WeatherSample, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GlobeError>;
