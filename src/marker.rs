//! Weather markers and the temperature colour rule

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::projection::{GeoCoordinate, SurfacePoint, project_coordinate};
use crate::scene::NodeHandle;
use crate::weather::WeatherSample;

/// Radius of the marker sphere, in globe units
pub const MARKER_RADIUS: f64 = 0.04;
/// Emissive intensity of the marker material
pub const MARKER_GLOW_INTENSITY: f64 = 2.0;

/// Temperature band used to colour a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureClass {
    Hot,
    Cold,
    Temperate,
}

impl TemperatureClass {
    /// Classify a temperature; the first matching band wins
    #[must_use]
    pub fn classify(temperature_celsius: i32) -> Self {
        match temperature_celsius {
            t if t > 30 => TemperatureClass::Hot,
            t if t < 10 => TemperatureClass::Cold,
            _ => TemperatureClass::Temperate,
        }
    }

    #[must_use]
    pub fn color(self) -> Color {
        match self {
            TemperatureClass::Hot => Color(0x00ff_4500),
            TemperatureClass::Cold => Color(0x001e_90ff),
            TemperatureClass::Temperate => Color(0x0032_cd32),
        }
    }
}

/// 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.0.to_be_bytes();
        (r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Visual description of a marker, before it is placed in a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub position: SurfacePoint,
    pub coordinate: GeoCoordinate,
    pub sample: WeatherSample,
    pub class: TemperatureClass,
    pub color: Color,
    pub radius: f64,
    pub glow_intensity: f64,
}

impl MarkerSpec {
    /// Build the marker for `sample`, placed `surface_radius` from the
    /// globe centre
    #[must_use]
    pub fn new(coordinate: GeoCoordinate, sample: WeatherSample, surface_radius: f64) -> Self {
        let class = TemperatureClass::classify(sample.temperature_celsius);
        Self {
            position: project_coordinate(coordinate, surface_radius),
            coordinate,
            sample,
            class,
            color: class.color(),
            radius: MARKER_RADIUS,
            glow_intensity: MARKER_GLOW_INTENSITY,
        }
    }
}

/// A marker that has been published to the scene and the hit-test registry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    #[serde(flatten)]
    pub spec: MarkerSpec,
    pub node: NodeHandle,
}

impl Marker {
    #[must_use]
    pub fn city(&self) -> &str {
        &self.spec.sample.city
    }

    #[must_use]
    pub fn sample(&self) -> &WeatherSample {
        &self.spec.sample
    }

    #[must_use]
    pub fn position(&self) -> SurfacePoint {
        self.spec.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(31, TemperatureClass::Hot)]
    #[case(45, TemperatureClass::Hot)]
    #[case(30, TemperatureClass::Temperate)]
    #[case(20, TemperatureClass::Temperate)]
    #[case(10, TemperatureClass::Temperate)]
    #[case(9, TemperatureClass::Cold)]
    #[case(-15, TemperatureClass::Cold)]
    fn test_classify(#[case] temperature: i32, #[case] expected: TemperatureClass) {
        assert_eq!(TemperatureClass::classify(temperature), expected);
    }

    #[test]
    fn test_class_colors() {
        assert_eq!(TemperatureClass::Hot.color().to_string(), "#ff4500");
        assert_eq!(TemperatureClass::Cold.color().to_string(), "#1e90ff");
        assert_eq!(TemperatureClass::Temperate.color().to_string(), "#32cd32");
        assert_eq!(TemperatureClass::Cold.color().rgb(), (0x1e, 0x90, 0xff));
    }

    #[test]
    fn test_spec_constants_do_not_depend_on_data() {
        let cold = MarkerSpec::new(
            GeoCoordinate::new(55.7558, 37.6173),
            WeatherSample::new("Moscow", -4, "light snow"),
            2.05,
        );
        let hot = MarkerSpec::new(
            GeoCoordinate::new(30.0444, 31.2357),
            WeatherSample::new("Cairo", 36, "clear sky"),
            2.05,
        );
        assert_eq!(cold.radius, hot.radius);
        assert_eq!(cold.glow_intensity, hot.glow_intensity);
        assert_eq!(cold.color, TemperatureClass::Cold.color());
        assert_eq!(hot.color, TemperatureClass::Hot.color());
        assert!((cold.position.radius() - 2.05).abs() < 1e-9);
    }
}
