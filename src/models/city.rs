//! City model for marker placement

use serde::{Deserialize, Serialize};

use crate::projection::GeoCoordinate;

/// Named location a weather marker is requested for
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct City {
    /// Display name, shown in the tooltip
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl City {
    /// Create a new city
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.latitude, self.longitude)
    }
}
