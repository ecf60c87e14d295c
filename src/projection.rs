//! Geographic to globe-surface projection
//!
//! Longitudes are offset by 180° so that the texture seam of the earth map
//! lines up with the antimeridian.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Latitude in decimal degrees, expected in [-90, 90]
    pub latitude: f64,
    /// Longitude in decimal degrees, expected in [-180, 180]
    pub longitude: f64,
}

impl GeoCoordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Point on the surface of a sphere centred at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SurfacePoint {
    #[must_use]
    pub fn to_vec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Distance from the origin
    #[must_use]
    pub fn radius(self) -> f64 {
        self.to_vec3().length()
    }
}

impl From<DVec3> for SurfacePoint {
    fn from(v: DVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Project a coordinate onto a sphere of `radius`.
///
/// Out-of-range input is not rejected; it yields a point that is still on
/// the sphere but has no geographic meaning.
#[must_use]
pub fn project(latitude: f64, longitude: f64, radius: f64) -> SurfacePoint {
    let phi = (90.0 - latitude) * (PI / 180.0);
    let theta = (longitude + 180.0) * (PI / 180.0);

    SurfacePoint {
        x: -radius * phi.sin() * theta.cos(),
        y: radius * phi.cos(),
        z: radius * phi.sin() * theta.sin(),
    }
}

/// Convenience wrapper over [`project`]
#[must_use]
pub fn project_coordinate(coordinate: GeoCoordinate, radius: f64) -> SurfacePoint {
    project(coordinate.latitude, coordinate.longitude, radius)
}
