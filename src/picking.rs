//! Screen-space picking: viewport, camera rays and marker intersection

use glam::{DMat4, DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::GlobeError;
use crate::config::CameraConfig;
use crate::marker::Marker;

/// Size of the rendering surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self, GlobeError> {
        if width == 0 || height == 0 {
            return Err(GlobeError::validation(format!(
                "viewport must not be empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Screen pixels to normalized device coordinates (-1..1, y up)
    #[must_use]
    pub fn to_ndc(&self, screen_x: f64, screen_y: f64) -> DVec2 {
        DVec2::new(
            (screen_x / f64::from(self.width)) * 2.0 - 1.0,
            -(screen_y / f64::from(self.height)) * 2.0 + 1.0,
        )
    }

    /// Normalized device coordinates back to screen pixels
    #[must_use]
    pub fn to_screen(&self, ndc: DVec2) -> DVec2 {
        DVec2::new(
            (ndc.x + 1.0) / 2.0 * f64::from(self.width),
            (1.0 - ndc.y) / 2.0 * f64::from(self.height),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    /// Unit length
    pub direction: DVec3,
}

impl Ray {
    #[must_use]
    pub fn at(&self, distance: f64) -> DVec3 {
        self.origin + self.direction * distance
    }

    /// Distance to the first crossing of a sphere surface, if any.
    ///
    /// From inside the sphere this is the exit point.
    #[must_use]
    pub fn intersect_sphere(&self, center: DVec3, radius: f64) -> Option<f64> {
        let oc = center - self.origin;
        let tca = oc.dot(self.direction);
        let d2 = oc.length_squared() - tca * tca;
        let r2 = radius * radius;
        if d2 > r2 {
            return None;
        }
        let thc = (r2 - d2).sqrt();
        let t0 = tca - thc;
        let t1 = tca + thc;
        if t1 < 0.0 {
            return None;
        }
        Some(if t0 < 0.0 { t1 } else { t0 })
    }
}

/// Pitch stays just short of the poles so `look_at` keeps a usable up vector
const PITCH_LIMIT: f64 = std::f64::consts::FRAC_PI_2 - 0.017;

/// Perspective camera orbiting the globe centre
///
/// The eye sits on a sphere of radius `distance` around `target`. Yaw turns
/// around the Y axis starting from +Z, pitch lifts towards +Y.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: DVec3,
    pub target: DVec3,
    pub yaw: f64,
    pub pitch: f64,
    pub distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub fov_y_degrees: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    /// Camera on the +Z axis looking at the globe centre
    #[must_use]
    pub fn from_config(config: &CameraConfig, aspect: f64) -> Self {
        let mut camera = Self {
            position: DVec3::ZERO,
            target: DVec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance: config.distance,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            fov_y_degrees: config.fov_degrees,
            aspect,
            near: config.near,
            far: config.far,
        };
        camera.update_position();
        camera
    }

    /// Rotate around the target by the given angles in radians
    pub fn orbit(&mut self, d_yaw: f64, d_pitch: f64) {
        self.yaw = (self.yaw + d_yaw).rem_euclid(std::f64::consts::TAU);
        self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_position();
    }

    /// Scale the distance to the target; below 1 moves closer
    pub fn zoom(&mut self, factor: f64) {
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
        self.update_position();
    }

    fn update_position(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.position = self.target
            + self.distance * DVec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch);
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = aspect;
    }

    #[must_use]
    pub fn view(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.target, DVec3::Y)
    }

    #[must_use]
    pub fn projection(&self) -> DMat4 {
        DMat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect.max(1e-3),
            self.near,
            self.far,
        )
    }

    #[must_use]
    pub fn view_projection(&self) -> DMat4 {
        self.projection() * self.view()
    }

    /// Ray from the camera through a point given in NDC
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: DVec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let through = inverse.project_point3(DVec3::new(ndc.x, ndc.y, 0.5));
        Ray {
            origin: self.position,
            direction: (through - self.position).normalize(),
        }
    }

    /// NDC of a world-space point
    #[must_use]
    pub fn world_to_ndc(&self, point: DVec3) -> DVec2 {
        self.view_projection().project_point3(point).truncate()
    }
}

/// One marker crossed by a pick ray
#[derive(Debug, Clone)]
pub struct Hit {
    pub distance: f64,
    pub point: DVec3,
    pub marker: Arc<Marker>,
}

/// Markers crossed by `ray` within `[near, far]`, nearest first
///
/// The range is the camera's clip range rather than `[0, inf)`, so a marker
/// is only picked where it could also be drawn.
#[must_use]
pub fn intersect_markers(ray: &Ray, markers: &[Arc<Marker>], near: f64, far: f64) -> Vec<Hit> {
    let mut hits: Vec<Hit> = markers
        .iter()
        .filter_map(|marker| {
            let center = marker.position().to_vec3();
            let distance = ray.intersect_sphere(center, marker.spec.radius)?;
            (near..=far).contains(&distance).then(|| Hit {
                distance,
                point: ray.at(distance),
                marker: Arc::clone(marker),
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerSpec;
    use crate::projection::GeoCoordinate;
    use crate::scene::NodeHandle;
    use crate::weather::WeatherSample;
    use rstest::rstest;
    use std::f64::consts::FRAC_PI_2;

    fn camera() -> Camera {
        Camera::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }

    fn marker_at(lat: f64, lon: f64, city: &str) -> Arc<Marker> {
        Arc::new(Marker {
            spec: MarkerSpec::new(
                GeoCoordinate::new(lat, lon),
                WeatherSample::new(city, 22, "clear sky"),
                2.05,
            ),
            node: NodeHandle(0),
        })
    }

    #[test]
    fn test_viewport_rejects_empty() {
        assert!(Viewport::new(0, 600).is_err());
        assert!(Viewport::new(800, 0).is_err());
        assert!(Viewport::new(800, 600).is_ok());
    }

    #[test]
    fn test_to_ndc() {
        let viewport = Viewport::new(800, 600).unwrap();
        assert_eq!(viewport.to_ndc(400.0, 300.0), DVec2::new(0.0, 0.0));
        assert_eq!(viewport.to_ndc(0.0, 0.0), DVec2::new(-1.0, 1.0));
        assert_eq!(viewport.to_ndc(800.0, 600.0), DVec2::new(1.0, -1.0));
        assert_eq!(viewport.to_screen(DVec2::new(-1.0, 1.0)), DVec2::new(0.0, 0.0));
    }

    #[test]
    fn test_center_ray_points_at_origin() {
        let ray = camera().ray_from_ndc(DVec2::ZERO);
        assert!((ray.direction - DVec3::NEG_Z).length() < 1e-9);
        assert_eq!(ray.origin, DVec3::new(0.0, 0.0, 4.5));
    }

    #[test]
    fn test_orbit_moves_eye_around_target() {
        let mut camera = camera();
        camera.orbit(FRAC_PI_2, 0.0);
        assert!((camera.position - DVec3::new(4.5, 0.0, 0.0)).length() < 1e-9);

        camera.orbit(0.0, 0.3);
        assert!((camera.position.length() - 4.5).abs() < 1e-9);
        assert!(camera.position.y > 0.0);

        // the centre of the screen still looks at the globe centre
        let ray = camera.ray_from_ndc(DVec2::ZERO);
        assert!(ray.direction.dot(-camera.position.normalize()) > 1.0 - 1e-9);
    }

    #[test]
    fn test_orbit_pitch_stops_short_of_the_pole() {
        let mut camera = camera();
        camera.orbit(0.0, 10.0);
        assert!(camera.pitch < FRAC_PI_2);
        assert!(camera.position.z > 0.0);
        camera.orbit(0.0, -20.0);
        assert!(camera.pitch > -FRAC_PI_2);
        assert!(camera.position.y < 0.0);
    }

    #[rstest]
    #[case(0.5, 2.5)]
    #[case(0.8, 3.6)]
    #[case(2.0, 9.0)]
    #[case(100.0, 10.0)]
    fn test_zoom_is_clamped(#[case] factor: f64, #[case] expected: f64) {
        let mut camera = camera();
        camera.zoom(factor);
        assert!((camera.distance - expected).abs() < 1e-9);
        assert!((camera.position.length() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_intersect_sphere() {
        let ray = Ray {
            origin: DVec3::new(0.0, 0.0, 5.0),
            direction: DVec3::NEG_Z,
        };
        let t = ray.intersect_sphere(DVec3::ZERO, 1.0).unwrap();
        assert!((t - 4.0).abs() < 1e-12);
        assert!(ray.intersect_sphere(DVec3::new(3.0, 0.0, 0.0), 1.0).is_none());
        assert!(ray.intersect_sphere(DVec3::new(0.0, 0.0, 9.0), 1.0).is_none());

        let inside = Ray {
            origin: DVec3::ZERO,
            direction: DVec3::X,
        };
        assert!((inside.intersect_sphere(DVec3::ZERO, 2.0).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_pick_marker_facing_camera() {
        // lon -90 projects onto +Z, straight in front of the camera
        let facing = marker_at(0.0, -90.0, "Facing");
        let camera = camera();
        let ray = camera.ray_from_ndc(DVec2::ZERO);
        let hits = intersect_markers(&ray, &[facing], camera.near, camera.far);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - (4.5 - 2.05 - 0.04)).abs() < 1e-9);

        let miss = camera.ray_from_ndc(DVec2::new(0.9, 0.9));
        assert!(intersect_markers(&miss, &[marker_at(0.0, -90.0, "Facing")], 0.1, 1000.0).is_empty());
    }

    #[test]
    fn test_pick_through_projected_point() {
        let camera = camera();
        let london = marker_at(51.5074, -0.1278, "London");
        let ndc = camera.world_to_ndc(london.position().to_vec3());
        let ray = camera.ray_from_ndc(ndc);
        let hits = intersect_markers(&ray, &[Arc::clone(&london)], camera.near, camera.far);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].marker.city(), "London");
    }

    #[test]
    fn test_hits_sorted_nearest_first() {
        let ray = Ray {
            origin: DVec3::new(0.0, 0.0, 4.5),
            direction: DVec3::NEG_Z,
        };
        // the back marker sits on -Z, the front one on +Z
        let back = marker_at(0.0, 90.0, "Back");
        let front = marker_at(0.0, -90.0, "Front");
        let hits = intersect_markers(&ray, &[back, front], 0.1, 1000.0);
        let cities: Vec<&str> = hits.iter().map(|h| h.marker.city()).collect();
        assert_eq!(cities, vec!["Front", "Back"]);
    }

    #[test]
    fn test_hits_beyond_far_plane_are_dropped() {
        let ray = Ray {
            origin: DVec3::new(0.0, 0.0, 4.5),
            direction: DVec3::NEG_Z,
        };
        let front = marker_at(0.0, -90.0, "Front");
        assert!(intersect_markers(&ray, &[front], 0.1, 1.0).is_empty());
    }
}
