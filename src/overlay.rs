//! Marker overlay manager
//!
//! Owns the scene and the hit-test registry, drives the per-city weather
//! fetches and answers pointer moves with tooltip updates.
//!
//! All fetches for a load are polled together on the calling task, so
//! markers are published one at a time in completion order. A marker is
//! added to the scene and appended to the registry under the same write
//! lock, which is the only place either is written.

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, instrument};

use crate::GlobeError;
use crate::config::GlobeConfig;
use crate::marker::{Marker, MarkerSpec};
use crate::models::City;
use crate::picking::{Camera, Viewport, intersect_markers};
use crate::registry::HitTestRegistry;
use crate::scene::{NodeHandle, Scene, SceneGraph};
use crate::tooltip::{Tooltip, TooltipUpdate};
use crate::weather::{WeatherError, WeatherSample, WeatherSource};

/// What happened to one city during a load
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    Published { city: String, node: NodeHandle },
    /// The provider rejected the API key; retrying will not help
    ConfigurationError { city: String, error: String },
    RequestError { city: String, error: String },
}

impl LoadOutcome {
    #[must_use]
    pub fn city(&self) -> &str {
        match self {
            LoadOutcome::Published { city, .. }
            | LoadOutcome::ConfigurationError { city, .. }
            | LoadOutcome::RequestError { city, .. } => city,
        }
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        matches!(self, LoadOutcome::Published { .. })
    }
}

struct Published<S> {
    scene: S,
    registry: HitTestRegistry,
}

struct View {
    camera: Camera,
    viewport: Viewport,
    tooltip: Tooltip,
}

pub struct MarkerOverlay<S: Scene = SceneGraph> {
    published: RwLock<Published<S>>,
    view: RwLock<View>,
    surface_radius: f64,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl<S: Scene> MarkerOverlay<S> {
    #[must_use]
    pub fn new(scene: S, config: &GlobeConfig, viewport: Viewport) -> Self {
        Self {
            published: RwLock::new(Published {
                scene,
                registry: HitTestRegistry::new(),
            }),
            view: RwLock::new(View {
                camera: Camera::from_config(&config.camera, viewport.aspect()),
                viewport,
                tooltip: Tooltip::default(),
            }),
            surface_radius: config.globe.marker_radius(),
        }
    }

    /// Fetch weather for every city concurrently and publish a marker for
    /// each success. Outcomes are returned in completion order.
    #[instrument(skip_all, fields(cities = cities.len()))]
    pub async fn load_cities(&self, source: &dyn WeatherSource, cities: &[City]) -> Vec<LoadOutcome> {
        info!("Requesting weather for {} cities", cities.len());

        let mut pending: FuturesUnordered<_> = cities
            .iter()
            .map(|city| async move {
                let result = source.fetch_weather(&city.name, city.coordinate()).await;
                (city, result)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(cities.len());
        while let Some((city, result)) = pending.next().await {
            outcomes.push(self.settle(city, result));
        }

        let published = outcomes.iter().filter(|o| o.is_published()).count();
        info!("{published} of {} markers published", cities.len());
        outcomes
    }

    /// Fetch and publish the marker for a single city
    pub async fn add_weather_marker(&self, source: &dyn WeatherSource, city: &City) -> LoadOutcome {
        let result = source.fetch_weather(&city.name, city.coordinate()).await;
        self.settle(city, result)
    }

    fn settle(&self, city: &City, result: Result<WeatherSample, WeatherError>) -> LoadOutcome {
        match result {
            Ok(sample) => {
                let marker = self.publish(city, sample);
                LoadOutcome::Published {
                    city: city.name.clone(),
                    node: marker.node,
                }
            }
            Err(err) if err.is_configuration() => {
                error!(
                    kind = "configuration",
                    city = %city.name,
                    "Error for {}: Invalid API Key. Please check weather.api_key in your configuration.",
                    city.name
                );
                LoadOutcome::ConfigurationError {
                    city: city.name.clone(),
                    error: err.to_string(),
                }
            }
            Err(err) => {
                error!(
                    kind = "request",
                    city = %city.name,
                    "Failed to fetch weather data for {}: {err}",
                    city.name
                );
                LoadOutcome::RequestError {
                    city: city.name.clone(),
                    error: err.to_string(),
                }
            }
        }
    }

    /// Add the marker to the scene and the registry in one step
    fn publish(&self, city: &City, sample: WeatherSample) -> Arc<Marker> {
        let spec = MarkerSpec::new(city.coordinate(), sample, self.surface_radius);

        let mut published = write(&self.published);
        let node = published.scene.add_marker(&spec);
        let marker = Arc::new(Marker { spec, node });
        published.registry.append(Arc::clone(&marker));
        drop(published);

        info!(
            city = %city.name,
            "Published {} marker for {} at {}",
            marker.spec.color,
            city.name,
            marker.spec.sample.format_temperature()
        );
        marker
    }

    /// Hit-test the pointer against the published markers and update the
    /// tooltip accordingly
    pub fn on_pointer_move(&self, screen_x: f64, screen_y: f64) -> TooltipUpdate {
        let markers = read(&self.published).registry.snapshot();

        let mut view = write(&self.view);
        let ndc = view.viewport.to_ndc(screen_x, screen_y);
        let ray = view.camera.ray_from_ndc(ndc);
        let hits = intersect_markers(&ray, &markers, view.camera.near, view.camera.far);

        let update = match hits.first() {
            Some(hit) => {
                debug!("Pointer over {}", hit.marker.city());
                TooltipUpdate::show(hit.marker.sample(), screen_x, screen_y)
            }
            None => TooltipUpdate::Hide,
        };
        view.tooltip.apply(&update);
        update
    }

    /// Track a new viewport size
    pub fn resize(&self, width: u32, height: u32) -> Result<Viewport, GlobeError> {
        let viewport = Viewport::new(width, height)?;
        let mut view = write(&self.view);
        view.viewport = viewport;
        view.camera.set_aspect(viewport.aspect());
        debug!("Viewport resized to {width}x{height}");
        Ok(viewport)
    }

    /// Orbit the camera around the globe; later pointer moves cast from the
    /// new pose
    pub fn orbit_camera(&self, d_yaw: f64, d_pitch: f64) -> Camera {
        let mut view = write(&self.view);
        view.camera.orbit(d_yaw, d_pitch);
        debug!(yaw = view.camera.yaw, pitch = view.camera.pitch, "Camera orbited");
        view.camera.clone()
    }

    /// Zoom the camera by `factor`, clamped to the configured distance range
    pub fn zoom_camera(&self, factor: f64) -> Result<Camera, GlobeError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(GlobeError::validation(format!(
                "zoom factor must be a positive number, got {factor}"
            )));
        }
        let mut view = write(&self.view);
        view.camera.zoom(factor);
        debug!(distance = view.camera.distance, "Camera zoomed");
        Ok(view.camera.clone())
    }

    /// Published markers in registry order
    #[must_use]
    pub fn markers(&self) -> Vec<Arc<Marker>> {
        read(&self.published).registry.snapshot()
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        read(&self.published).registry.len()
    }

    #[must_use]
    pub fn tooltip(&self) -> Tooltip {
        read(&self.view).tooltip.clone()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        read(&self.view).viewport
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        read(&self.view).camera.clone()
    }

    /// Run `f` against the scene while holding the read lock
    pub fn with_scene<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&read(&self.published).scene)
    }
}

impl MarkerOverlay<SceneGraph> {
    /// Overlay on a fresh globe scene built from `config`
    #[must_use]
    pub fn globe(config: &GlobeConfig, viewport: Viewport) -> Self {
        Self::new(SceneGraph::globe(config.globe.radius), config, viewport)
    }

    /// Advance the globe rotation by one frame
    pub fn advance_frame(&self) {
        write(&self.published).scene.advance_frame();
    }
}
