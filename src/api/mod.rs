use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    marker::{Marker, TemperatureClass},
    overlay::MarkerOverlay,
    picking::{Camera, Viewport},
    projection::SurfacePoint,
    scene::SceneGraph,
    tooltip::Tooltip,
};

pub type SharedOverlay = Arc<MarkerOverlay>;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ApiMarker {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_celsius: i32,
    pub description: String,
    pub class: TemperatureClass,
    pub color: String,
    pub position: SurfacePoint,
    pub radius: f64,
    pub glow_intensity: f64,
}

impl From<&Marker> for ApiMarker {
    fn from(marker: &Marker) -> Self {
        let spec = &marker.spec;
        Self {
            city: spec.sample.city.clone(),
            latitude: spec.coordinate.latitude,
            longitude: spec.coordinate.longitude,
            temperature_celsius: spec.sample.temperature_celsius,
            description: spec.sample.description.clone(),
            class: spec.class,
            color: spec.color.to_string(),
            position: spec.position,
            radius: spec.radius,
            glow_intensity: spec.glow_intensity,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResizeEvent {
    pub width: u32,
    pub height: u32,
}

/// Orbit angles in radians and an optional zoom factor
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CameraMove {
    #[serde(default)]
    pub yaw: f64,
    #[serde(default)]
    pub pitch: f64,
    pub zoom: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ApiCamera {
    pub position: SurfacePoint,
    pub yaw: f64,
    pub pitch: f64,
    pub distance: f64,
}

impl From<&Camera> for ApiCamera {
    fn from(camera: &Camera) -> Self {
        Self {
            position: camera.position.into(),
            yaw: camera.yaw,
            pitch: camera.pitch,
            distance: camera.distance,
        }
    }
}

pub fn router(overlay: SharedOverlay) -> Router {
    Router::new()
        .route("/markers", get(get_markers))
        .route("/pointer", post(pointer_moved))
        .route("/viewport", post(resize_viewport))
        .route("/camera", post(move_camera))
        .route("/tooltip", get(get_tooltip))
        .route("/scene", get(get_scene))
        .with_state(overlay)
}

async fn get_markers(State(overlay): State<SharedOverlay>) -> Json<Vec<ApiMarker>> {
    let markers = overlay.markers();
    Json(markers.iter().map(|m| ApiMarker::from(m.as_ref())).collect())
}

async fn pointer_moved(
    State(overlay): State<SharedOverlay>,
    Json(event): Json<PointerEvent>,
) -> Json<Tooltip> {
    overlay.on_pointer_move(event.x, event.y);
    Json(overlay.tooltip())
}

async fn resize_viewport(
    State(overlay): State<SharedOverlay>,
    Json(event): Json<ResizeEvent>,
) -> Result<Json<Viewport>, (StatusCode, String)> {
    overlay
        .resize(event.width, event.height)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.user_message()))
}

async fn move_camera(
    State(overlay): State<SharedOverlay>,
    Json(event): Json<CameraMove>,
) -> Result<Json<ApiCamera>, (StatusCode, String)> {
    if let Some(factor) = event.zoom {
        overlay
            .zoom_camera(factor)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.user_message()))?;
    }
    let camera = overlay.orbit_camera(event.yaw, event.pitch);
    Ok(Json(ApiCamera::from(&camera)))
}

async fn get_tooltip(State(overlay): State<SharedOverlay>) -> Json<Tooltip> {
    Json(overlay.tooltip())
}

async fn get_scene(State(overlay): State<SharedOverlay>) -> Json<SceneGraph> {
    Json(overlay.with_scene(SceneGraph::clone))
}
