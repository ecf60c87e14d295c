//! Scene graph seam
//!
//! Drawing is done by an external renderer. What the overlay needs from it
//! is a place to put marker nodes and a handle back to each node; the
//! in-memory [`SceneGraph`] records exactly that, plus the rotating globe
//! layers a renderer would draw underneath.

use serde::{Deserialize, Serialize};

use crate::marker::{Color, MarkerSpec};
use crate::projection::SurfacePoint;

/// Index of a node inside a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeHandle(pub usize);

/// Render graph that markers get attached to
pub trait Scene: Send + Sync {
    /// Attach a marker node and return its handle
    fn add_marker(&mut self, spec: &MarkerSpec) -> NodeHandle;

    fn node_count(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Earth,
    Clouds,
    Starfield,
}

/// Textured sphere drawn around the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub kind: LayerKind,
    pub radius: f64,
    /// Current rotation about the Y axis, radians
    pub rotation_y: f64,
    /// Rotation applied per rendered frame, radians
    pub spin_per_frame: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneNode {
    Layer(Layer),
    Marker {
        position: SurfacePoint,
        color: Color,
        radius: f64,
        glow_intensity: f64,
    },
}

/// Earth spin per frame, radians
pub const EARTH_SPIN: f64 = 0.0005;
/// Cloud spin per frame, radians
pub const CLOUD_SPIN: f64 = 0.0006;
const CLOUD_OFFSET: f64 = 0.02;
const STARFIELD_RADIUS: f64 = 500.0;

/// In-memory scene graph
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    frame: u64,
}

impl SceneGraph {
    /// Empty scene with no globe layers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene holding the earth, its cloud shell and the star backdrop
    #[must_use]
    pub fn globe(globe_radius: f64) -> Self {
        let layers = [
            (LayerKind::Earth, globe_radius, EARTH_SPIN),
            (LayerKind::Clouds, globe_radius + CLOUD_OFFSET, CLOUD_SPIN),
            (LayerKind::Starfield, STARFIELD_RADIUS, 0.0),
        ];
        let nodes = layers
            .into_iter()
            .map(|(kind, radius, spin_per_frame)| {
                SceneNode::Layer(Layer {
                    kind,
                    radius,
                    rotation_y: 0.0,
                    spin_per_frame,
                })
            })
            .collect();
        Self { nodes, frame: 0 }
    }

    /// Advance the scene by one rendered frame
    pub fn advance_frame(&mut self) {
        self.frame += 1;
        for node in &mut self.nodes {
            if let SceneNode::Layer(layer) = node {
                layer.rotation_y += layer.spin_per_frame;
            }
        }
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub fn node(&self, handle: NodeHandle) -> Option<&SceneNode> {
        self.nodes.get(handle.0)
    }

    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.nodes.iter().find_map(|node| match node {
            SceneNode::Layer(layer) if layer.kind == kind => Some(layer),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes
            .iter()
            .filter(|node| matches!(node, SceneNode::Marker { .. }))
    }
}

impl Scene for SceneGraph {
    fn add_marker(&mut self, spec: &MarkerSpec) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(SceneNode::Marker {
            position: spec.position,
            color: spec.color,
            radius: spec.radius,
            glow_intensity: spec.glow_intensity,
        });
        handle
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
