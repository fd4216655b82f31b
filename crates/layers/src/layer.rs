use foundation::ids::RenderToken;
use foundation::math::LatLon;

use crate::popup::Popup;
use crate::symbology::{ArcStyle, MarkerIcon};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Marker,
    Arc,
}

/// What a marker stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerRole {
    Hub,
    Node { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLon,
    pub role: MarkerRole,
    pub icon: MarkerIcon,
    pub popup: Popup,
    /// Activation that drew this marker.
    pub activation: RenderToken,
}

/// Connection line from the hub to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub node_id: String,
    pub path: Vec<LatLon>,
    pub style: ArcStyle,
    pub activation: RenderToken,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Marker(Marker),
    Arc(Arc),
}

/// Anything drawn on the map surface. Markers and arcs share one type so that
/// clearing the map is a single operation over one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub shape: Shape,
}

impl Layer {
    pub fn kind(&self) -> LayerKind {
        match self.shape {
            Shape::Marker(_) => LayerKind::Marker,
            Shape::Arc(_) => LayerKind::Arc,
        }
    }

    pub fn activation(&self) -> RenderToken {
        match &self.shape {
            Shape::Marker(m) => m.activation,
            Shape::Arc(a) => a.activation,
        }
    }

    /// Node id for node markers and arcs; `None` for the hub.
    pub fn node_id(&self) -> Option<&str> {
        match &self.shape {
            Shape::Marker(Marker {
                role: MarkerRole::Node { id },
                ..
            }) => Some(id),
            Shape::Marker(_) => None,
            Shape::Arc(a) => Some(&a.node_id),
        }
    }

    pub fn is_hub(&self) -> bool {
        matches!(
            self.shape,
            Shape::Marker(Marker {
                role: MarkerRole::Hub,
                ..
            })
        )
    }
}
