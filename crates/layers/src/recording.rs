use foundation::bounds::LatLonBounds;
use foundation::math::{LatLon, fit_zoom, projected_center};
use tracing::trace;

use crate::layer::{Arc, Layer, LayerId, LayerKind, Marker, Shape};
use crate::surface::{FitOptions, MapSurface, Viewport};

/// Default container size, roughly the outreach section on a desktop page.
pub const DEFAULT_CONTAINER_PX: [f64; 2] = [960.0, 540.0];

/// Surface operation, as recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    SetViewport(Viewport),
    FitBounds {
        bounds: LatLonBounds,
        options: FitOptions,
        resolved: Viewport,
    },
    AddMarker(LayerId),
    AddArc(LayerId),
    ClearAll { removed: usize },
    InvalidateSize,
}

/// In-memory map surface.
///
/// Keeps the live layer set plus a log of every call, and resolves
/// `fit_bounds` to a concrete viewport with Web Mercator math so callers can
/// inspect the zoom a real tile map would settle on.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size_px: [f64; 2],
    viewport: Option<Viewport>,
    layers: Vec<Layer>,
    next_layer_id: u64,
    calls: Vec<SurfaceCall>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::with_size(DEFAULT_CONTAINER_PX)
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(size_px: [f64; 2]) -> Self {
        Self {
            size_px,
            viewport: None,
            layers: Vec::new(),
            next_layer_id: 1,
            calls: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn count(&self, kind: LayerKind) -> usize {
        self.layers.iter().filter(|l| l.kind() == kind).count()
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.layers.iter().filter_map(|l| match &l.shape {
            Shape::Marker(m) => Some(m),
            Shape::Arc(_) => None,
        })
    }

    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.layers.iter().filter_map(|l| match &l.shape {
            Shape::Arc(a) => Some(a),
            Shape::Marker(_) => None,
        })
    }

    pub fn hub_count(&self) -> usize {
        self.layers.iter().filter(|l| l.is_hub()).count()
    }

    /// Node ids of node markers, in drawing order.
    pub fn node_marker_ids(&self) -> Vec<String> {
        self.layers
            .iter()
            .filter(|l| l.kind() == LayerKind::Marker)
            .filter_map(|l| l.node_id().map(str::to_owned))
            .collect()
    }

    /// Node ids of arcs, in drawing order.
    pub fn arc_node_ids(&self) -> Vec<String> {
        self.arcs().map(|a| a.node_id.clone()).collect()
    }

    pub fn size_invalidations(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::InvalidateSize))
            .count()
    }

    fn push_layer(&mut self, shape: Shape) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        self.layers.push(Layer { id, shape });
        id
    }
}

impl MapSurface for RecordingSurface {
    fn set_viewport(&mut self, center: LatLon, zoom: u8) {
        let vp = Viewport { center, zoom };
        self.viewport = Some(vp);
        self.calls.push(SurfaceCall::SetViewport(vp));
    }

    fn fit_bounds(&mut self, bounds: LatLonBounds, options: FitOptions) {
        let resolved = Viewport {
            center: projected_center(&bounds),
            zoom: fit_zoom(&bounds, self.size_px, options.padding_px, options.max_zoom),
        };
        self.viewport = Some(resolved);
        self.calls.push(SurfaceCall::FitBounds {
            bounds,
            options,
            resolved,
        });
    }

    fn add_marker(&mut self, marker: Marker) -> LayerId {
        let id = self.push_layer(Shape::Marker(marker));
        self.calls.push(SurfaceCall::AddMarker(id));
        id
    }

    fn add_arc(&mut self, arc: Arc) -> LayerId {
        let id = self.push_layer(Shape::Arc(arc));
        self.calls.push(SurfaceCall::AddArc(id));
        id
    }

    fn clear_all_layers(&mut self) {
        let removed = self.layers.len();
        self.layers.clear();
        trace!(removed, "cleared map layers");
        self.calls.push(SurfaceCall::ClearAll { removed });
    }

    fn invalidate_size(&mut self) {
        self.calls.push(SurfaceCall::InvalidateSize);
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordingSurface, SurfaceCall};
    use crate::layer::{Arc, LayerKind, Marker, MarkerRole};
    use crate::popup::Popup;
    use crate::surface::{FitOptions, MapSurface};
    use crate::symbology::{ArcStyle, MarkerIcon};
    use foundation::bounds::LatLonBounds;
    use foundation::ids::RenderToken;
    use foundation::math::LatLon;
    use pretty_assertions::assert_eq;

    fn node_marker(id: &str, token: u64) -> Marker {
        Marker {
            position: LatLon::new(34.0, 36.0),
            role: MarkerRole::Node { id: id.into() },
            icon: MarkerIcon::node(),
            popup: Popup::new(id, ""),
            activation: RenderToken::new(token),
        }
    }

    fn arc(id: &str, token: u64) -> Arc {
        Arc {
            node_id: id.into(),
            path: vec![LatLon::new(33.9, 35.5), LatLon::new(34.0, 36.0)],
            style: ArcStyle::connection(0),
            activation: RenderToken::new(token),
        }
    }

    #[test]
    fn records_layers_by_kind() {
        let mut s = RecordingSurface::new();
        s.add_marker(node_marker("zahle", 1));
        s.add_arc(arc("zahle", 1));

        assert_eq!(s.count(LayerKind::Marker), 1);
        assert_eq!(s.count(LayerKind::Arc), 1);
        assert_eq!(s.node_marker_ids(), vec!["zahle".to_string()]);
        assert_eq!(s.arc_node_ids(), vec!["zahle".to_string()]);
        assert_eq!(s.hub_count(), 0);
    }

    #[test]
    fn clear_removes_markers_and_arcs_together() {
        let mut s = RecordingSurface::new();
        s.add_marker(node_marker("a", 1));
        s.add_arc(arc("a", 1));
        s.clear_all_layers();

        assert!(s.layers().is_empty());
        assert_eq!(s.calls().last(), Some(&SurfaceCall::ClearAll { removed: 2 }));
    }

    #[test]
    fn layer_ids_are_not_reused_after_clear() {
        let mut s = RecordingSurface::new();
        let first = s.add_marker(node_marker("a", 1));
        s.clear_all_layers();
        let second = s.add_marker(node_marker("a", 2));
        assert!(second > first);
    }

    #[test]
    fn fit_bounds_resolves_capped_zoom() {
        let mut s = RecordingSurface::new();
        let bounds = LatLonBounds::new(LatLon::new(33.9, 35.5), LatLon::new(34.0, 36.0));
        s.fit_bounds(
            bounds,
            FitOptions {
                padding_px: 50.0,
                max_zoom: 8,
            },
        );
        assert_eq!(s.viewport().unwrap().zoom, 8);
        assert!(bounds.contains(s.viewport().unwrap().center));
    }
}
