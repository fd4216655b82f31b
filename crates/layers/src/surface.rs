use foundation::bounds::LatLonBounds;
use foundation::math::LatLon;

use crate::layer::{Arc, LayerId, Marker};

/// Options for [`MapSurface::fit_bounds`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FitOptions {
    /// Padding kept clear on every side of the viewport.
    pub padding_px: f64,
    pub max_zoom: u8,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: u8,
}

/// The surface could not be brought up (no container, tile engine missing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    ContainerMissing(String),
    EngineUnavailable(String),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceError::ContainerMissing(id) => write!(f, "map container not found: {id}"),
            SurfaceError::EngineUnavailable(msg) => write!(f, "map engine unavailable: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Tile-map surface the outreach controller draws on.
///
/// Implementations own their layers. Every call happens on one thread, in
/// the order the controller issues them; viewport changes take effect
/// without animation.
pub trait MapSurface {
    fn set_viewport(&mut self, center: LatLon, zoom: u8);
    fn fit_bounds(&mut self, bounds: LatLonBounds, options: FitOptions);
    fn add_marker(&mut self, marker: Marker) -> LayerId;
    fn add_arc(&mut self, arc: Arc) -> LayerId;
    /// Removes every marker and arc. Base tiles are not layers in this sense.
    fn clear_all_layers(&mut self);
    /// Re-measures the container after a layout change.
    fn invalidate_size(&mut self);
}

impl<S: MapSurface + ?Sized> MapSurface for Box<S> {
    fn set_viewport(&mut self, center: LatLon, zoom: u8) {
        (**self).set_viewport(center, zoom)
    }

    fn fit_bounds(&mut self, bounds: LatLonBounds, options: FitOptions) {
        (**self).fit_bounds(bounds, options)
    }

    fn add_marker(&mut self, marker: Marker) -> LayerId {
        (**self).add_marker(marker)
    }

    fn add_arc(&mut self, arc: Arc) -> LayerId {
        (**self).add_arc(arc)
    }

    fn clear_all_layers(&mut self) {
        (**self).clear_all_layers()
    }

    fn invalidate_size(&mut self) {
        (**self).invalidate_size()
    }
}
