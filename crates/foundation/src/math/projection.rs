//! Spherical Web Mercator, the projection used by slippy-map tile surfaces.

use super::LatLon;
use crate::bounds::LatLonBounds;

/// Tile edge in pixels; the whole world is one tile at zoom 0.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Latitude limit of the square Web Mercator world.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Projects to normalized world coordinates in `[0, 1]²` (y grows southward).
pub fn project_normalized(p: LatLon) -> [f64; 2] {
    let lat = p.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (p.lon + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0;
    [x, y]
}

pub fn unproject_normalized(xy: [f64; 2]) -> LatLon {
    let lon = xy[0] * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * xy[1]);
    let lat = n.sinh().atan().to_degrees();
    LatLon::new(lat, lon)
}

/// Largest integer zoom at which `bounds` fits inside a viewport of
/// `size_px` minus `padding_px` on every side, capped at `max_zoom`.
pub fn fit_zoom(bounds: &LatLonBounds, size_px: [f64; 2], padding_px: f64, max_zoom: u8) -> u8 {
    let sw = project_normalized(bounds.south_west);
    let ne = project_normalized(bounds.north_east);
    let span_x = (ne[0] - sw[0]).abs() * TILE_SIZE_PX;
    let span_y = (sw[1] - ne[1]).abs() * TILE_SIZE_PX;

    let avail_x = (size_px[0] - 2.0 * padding_px).max(1.0);
    let avail_y = (size_px[1] - 2.0 * padding_px).max(1.0);

    let scale_x = if span_x > 0.0 { avail_x / span_x } else { f64::INFINITY };
    let scale_y = if span_y > 0.0 { avail_y / span_y } else { f64::INFINITY };
    let scale = scale_x.min(scale_y);
    if !scale.is_finite() {
        return max_zoom;
    }

    let zoom = scale.log2().floor();
    if zoom <= 0.0 {
        0
    } else {
        (zoom as u64).min(u64::from(max_zoom)) as u8
    }
}

/// Center of `bounds` measured in projected space.
pub fn projected_center(bounds: &LatLonBounds) -> LatLon {
    let sw = project_normalized(bounds.south_west);
    let ne = project_normalized(bounds.north_east);
    unproject_normalized([(sw[0] + ne[0]) * 0.5, (sw[1] + ne[1]) * 0.5])
}
