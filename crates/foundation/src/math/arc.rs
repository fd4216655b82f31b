//! Great-circle arcs for connection lines.
//!
//! Interpolation happens on the unit sphere (slerp) rather than in lat/lon
//! space, so a connection drawn on a Mercator map bows the way a flight path
//! does instead of being a straight segment.

use super::{LatLon, angular_distance, latlon_to_unit, unit_to_latlon};

/// Default number of segments per arc.
pub const DEFAULT_ARC_STEPS: usize = 50;

/// Endpoints closer than this central angle (radians) are treated as one point.
pub const COINCIDENT_EPSILON_RAD: f64 = 0.001;

/// Returns `steps + 1` points tracing the great circle from `from` to `to`.
///
/// Longitudes are unwrapped along the path, so an arc crossing the
/// antimeridian keeps going past ±180° and its last point may differ from
/// `to.lon` by 360°.
///
/// Coincident endpoints collapse to `steps + 1` copies of `from`. Nearly
/// antipodal endpoints have no unique great circle; those fall back to linear
/// interpolation in degrees.
pub fn great_circle_arc(from: LatLon, to: LatLon, steps: usize) -> Vec<LatLon> {
    if steps == 0 {
        return vec![from];
    }

    let d = angular_distance(from, to);
    if d < COINCIDENT_EPSILON_RAD {
        return vec![from; steps + 1];
    }

    let sin_d = d.sin();
    if sin_d < COINCIDENT_EPSILON_RAD {
        return (0..=steps)
            .map(|i| lerp(from, to, i as f64 / steps as f64))
            .collect();
    }

    let a = latlon_to_unit(from);
    let b = latlon_to_unit(to);

    let mut out: Vec<LatLon> = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let wa = ((1.0 - t) * d).sin() / sin_d;
        let wb = (t * d).sin() / sin_d;
        let mut p = unit_to_latlon(a.scale(wa) + b.scale(wb));
        if let Some(prev) = out.last() {
            p.lon = unwrap_lon(p.lon, prev.lon);
        }
        out.push(p);
    }
    out
}

/// Shifts `lon` by whole turns so it lies within 180° of `reference`.
fn unwrap_lon(lon: f64, reference: f64) -> f64 {
    let mut lon = lon;
    while lon - reference > 180.0 {
        lon -= 360.0;
    }
    while lon - reference < -180.0 {
        lon += 360.0;
    }
    lon
}

fn lerp(a: LatLon, b: LatLon, t: f64) -> LatLon {
    LatLon::new(a.lat + (b.lat - a.lat) * t, a.lon + (b.lon - a.lon) * t)
}
