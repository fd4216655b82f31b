use super::Vec3;

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.lat.abs() <= 90.0 && self.lon.abs() <= 180.0
    }

    pub fn as_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

/// Point on the unit sphere for the given coordinates.
pub fn latlon_to_unit(p: LatLon) -> Vec3 {
    let lat = p.lat.to_radians();
    let lon = p.lon.to_radians();
    Vec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Inverse of [`latlon_to_unit`]. The input does not need to be normalized.
pub fn unit_to_latlon(v: Vec3) -> LatLon {
    let lat = v.z.atan2((v.x * v.x + v.y * v.y).sqrt());
    let lon = v.y.atan2(v.x);
    LatLon::new(lat.to_degrees(), lon.to_degrees())
}

/// Central angle between two points (radians).
pub fn angular_distance(a: LatLon, b: LatLon) -> f64 {
    // Rounding can push the dot product just past 1.0 for near-identical points.
    latlon_to_unit(a)
        .dot(latlon_to_unit(b))
        .clamp(-1.0, 1.0)
        .acos()
}
