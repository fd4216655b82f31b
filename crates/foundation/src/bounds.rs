use crate::math::LatLon;

/// Axis-aligned lat/lon rectangle (degrees). Does not wrap the antimeridian.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLonBounds {
    pub south_west: LatLon,
    pub north_east: LatLon,
}

impl LatLonBounds {
    pub fn new(south_west: LatLon, north_east: LatLon) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Degenerate bounds covering exactly one point.
    pub fn from_point(p: LatLon) -> Self {
        Self::new(p, p)
    }

    /// Smallest bounds covering every point, or `None` for an empty input.
    pub fn from_points(points: impl IntoIterator<Item = LatLon>) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, p: LatLon) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lon = self.south_west.lon.min(p.lon);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lon = self.north_east.lon.max(p.lon);
    }

    /// Inclusive on every edge.
    pub fn contains(&self, p: LatLon) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lon >= self.south_west.lon
            && p.lon <= self.north_east.lon
    }

    pub fn center(&self) -> LatLon {
        LatLon::new(
            (self.south_west.lat + self.north_east.lat) * 0.5,
            (self.south_west.lon + self.north_east.lon) * 0.5,
        )
    }
}
