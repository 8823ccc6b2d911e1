//! Screen and geographic point types plus the geodesy the projector needs.
//!
//! Screen points are view-local pixels with y growing downward. Geo points are
//! WGS84 degrees. Distances on the globe use the haversine formula on a
//! spherical Earth, which is what the scale factor and circle ring need at
//! drawing-gesture sizes.

#[cfg(test)]
#[path = "geo_test.rs"]
mod geo_test;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::consts::{CIRCLE_RADIUS_METERS_FACTOR, EARTH_RADIUS_KM, SCALE_REFERENCE_PX};

/// A point in view-local screen space (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translation vector from `origin` to `self`.
    #[must_use]
    pub fn delta_from(self, origin: ScreenPoint) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }

    /// Euclidean distance to another screen point.
    #[must_use]
    pub fn distance_to(self, other: ScreenPoint) -> f64 {
        let (dx, dy) = self.delta_from(other);
        dx.hypot(dy)
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to `other` in kilometers (haversine).
    #[must_use]
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// The point reached by travelling `distance_km` from `self` along the
    /// initial `bearing_deg` (clockwise from north).
    #[must_use]
    pub fn destination(self, distance_km: f64, bearing_deg: f64) -> GeoPoint {
        let lat1 = self.latitude.to_radians();
        let lon1 = self.longitude.to_radians();
        let bearing = bearing_deg.to_radians();
        let angular = distance_km / EARTH_RADIUS_KM;

        let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
        let lon2 = lon1
            + (bearing.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

        GeoPoint { latitude: lat2.to_degrees(), longitude: lon2.to_degrees() }
    }
}

/// Real-world distance (kilometers) covered by 100 screen pixels.
///
/// Valid only for the map camera it was measured under; recompute after
/// any pan or zoom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScaleFactor(pub f64);

impl ScaleFactor {
    /// Derive the factor from the geo positions of two screen points that
    /// are `probe_px` apart horizontally.
    ///
    /// `None` when the probe distance is not a positive finite number or the
    /// result is not finite.
    #[must_use]
    pub fn from_probe(a: GeoPoint, b: GeoPoint, probe_px: f64) -> Option<Self> {
        if !(probe_px.is_finite() && probe_px > 0.0) {
            return None;
        }
        let km_per_100px = a.distance_km(b) * SCALE_REFERENCE_PX / probe_px;
        km_per_100px.is_finite().then_some(Self(km_per_100px))
    }

    #[must_use]
    pub fn km_per_100px(self) -> f64 {
        self.0
    }

    /// Convert a screen distance to kilometers.
    #[must_use]
    pub fn px_to_km(self, px: f64) -> f64 {
        px * self.0 / SCALE_REFERENCE_PX
    }

    /// Circle radius in meters for a screen radius in pixels.
    #[must_use]
    pub fn circle_radius_meters(self, radius_px: f64) -> f64 {
        radius_px * self.0 * CIRCLE_RADIUS_METERS_FACTOR
    }
}

/// Convex hull of `points` as a closed ring (first vertex repeated last).
///
/// Uses Andrew's monotone chain in longitude/latitude space. Collinear
/// vertices are dropped. Returns an empty ring when the input has fewer than
/// three distinct, non-collinear points.
#[must_use]
pub fn convex_hull(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| match a.longitude.total_cmp(&b.longitude) {
        Ordering::Equal => a.latitude.total_cmp(&b.latitude),
        other => other,
    });
    sorted.dedup();

    if sorted.len() < 3 {
        return Vec::new();
    }

    let mut lower: Vec<GeoPoint> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<GeoPoint> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.extend(upper);

    if lower.len() < 3 {
        return Vec::new();
    }
    lower.push(lower[0]);
    lower
}

/// Z component of `(a → b) × (a → c)` with longitude as x and latitude as y.
/// Positive for a counter-clockwise turn.
#[must_use]
pub fn cross(a: GeoPoint, b: GeoPoint, c: GeoPoint) -> f64 {
    (b.longitude - a.longitude) * (c.latitude - a.latitude) - (b.latitude - a.latitude) * (c.longitude - a.longitude)
}
