//! Shape payloads delivered to the caller, and their GeoJSON encoding.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::consts::METERS_PER_KM;
use crate::geo::GeoPoint;

/// A finished shape in geographic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeResult {
    /// Closed ring (first vertex repeated last). Empty when the gesture did
    /// not enclose any area.
    Polygon { ring: Vec<GeoPoint> },
    /// Circle on the ground.
    Circle { center: GeoPoint, radius_meters: f64 },
}

impl ShapeResult {
    /// Whether the shape encloses no area. Callers decide whether to keep it.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Polygon { ring } => {
                let Some(first) = ring.first() else {
                    return true;
                };
                ring.iter().all(|p| p == first)
                    || ring.iter().all(|p| p.latitude == first.latitude)
                    || ring.iter().all(|p| p.longitude == first.longitude)
            }
            Self::Circle { radius_meters, .. } => *radius_meters <= 0.0,
        }
    }

    /// Encode as a GeoJSON `Feature` with polygon geometry.
    ///
    /// Circles become a ring of `segments` vertices placed by geodesic
    /// destination from the center, wound counter-clockwise.
    #[must_use]
    pub fn to_geojson(&self, segments: usize) -> Value {
        let (ring, properties) = match self {
            Self::Polygon { ring } => (ring.clone(), json!({ "shape": "polygon" })),
            Self::Circle { center, radius_meters } => (
                circle_ring(*center, *radius_meters, segments),
                json!({
                    "shape": "circle",
                    "center": [center.longitude, center.latitude],
                    "radius_meters": radius_meters,
                }),
            ),
        };

        let coordinates: Vec<[f64; 2]> = ring.iter().map(|p| [p.longitude, p.latitude]).collect();
        json!({
            "type": "Feature",
            "properties": properties,
            "geometry": {
                "type": "Polygon",
                "coordinates": [coordinates],
            },
        })
    }
}

/// Closed ring approximating a ground circle.
#[must_use]
pub fn circle_ring(center: GeoPoint, radius_meters: f64, segments: usize) -> Vec<GeoPoint> {
    let segments = segments.max(3);
    let radius_km = radius_meters / METERS_PER_KM;
    #[allow(clippy::cast_precision_loss)]
    let step = -360.0 / segments as f64;

    let mut ring: Vec<GeoPoint> = (0..segments)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let bearing = step * i as f64;
            center.destination(radius_km, bearing)
        })
        .collect();
    ring.push(ring[0]);
    ring
}
