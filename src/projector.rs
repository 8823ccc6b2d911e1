//! Coordinate projector: screen geometry → geographic shapes.
//!
//! DESIGN
//! ======
//! Every host-map query goes through the [`HostMap`] trait, a plain async
//! request/response contract. The projector never retries: a point the host
//! cannot resolve fails the whole shape with
//! [`SketchError::ProjectionUnavailable`], and the user draws again.
//!
//! The scale factor is measured once per mode activation by projecting two
//! probe points on the top edge of the view. Pan or zoom between activations
//! invalidates it, which is why the session re-measures on every activation.
//!
//! Rectangles are reconstructed from two projected corners by swapping
//! latitude/longitude between them. That assumes the projection is locally
//! axis-aligned, which holds at the small spans a finger drag covers.

#[cfg(test)]
#[path = "projector_test.rs"]
mod projector_test;

use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::consts::SCALE_REFERENCE_PX;
use crate::error::SketchError;
use crate::geo::{GeoPoint, ScaleFactor, ScreenPoint, convex_hull};
use crate::shape::ShapeResult;
use crate::tracker::{FinishedGesture, GestureGeometry};

/// The host map's screen-to-coordinate conversion.
#[async_trait::async_trait]
pub trait HostMap: Send + Sync {
    /// Resolve a view-local screen point to a geographic coordinate.
    ///
    /// Returns `None` when the map is not mounted yet or the point lies
    /// outside the rendered viewport.
    async fn screen_point_to_geo_coordinate(&self, point: ScreenPoint) -> Option<GeoPoint>;
}

#[async_trait::async_trait]
impl<M: HostMap + ?Sized> HostMap for std::sync::Arc<M> {
    async fn screen_point_to_geo_coordinate(&self, point: ScreenPoint) -> Option<GeoPoint> {
        (**self).screen_point_to_geo_coordinate(point).await
    }
}

/// Converts finished gestures into [`ShapeResult`]s through a host map.
pub struct Projector<M> {
    map: M,
    probe_px: f64,
    scale: Option<ScaleFactor>,
}

impl<M: HostMap> Projector<M> {
    #[must_use]
    pub fn new(map: M) -> Self {
        Self { map, probe_px: SCALE_REFERENCE_PX, scale: None }
    }

    /// Use a different horizontal probe distance for scale measurement.
    #[must_use]
    pub fn with_probe_px(mut self, probe_px: f64) -> Self {
        self.probe_px = probe_px;
        self
    }

    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Scale factor of the current mode session, if measured.
    #[must_use]
    pub fn scale(&self) -> Option<ScaleFactor> {
        self.scale
    }

    /// Install a known scale factor for the current mode session.
    pub fn set_scale(&mut self, scale: ScaleFactor) {
        self.scale = Some(scale);
    }

    /// Forget the scale factor; the next circle needs a fresh measurement.
    pub fn reset_scale(&mut self) {
        self.scale = None;
    }

    /// Resolve one screen point through the host map.
    ///
    /// # Errors
    ///
    /// [`SketchError::ProjectionUnavailable`] when the host returns nothing.
    pub async fn project_screen_to_geo(&self, point: ScreenPoint) -> Result<GeoPoint, SketchError> {
        match self.map.screen_point_to_geo_coordinate(point).await {
            Some(geo) => Ok(geo),
            None => {
                warn!(x = point.x, y = point.y, "host map could not project screen point");
                Err(SketchError::ProjectionUnavailable { x: point.x, y: point.y })
            }
        }
    }

    /// Measure km per 100 px from two probe points on the view's top edge
    /// and store it for the current mode session.
    ///
    /// # Errors
    ///
    /// Fails if either probe point cannot be projected, or with
    /// [`SketchError::ScaleUnavailable`] when the probe distance or the
    /// projected points give no finite factor. The previous factor is cleared
    /// in either case.
    pub async fn compute_scale_factor(&mut self) -> Result<ScaleFactor, SketchError> {
        self.scale = None;
        let left = ScreenPoint::new(0.0, 0.0);
        let right = ScreenPoint::new(self.probe_px, 0.0);
        let (a, b) = futures::try_join!(self.project_screen_to_geo(left), self.project_screen_to_geo(right))?;

        let Some(scale) = ScaleFactor::from_probe(a, b, self.probe_px) else {
            warn!(probe_px = self.probe_px, "scale probe produced no usable factor");
            return Err(SketchError::ScaleUnavailable);
        };
        debug!(km_per_100px = scale.km_per_100px(), "scale factor measured");
        self.scale = Some(scale);
        Ok(scale)
    }

    /// Project a freehand trace and close it into its convex hull.
    ///
    /// Points are projected concurrently; results keep input order.
    ///
    /// # Errors
    ///
    /// Fails if any point cannot be projected.
    pub async fn project_line_to_polygon(&self, points: &[ScreenPoint]) -> Result<ShapeResult, SketchError> {
        let coords = try_join_all(points.iter().map(|p| self.project_screen_to_geo(*p))).await?;
        Ok(ShapeResult::Polygon { ring: convex_hull(&coords) })
    }

    /// Project a circle. Radius in meters is `screen_radius × scale × 10`.
    ///
    /// # Errors
    ///
    /// [`SketchError::ScaleUnavailable`] without a measured scale factor, or a
    /// projection failure for the center.
    pub async fn project_circle(&self, center: ScreenPoint, screen_radius: f64) -> Result<ShapeResult, SketchError> {
        let scale = self.scale.ok_or(SketchError::ScaleUnavailable)?;
        let center = self.project_screen_to_geo(center).await?;
        Ok(ShapeResult::Circle { center, radius_meters: scale.circle_radius_meters(screen_radius) })
    }

    /// Project a rectangle from its origin corner and signed extent.
    ///
    /// Only the origin and the opposite corner hit the host map; the other two
    /// corners combine their latitude and longitude.
    ///
    /// # Errors
    ///
    /// Fails if either projected corner cannot be resolved.
    pub async fn project_rectangle(
        &self,
        origin: ScreenPoint,
        width: f64,
        height: f64,
    ) -> Result<ShapeResult, SketchError> {
        let (p1, p3) = futures::try_join!(
            self.project_screen_to_geo(origin),
            self.project_screen_to_geo(origin.offset(width, height)),
        )?;
        let p2 = GeoPoint { latitude: p3.latitude, longitude: p1.longitude };
        let p4 = GeoPoint { latitude: p1.latitude, longitude: p3.longitude };
        Ok(ShapeResult::Polygon { ring: vec![p1, p2, p3, p4, p1] })
    }

    /// Project whichever shape a finished gesture describes.
    ///
    /// # Errors
    ///
    /// Propagates the failure of the per-shape projection.
    pub async fn project_gesture(&self, gesture: &FinishedGesture) -> Result<ShapeResult, SketchError> {
        match &gesture.geometry {
            GestureGeometry::Line { points } => self.project_line_to_polygon(points).await,
            GestureGeometry::Circle { center, radius_px } => self.project_circle(*center, *radius_px).await,
            GestureGeometry::Rectangle { origin, width, height } => {
                self.project_rectangle(*origin, *width, *height).await
            }
        }
    }
}
