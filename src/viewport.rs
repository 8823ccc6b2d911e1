//! A Web-Mercator region viewport that can stand in for the host map.
//!
//! The visible area is described the way mobile map widgets describe it: a
//! center coordinate plus latitude/longitude deltas spanning the view. Screen
//! x maps linearly to longitude; screen y maps linearly to Mercator northing.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::f64::consts::FRAC_PI_4;
use std::sync::{PoisonError, RwLock};

use crate::geo::{GeoPoint, ScreenPoint};
use crate::projector::HostMap;

/// Visible map region: center plus the span shown across the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, latitude_delta: f64, longitude_delta: f64) -> Self {
        Self { latitude, longitude, latitude_delta, longitude_delta }
    }

    fn west(&self) -> f64 {
        self.longitude - self.longitude_delta / 2.0
    }

    fn north_y(&self) -> f64 {
        mercator_y(self.latitude + self.latitude_delta / 2.0)
    }

    fn south_y(&self) -> f64 {
        mercator_y(self.latitude - self.latitude_delta / 2.0)
    }
}

fn mercator_y(latitude: f64) -> f64 {
    (FRAC_PI_4 + latitude.to_radians() / 2.0).tan().ln()
}

fn mercator_latitude(y: f64) -> f64 {
    y.sinh().atan().to_degrees()
}

#[derive(Debug, Clone, Copy)]
struct ViewState {
    region: Region,
    mounted: bool,
}

/// Host map backed by a fixed-size view over a [`Region`].
#[derive(Debug)]
pub struct RegionViewport {
    width_px: f64,
    height_px: f64,
    state: RwLock<ViewState>,
}

impl RegionViewport {
    /// A mounted viewport of `width_px × height_px` showing `region`.
    #[must_use]
    pub fn new(region: Region, width_px: f64, height_px: f64) -> Self {
        Self { width_px, height_px, state: RwLock::new(ViewState { region, mounted: true }) }
    }

    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width_px, self.height_px)
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.read().region
    }

    /// Pan/zoom to a new region.
    pub fn set_region(&self, region: Region) {
        self.write().region = region;
    }

    /// Mark the map as (un)mounted. An unmounted map projects nothing.
    pub fn set_mounted(&self, mounted: bool) {
        self.write().mounted = mounted;
    }

    /// Synchronous screen → geo conversion.
    #[must_use]
    pub fn project(&self, point: ScreenPoint) -> Option<GeoPoint> {
        let view = *self.read();
        if !view.mounted || !self.contains(point) {
            return None;
        }

        let region = view.region;
        let longitude = region.west() + point.x / self.width_px * region.longitude_delta;
        let north = region.north_y();
        let y = north - point.y / self.height_px * (north - region.south_y());
        Some(GeoPoint { latitude: mercator_latitude(y), longitude })
    }

    /// Geo → screen conversion; the inverse of [`Self::project`].
    #[must_use]
    pub fn unproject(&self, geo: GeoPoint) -> ScreenPoint {
        let region = self.read().region;
        let x = (geo.longitude - region.west()) / region.longitude_delta * self.width_px;
        let north = region.north_y();
        let y = (north - mercator_y(geo.latitude)) / (north - region.south_y()) * self.height_px;
        ScreenPoint { x, y }
    }

    fn contains(&self, point: ScreenPoint) -> bool {
        (0.0..=self.width_px).contains(&point.x) && (0.0..=self.height_px).contains(&point.y)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ViewState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ViewState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl HostMap for RegionViewport {
    async fn screen_point_to_geo_coordinate(&self, point: ScreenPoint) -> Option<GeoPoint> {
        self.project(point)
    }
}
