//! Shared numeric constants for the sketch crate.

// ── Geodesy ─────────────────────────────────────────────────────

/// Mean Earth radius in kilometers, as used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6_371.008_8;

/// Meters per kilometer.
pub const METERS_PER_KM: f64 = 1_000.0;

// ── Scale factor ────────────────────────────────────────────────

/// Screen distance (pixels) that a [`crate::geo::ScaleFactor`] describes.
pub const SCALE_REFERENCE_PX: f64 = 100.0;

/// Multiplier turning `radius_px × km-per-100px` into meters.
///
/// `radius_px × (scale / 100) × 1000` collapses to `radius_px × scale × 10`.
/// Empirical: it treats the map as locally uniform in scale along the x axis.
pub const CIRCLE_RADIUS_METERS_FACTOR: f64 = METERS_PER_KM / SCALE_REFERENCE_PX;

// ── Preview ─────────────────────────────────────────────────────

/// Label offset above the circle center on iOS, in pixels.
pub const IOS_LABEL_OFFSET_PX: f64 = 10.5;

/// Label offset above the circle center on Android, in pixels.
pub const ANDROID_LABEL_OFFSET_PX: f64 = 15.5;

/// Radius of the endpoint dots drawn on the circle radius guide.
pub const GUIDE_DOT_RADIUS_PX: f64 = 3.5;

/// Dash segment length for guides and rectangle outline.
pub const DASH_PX: f64 = 4.0;

/// Stroke width for all preview outlines.
pub const STROKE_WIDTH_PX: f64 = 2.0;

/// Fill opacity for circle and rectangle previews.
pub const FILL_OPACITY: f64 = 0.3;
