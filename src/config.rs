//! Sketch configuration parsed from environment variables.

use crate::consts::{ANDROID_LABEL_OFFSET_PX, IOS_LABEL_OFFSET_PX, SCALE_REFERENCE_PX};
use crate::error::SketchError;

pub const DEFAULT_LABEL_MIN_RADIUS_PX: f64 = 90.0;
pub const DEFAULT_LABEL_MIN_WIDTH_PX: f64 = 90.0;
pub const DEFAULT_LABEL_MIN_HEIGHT_PX: f64 = 60.0;
pub const DEFAULT_CIRCLE_SEGMENTS: usize = 64;
pub const DEFAULT_INPUT_QUEUE_CAPACITY: usize = 256;

/// Mobile platform the overlay runs on. Only affects label placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Ios,
    Android,
}

impl Platform {
    /// Vertical offset applied to the radius label anchor, in pixels.
    #[must_use]
    pub fn label_offset_px(self) -> f64 {
        match self {
            Self::Ios => IOS_LABEL_OFFSET_PX,
            Self::Android => ANDROID_LABEL_OFFSET_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelThresholds {
    /// Radius label shows once the radius exceeds this many pixels.
    pub radius_px: f64,
    /// Width label shows once |width| exceeds this many pixels.
    pub width_px: f64,
    /// Height label shows once |height| exceeds this many pixels.
    pub height_px: f64,
}

impl Default for LabelThresholds {
    fn default() -> Self {
        Self {
            radius_px: DEFAULT_LABEL_MIN_RADIUS_PX,
            width_px: DEFAULT_LABEL_MIN_WIDTH_PX,
            height_px: DEFAULT_LABEL_MIN_HEIGHT_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchConfig {
    pub platform: Platform,
    /// Horizontal distance between the two scale probe points.
    pub scale_probe_px: f64,
    pub labels: LabelThresholds,
    /// Vertex count for circle rings in GeoJSON output.
    pub circle_segments: usize,
    /// Capacity of the pointer event queue feeding the gesture task.
    pub input_queue_capacity: usize,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            scale_probe_px: SCALE_REFERENCE_PX,
            labels: LabelThresholds::default(),
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
            input_queue_capacity: DEFAULT_INPUT_QUEUE_CAPACITY,
        }
    }
}

impl SketchConfig {
    /// Build typed sketch config from environment variables.
    ///
    /// Optional:
    /// - `SKETCH_PLATFORM`: `ios` (default) or `android`
    /// - `SKETCH_SCALE_PROBE_PX`: default 100
    /// - `SKETCH_LABEL_MIN_RADIUS_PX`: default 90
    /// - `SKETCH_LABEL_MIN_WIDTH_PX`: default 90
    /// - `SKETCH_LABEL_MIN_HEIGHT_PX`: default 60
    /// - `SKETCH_CIRCLE_SEGMENTS`: default 64
    /// - `SKETCH_INPUT_QUEUE_CAPACITY`: default 256
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::ConfigParse`] for an unknown platform, a probe
    /// distance that is not positive and finite, or a non-finite label
    /// threshold.
    pub fn from_env() -> Result<Self, SketchError> {
        let raw_platform = std::env::var("SKETCH_PLATFORM").unwrap_or_else(|_| "ios".to_string());
        let platform = parse_platform(&raw_platform)?;

        let scale_probe_px = env_parse("SKETCH_SCALE_PROBE_PX", SCALE_REFERENCE_PX);
        if !(scale_probe_px.is_finite() && scale_probe_px > 0.0) {
            return Err(SketchError::ConfigParse(format!(
                "SKETCH_SCALE_PROBE_PX must be a positive finite number, got {scale_probe_px}"
            )));
        }

        let labels = LabelThresholds {
            radius_px: env_threshold("SKETCH_LABEL_MIN_RADIUS_PX", DEFAULT_LABEL_MIN_RADIUS_PX)?,
            width_px: env_threshold("SKETCH_LABEL_MIN_WIDTH_PX", DEFAULT_LABEL_MIN_WIDTH_PX)?,
            height_px: env_threshold("SKETCH_LABEL_MIN_HEIGHT_PX", DEFAULT_LABEL_MIN_HEIGHT_PX)?,
        };

        Ok(Self {
            platform,
            scale_probe_px,
            labels,
            circle_segments: env_parse("SKETCH_CIRCLE_SEGMENTS", DEFAULT_CIRCLE_SEGMENTS).max(3),
            input_queue_capacity: env_parse("SKETCH_INPUT_QUEUE_CAPACITY", DEFAULT_INPUT_QUEUE_CAPACITY).max(1),
        })
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_threshold(key: &str, default: f64) -> Result<f64, SketchError> {
    let value = env_parse(key, default);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SketchError::ConfigParse(format!("{key} must be finite, got {value}")))
    }
}

fn parse_platform(raw: &str) -> Result<Platform, SketchError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "ios" => Ok(Platform::Ios),
        "android" => Ok(Platform::Android),
        other => Err(SketchError::ConfigParse(format!("unknown SKETCH_PLATFORM: {other}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
