//! Live preview: the screen-space display list for an in-progress gesture.
//!
//! This module never touches the host's drawing API. It receives a read-only
//! view of the tracker and produces a [`Preview`] describing what to draw;
//! the host paints it however its UI toolkit likes. It holds no state, so the
//! preview can be rebuilt on every pointer sample.

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

use serde::Serialize;

use crate::config::SketchConfig;
use crate::consts::{DASH_PX, FILL_OPACITY, GUIDE_DOT_RADIUS_PX, STROKE_WIDTH_PX};
use crate::geo::{ScaleFactor, ScreenPoint};
use crate::input::{DrawingMode, GestureSession, Stroke, TrackerState};

/// Stroke/fill styling for a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Style {
    pub stroke_width: f64,
    /// Dash segment length; solid when `None`.
    pub dash: Option<f64>,
    /// Fill opacity; unfilled when `None`.
    pub fill_opacity: Option<f64>,
}

const OUTLINE: Style = Style { stroke_width: STROKE_WIDTH_PX, dash: None, fill_opacity: None };
const FILLED: Style = Style { stroke_width: STROKE_WIDTH_PX, dash: None, fill_opacity: Some(FILL_OPACITY) };
const DASHED: Style = Style { stroke_width: STROKE_WIDTH_PX, dash: Some(DASH_PX), fill_opacity: None };
const DASHED_FILLED: Style = Style { stroke_width: STROKE_WIDTH_PX, dash: Some(DASH_PX), fill_opacity: Some(FILL_OPACITY) };
const DOT: Style = Style { stroke_width: 0.0, dash: None, fill_opacity: Some(1.0) };

/// One drawable element of the preview, in screen space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// SVG path description (`M x y L x y ...`).
    Path { d: String, style: Style },
    Circle { center: ScreenPoint, radius: f64, style: Style },
    Line { from: ScreenPoint, to: ScreenPoint, style: Style },
    /// Normalized rectangle (non-negative width/height).
    Rect { x: f64, y: f64, width: f64, height: f64, style: Style },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    Radius,
    Width,
    Height,
}

/// A measurement label. The box spans the measured dimension; the host
/// centers the text inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub kind: LabelKind,
    pub text: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
}

/// One mode toggle on the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolbarButton {
    pub mode: DrawingMode,
    pub icon: &'static str,
    pub active: bool,
}

/// Everything the host needs to paint the overlay for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub mode: DrawingMode,
    pub generation: u64,
    /// Whether the drawing surface should capture touches.
    pub capturing: bool,
    pub primitives: Vec<Primitive>,
    pub labels: Vec<Label>,
    pub toolbar: [ToolbarButton; 3],
}

impl Default for Preview {
    fn default() -> Self {
        Self {
            mode: DrawingMode::None,
            generation: 0,
            capturing: false,
            primitives: Vec::new(),
            labels: Vec::new(),
            toolbar: toolbar(DrawingMode::None),
        }
    }
}

/// The three mutually exclusive mode toggles, in display order.
#[must_use]
pub fn toolbar(active: DrawingMode) -> [ToolbarButton; 3] {
    [
        (DrawingMode::Rectangle, "shape-rectangle-plus"),
        (DrawingMode::FreehandLine, "shape-polygon-plus"),
        (DrawingMode::Circle, "vector-circle-variant"),
    ]
    .map(|(mode, icon)| ToolbarButton { mode, icon, active: mode == active })
}

/// Format a screen distance as kilometers, e.g. `"1.23km"`.
#[must_use]
pub fn format_km(px: f64, scale: ScaleFactor) -> String {
    format!("{:.2}km", scale.px_to_km(px))
}

/// Build the preview for the tracker's current state.
///
/// `scale` is the factor measured for the current session, if it has
/// arrived yet; labels read `0.00km` until it does.
#[must_use]
pub fn render(state: &TrackerState, generation: u64, scale: Option<ScaleFactor>, config: &SketchConfig) -> Preview {
    let mode = state.mode();
    let mut preview = Preview { mode, generation, capturing: mode.is_drawing(), toolbar: toolbar(mode), ..Preview::default() };

    let TrackerState::Tracking(GestureSession { stroke, start: Some(_), .. }) = state else {
        return preview;
    };
    let scale = scale.unwrap_or_default();

    match stroke {
        Stroke::Line { path, .. } => {
            preview.primitives.push(Primitive::Path { d: path.as_str().to_string(), style: OUTLINE });
        }
        Stroke::Circle { center, radius } => draw_circle(&mut preview, *center, *radius, scale, config),
        Stroke::Rectangle { origin, width, height } => {
            draw_rectangle(&mut preview, *origin, *width, *height, scale, config);
        }
    }
    preview
}

fn draw_circle(preview: &mut Preview, center: ScreenPoint, radius: f64, scale: ScaleFactor, config: &SketchConfig) {
    let edge = center.offset(radius, 0.0);
    preview.primitives.push(Primitive::Circle { center, radius, style: FILLED });
    preview.primitives.push(Primitive::Line { from: center, to: edge, style: DASHED });
    if radius > 0.0 {
        preview.primitives.push(Primitive::Circle { center, radius: GUIDE_DOT_RADIUS_PX, style: DOT });
        preview.primitives.push(Primitive::Circle { center: edge, radius: GUIDE_DOT_RADIUS_PX, style: DOT });
    }

    preview.labels.push(Label {
        kind: LabelKind::Radius,
        text: format_km(radius, scale),
        left: center.x,
        top: center.y - config.platform.label_offset_px(),
        width: radius,
        height: 0.0,
        visible: radius > config.labels.radius_px,
    });
}

fn draw_rectangle(
    preview: &mut Preview,
    origin: ScreenPoint,
    width: f64,
    height: f64,
    scale: ScaleFactor,
    config: &SketchConfig,
) {
    let left = if width < 0.0 { origin.x + width } else { origin.x };
    let top = if height < 0.0 { origin.y + height } else { origin.y };
    let (abs_w, abs_h) = (width.abs(), height.abs());

    if width != 0.0 && height != 0.0 {
        preview.primitives.push(Primitive::Rect { x: left, y: top, width: abs_w, height: abs_h, style: DASHED_FILLED });
    }

    preview.labels.push(Label {
        kind: LabelKind::Width,
        text: format_km(abs_w, scale),
        left,
        top: origin.y,
        width: abs_w,
        height: 0.0,
        visible: abs_w > config.labels.width_px,
    });
    preview.labels.push(Label {
        kind: LabelKind::Height,
        text: format_km(abs_h, scale),
        left: origin.x,
        top,
        width: 0.0,
        height: abs_h,
        visible: abs_h > config.labels.height_px,
    });
}
