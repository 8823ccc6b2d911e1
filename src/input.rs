//! Input model: drawing modes, pointer events, and the tracker state.
//!
//! `DrawingMode` is the user's choice from the toolbar. `InputEvent` is what
//! the host feeds in from its gesture recognizer. `TrackerState` is the
//! gesture-session state owned by the tracker between mode activation and
//! pointer-up, carrying all screen-space geometry accumulated so far.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geo::ScreenPoint;

/// Which drawing mode is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawingMode {
    /// No drawing; pointer events pass through untouched.
    #[default]
    None,
    /// Freehand trace, closed into its convex hull.
    FreehandLine,
    /// Axis-aligned rectangle dragged from one corner.
    Rectangle,
    /// Circle dragged out from its center.
    Circle,
}

impl DrawingMode {
    /// Whether this mode draws anything.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Mode that results from the user pressing `requested` while `self` is
    /// active. Pressing the active mode again turns drawing off.
    #[must_use]
    pub fn toggled(self, requested: DrawingMode) -> DrawingMode {
        if self == requested { Self::None } else { requested }
    }
}

/// One event from the host's gesture recognizer or toolbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A toolbar button was pressed.
    SelectMode(DrawingMode),
    /// Finger down; the gesture starts here.
    PointerDown(ScreenPoint),
    /// Finger moved while down.
    PointerMove(ScreenPoint),
    /// Finger lifted; the gesture ends here.
    PointerUp(ScreenPoint),
}

/// SVG-style path description of a freehand trace (`M x y L x y ...`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathData(String);

impl PathData {
    /// Start a new path at `p`, discarding any previous segments.
    pub fn move_to(&mut self, p: ScreenPoint) {
        self.0 = format!("M{} {}", p.x, p.y);
    }

    /// Extend the path with a straight segment to `p`.
    pub fn line_to(&mut self, p: ScreenPoint) {
        self.0.push_str(&format!(" L{} {}", p.x, p.y));
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Screen-space geometry accumulated for the active mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Stroke {
    /// Freehand trace: every sampled point plus its path description.
    Line { points: Vec<ScreenPoint>, path: PathData },
    /// Circle: fixed center, radius measured from the drag translation.
    Circle { center: ScreenPoint, radius: f64 },
    /// Rectangle: fixed origin corner, signed width/height.
    Rectangle { origin: ScreenPoint, width: f64, height: f64 },
}

impl Stroke {
    /// Empty geometry for `mode`, or `None` when the mode draws nothing.
    #[must_use]
    pub fn empty_for(mode: DrawingMode) -> Option<Self> {
        match mode {
            DrawingMode::None => None,
            DrawingMode::FreehandLine => Some(Self::Line { points: Vec::new(), path: PathData::default() }),
            DrawingMode::Circle => Some(Self::Circle { center: ScreenPoint::default(), radius: 0.0 }),
            DrawingMode::Rectangle => {
                Some(Self::Rectangle { origin: ScreenPoint::default(), width: 0.0, height: 0.0 })
            }
        }
    }

    /// Fold one pointer sample taken after the finger went down at `start`.
    ///
    /// Lines append the sample and a path segment to it; circles and
    /// rectangles re-measure their extent from `start`.
    pub fn track(&mut self, p: ScreenPoint, start: ScreenPoint) {
        match self {
            Self::Line { points, path } => {
                points.push(p);
                path.line_to(p);
            }
            Self::Circle { radius, .. } => *radius = p.distance_to(start),
            Self::Rectangle { width, height, .. } => (*width, *height) = p.delta_from(start),
        }
    }
}

/// An active drawing session: one mode activation, at most one gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    pub mode: DrawingMode,
    /// Generation of the mode selection that opened this session.
    pub generation: u64,
    pub stroke: Stroke,
    /// Where the finger went down, once the gesture has started.
    pub start: Option<ScreenPoint>,
}

/// Internal state for the gesture tracker.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TrackerState {
    /// No drawing mode active; pointer events are ignored.
    #[default]
    Idle,
    /// A mode is active and geometry is being accumulated.
    Tracking(GestureSession),
}

impl TrackerState {
    /// The active mode, or [`DrawingMode::None`] when idle.
    #[must_use]
    pub fn mode(&self) -> DrawingMode {
        match self {
            Self::Idle => DrawingMode::None,
            Self::Tracking(session) => session.mode,
        }
    }
}
