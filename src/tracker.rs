//! Gesture tracker: the drawing-mode state machine.
//!
//! The tracker is synchronous and owns no host resources, so it can run on
//! whatever thread delivers pointer events. It turns a stream of
//! [`InputEvent`]s into [`Action`]s; the only action with a payload worth
//! projecting is [`Action::Finished`], which carries the screen geometry of a
//! completed gesture for the projection task.
//!
//! Sessions are single-shot: after one completed drag the tracker drops back
//! to idle and the user has to pick a mode again.

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tracker_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::geo::ScreenPoint;
use crate::input::{DrawingMode, GestureSession, InputEvent, Stroke, TrackerState};

/// Screen-space geometry of a completed gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureGeometry {
    /// Every sampled point of a freehand trace, in order.
    Line { points: Vec<ScreenPoint> },
    /// Circle center and radius in pixels.
    Circle { center: ScreenPoint, radius_px: f64 },
    /// Origin corner and signed extent in pixels.
    Rectangle { origin: ScreenPoint, width: f64, height: f64 },
}

/// A completed gesture handed off for projection.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedGesture {
    /// Generation of the mode selection this gesture was drawn under.
    pub generation: u64,
    pub geometry: GestureGeometry,
}

impl FinishedGesture {
    /// The drawing mode that produced this gesture.
    #[must_use]
    pub fn mode(&self) -> DrawingMode {
        match self.geometry {
            GestureGeometry::Line { .. } => DrawingMode::FreehandLine,
            GestureGeometry::Circle { .. } => DrawingMode::Circle,
            GestureGeometry::Rectangle { .. } => DrawingMode::Rectangle,
        }
    }

    /// Whether the gesture covers no screen area (no movement between
    /// pointer-down and pointer-up).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match &self.geometry {
            GestureGeometry::Line { points } => points.windows(2).all(|w| w[0] == w[1]),
            GestureGeometry::Circle { radius_px, .. } => *radius_px <= 0.0,
            GestureGeometry::Rectangle { width, height, .. } => *width == 0.0 || *height == 0.0,
        }
    }
}

/// Actions returned from input handlers for the session to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A drawing mode became active; its scale factor must be measured.
    ModeActivated { mode: DrawingMode, generation: u64 },
    /// Drawing was turned off by the user.
    ModeCleared { generation: u64 },
    /// The finger went down under the given mode selection.
    GestureStarted { generation: u64 },
    /// A gesture completed and needs projecting.
    Finished(FinishedGesture),
    /// Preview state changed.
    RenderNeeded,
}

/// Drawing-mode state machine accumulating per-mode screen geometry.
#[derive(Debug, Default)]
pub struct GestureTracker {
    state: TrackerState,
    generation: Arc<AtomicU64>,
}

impl GestureTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker sharing its generation counter with a projection task.
    #[must_use]
    pub fn with_generation(generation: Arc<AtomicU64>) -> Self {
        Self { state: TrackerState::Idle, generation }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    #[must_use]
    pub fn mode(&self) -> DrawingMode {
        self.state.mode()
    }

    /// Generation of the most recent mode selection.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    // --- Input events ---

    /// Dispatch one input event.
    pub fn handle(&mut self, event: InputEvent) -> Vec<Action> {
        match event {
            InputEvent::SelectMode(mode) => self.select_mode(mode),
            InputEvent::PointerDown(p) => self.on_pointer_down(p),
            InputEvent::PointerMove(p) => self.on_pointer_move(p),
            InputEvent::PointerUp(p) => self.on_pointer_up(p),
        }
    }

    /// Toolbar press. Pressing the active mode turns drawing off; pressing
    /// another mode discards whatever was in progress and starts fresh.
    pub fn select_mode(&mut self, requested: DrawingMode) -> Vec<Action> {
        let current = self.state.mode();
        let next = current.toggled(requested);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let TrackerState::Tracking(GestureSession { start: Some(_), mode, .. }) = &self.state {
            debug!(?mode, "discarding in-progress gesture");
        }

        self.state = match Stroke::empty_for(next) {
            Some(stroke) => TrackerState::Tracking(GestureSession { mode: next, generation, stroke, start: None }),
            None => TrackerState::Idle,
        };

        info!(from = ?current, to = ?next, generation, "drawing mode selected");

        let change = if next.is_drawing() {
            Action::ModeActivated { mode: next, generation }
        } else {
            Action::ModeCleared { generation }
        };
        vec![change, Action::RenderNeeded]
    }

    pub fn on_pointer_down(&mut self, p: ScreenPoint) -> Vec<Action> {
        let TrackerState::Tracking(session) = &mut self.state else {
            return Vec::new();
        };

        session.start = Some(p);
        match &mut session.stroke {
            Stroke::Line { points, path } => {
                points.clear();
                points.push(p);
                path.move_to(p);
            }
            Stroke::Circle { center, radius } => {
                *center = p;
                *radius = 0.0;
            }
            Stroke::Rectangle { origin, width, height } => {
                *origin = p;
                *width = 0.0;
                *height = 0.0;
            }
        }
        debug!(mode = ?session.mode, generation = session.generation, x = p.x, y = p.y, "gesture started");
        vec![Action::GestureStarted { generation: session.generation }, Action::RenderNeeded]
    }

    pub fn on_pointer_move(&mut self, p: ScreenPoint) -> Vec<Action> {
        let TrackerState::Tracking(GestureSession { start: Some(start), stroke, .. }) = &mut self.state else {
            return Vec::new();
        };
        stroke.track(p, *start);
        vec![Action::RenderNeeded]
    }

    /// Finger lifted. Completes the gesture, returns to idle, and hands the
    /// geometry off. A freehand trace takes the lift point as its last
    /// sample; circle and rectangle keep the extent of the last move.
    pub fn on_pointer_up(&mut self, p: ScreenPoint) -> Vec<Action> {
        let TrackerState::Tracking(GestureSession { start: Some(start), .. }) = &self.state else {
            return Vec::new();
        };
        let start = *start;
        let TrackerState::Tracking(GestureSession { generation, mut stroke, .. }) = std::mem::take(&mut self.state)
        else {
            return Vec::new();
        };

        if matches!(stroke, Stroke::Line { .. }) {
            stroke.track(p, start);
        }

        let geometry = match stroke {
            Stroke::Line { points, .. } => GestureGeometry::Line { points },
            Stroke::Circle { center, radius } => GestureGeometry::Circle { center, radius_px: radius },
            Stroke::Rectangle { origin, width, height } => GestureGeometry::Rectangle { origin, width, height },
        };

        let finished = FinishedGesture { generation, geometry };
        info!(
            mode = ?finished.mode(),
            generation = finished.generation,
            degenerate = finished.is_degenerate(),
            "gesture finished"
        );
        vec![Action::Finished(finished), Action::RenderNeeded]
    }
}
