#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> ScreenPoint {
    ScreenPoint::new(x, y)
}

fn finished(actions: &[Action]) -> Option<&FinishedGesture> {
    actions.iter().find_map(|a| match a {
        Action::Finished(f) => Some(f),
        _ => None,
    })
}

fn has_render_needed(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::RenderNeeded))
}

fn drag(tracker: &mut GestureTracker, down: ScreenPoint, moves: &[ScreenPoint], up: ScreenPoint) -> Vec<Action> {
    tracker.on_pointer_down(down);
    for m in moves {
        tracker.on_pointer_move(*m);
    }
    tracker.on_pointer_up(up)
}

fn tracker_in(mode: DrawingMode) -> GestureTracker {
    let mut tracker = GestureTracker::new();
    tracker.select_mode(mode);
    tracker
}

// =============================================================
// Mode selection
// =============================================================

#[test]
fn starts_idle() {
    let tracker = GestureTracker::new();
    assert_eq!(tracker.mode(), DrawingMode::None);
    assert_eq!(tracker.generation(), 0);
}

#[test]
fn selecting_mode_activates_it() {
    let mut tracker = GestureTracker::new();
    let actions = tracker.select_mode(DrawingMode::Circle);
    assert_eq!(tracker.mode(), DrawingMode::Circle);
    assert_eq!(actions[0], Action::ModeActivated { mode: DrawingMode::Circle, generation: 1 });
    assert!(has_render_needed(&actions));
}

#[test]
fn selecting_active_mode_toggles_off_without_emitting() {
    let mut tracker = tracker_in(DrawingMode::Rectangle);
    let actions = tracker.select_mode(DrawingMode::Rectangle);
    assert_eq!(tracker.mode(), DrawingMode::None);
    assert!(matches!(actions[0], Action::ModeCleared { generation: 2 }));
    assert!(finished(&actions).is_none());
}

#[test]
fn selecting_none_clears() {
    let mut tracker = tracker_in(DrawingMode::FreehandLine);
    let actions = tracker.select_mode(DrawingMode::None);
    assert_eq!(tracker.mode(), DrawingMode::None);
    assert!(matches!(actions[0], Action::ModeCleared { .. }));
}

#[test]
fn every_selection_bumps_generation() {
    let mut tracker = GestureTracker::new();
    tracker.select_mode(DrawingMode::Circle);
    tracker.select_mode(DrawingMode::Rectangle);
    tracker.select_mode(DrawingMode::Rectangle);
    assert_eq!(tracker.generation(), 3);
}

#[test]
fn shared_generation_counter_is_visible() {
    let counter = Arc::new(AtomicU64::new(10));
    let mut tracker = GestureTracker::with_generation(Arc::clone(&counter));
    tracker.select_mode(DrawingMode::Circle);
    assert_eq!(counter.load(Ordering::SeqCst), 11);
}

#[test]
fn switching_mode_mid_gesture_discards_state() {
    let mut tracker = tracker_in(DrawingMode::FreehandLine);
    tracker.on_pointer_down(pt(0.0, 0.0));
    tracker.on_pointer_move(pt(10.0, 10.0));

    tracker.select_mode(DrawingMode::Circle);
    let TrackerState::Tracking(session) = tracker.state() else {
        panic!("expected tracking state");
    };
    assert_eq!(session.mode, DrawingMode::Circle);
    assert!(session.start.is_none());

    // The old finger lifting produces nothing.
    let actions = tracker.on_pointer_up(pt(20.0, 20.0));
    assert!(actions.is_empty());
    assert_eq!(tracker.mode(), DrawingMode::Circle);
}

// =============================================================
// Idle / out-of-order events
// =============================================================

#[test]
fn pointer_events_ignored_when_idle() {
    let mut tracker = GestureTracker::new();
    assert!(tracker.on_pointer_down(pt(1.0, 1.0)).is_empty());
    assert!(tracker.on_pointer_move(pt(2.0, 2.0)).is_empty());
    assert!(tracker.on_pointer_up(pt(3.0, 3.0)).is_empty());
    assert_eq!(*tracker.state(), TrackerState::Idle);
}

#[test]
fn move_and_up_without_down_are_ignored() {
    let mut tracker = tracker_in(DrawingMode::Circle);
    assert!(tracker.on_pointer_move(pt(5.0, 5.0)).is_empty());
    assert!(tracker.on_pointer_up(pt(5.0, 5.0)).is_empty());
    assert_eq!(tracker.mode(), DrawingMode::Circle);
}

#[test]
fn handle_dispatches_events() {
    let mut tracker = GestureTracker::new();
    tracker.handle(InputEvent::SelectMode(DrawingMode::Rectangle));
    tracker.handle(InputEvent::PointerDown(pt(10.0, 10.0)));
    tracker.handle(InputEvent::PointerMove(pt(30.0, 40.0)));
    let actions = tracker.handle(InputEvent::PointerUp(pt(30.0, 40.0)));
    let f = finished(&actions).unwrap();
    assert_eq!(f.geometry, GestureGeometry::Rectangle { origin: pt(10.0, 10.0), width: 20.0, height: 30.0 });
}

// =============================================================
// Freehand line
// =============================================================

#[test]
fn line_accumulates_points_and_path() {
    let mut tracker = tracker_in(DrawingMode::FreehandLine);
    tracker.on_pointer_down(pt(1.0, 1.0));
    tracker.on_pointer_move(pt(2.0, 3.0));
    tracker.on_pointer_move(pt(4.0, 5.0));

    let TrackerState::Tracking(GestureSession { stroke: Stroke::Line { points, path }, .. }) = tracker.state() else {
        panic!("expected line stroke");
    };
    assert_eq!(points, &vec![pt(1.0, 1.0), pt(2.0, 3.0), pt(4.0, 5.0)]);
    assert_eq!(path.as_str(), "M1 1 L2 3 L4 5");
}

#[test]
fn line_end_appends_final_point() {
    let mut tracker = tracker_in(DrawingMode::FreehandLine);
    let actions = drag(&mut tracker, pt(0.0, 0.0), &[pt(10.0, 0.0), pt(10.0, 10.0)], pt(0.0, 10.0));
    let f = finished(&actions).unwrap();
    assert_eq!(
        f.geometry,
        GestureGeometry::Line { points: vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)] }
    );
    assert_eq!(f.mode(), DrawingMode::FreehandLine);
    assert!(!f.is_degenerate());
}

#[test]
fn line_end_goes_through_the_same_accumulation_as_moves() {
    let mut stroke = Stroke::empty_for(DrawingMode::FreehandLine).unwrap();
    let start = pt(0.0, 0.0);
    let Stroke::Line { points, path } = &mut stroke else {
        panic!("expected line stroke");
    };
    points.push(start);
    path.move_to(start);

    stroke.track(pt(10.0, 0.0), start);
    stroke.track(pt(0.0, 10.0), start);
    let Stroke::Line { points, path } = &stroke else {
        panic!("expected line stroke");
    };
    assert_eq!(points.len(), 3);
    assert_eq!(path.as_str(), "M0 0 L10 0 L0 10");
}

#[test]
fn pointer_down_reports_gesture_start() {
    let mut tracker = tracker_in(DrawingMode::Rectangle);
    let actions = tracker.on_pointer_down(pt(1.0, 2.0));
    assert_eq!(actions[0], Action::GestureStarted { generation: 1 });
    assert!(has_render_needed(&actions));
}

// =============================================================
// Circle
// =============================================================

#[test]
fn circle_radius_is_translation_length() {
    let mut tracker = tracker_in(DrawingMode::Circle);
    tracker.on_pointer_down(pt(100.0, 100.0));
    tracker.on_pointer_move(pt(130.0, 140.0));

    let TrackerState::Tracking(GestureSession { stroke: Stroke::Circle { center, radius }, .. }) = tracker.state()
    else {
        panic!("expected circle stroke");
    };
    assert_eq!(*center, pt(100.0, 100.0));
    assert_eq!(*radius, 50.0);
}

#[test]
fn circle_emits_center_and_last_radius() {
    let mut tracker = tracker_in(DrawingMode::Circle);
    let actions = drag(&mut tracker, pt(50.0, 50.0), &[pt(53.0, 54.0), pt(56.0, 58.0)], pt(56.0, 58.0));
    let f = finished(&actions).unwrap();
    assert_eq!(f.geometry, GestureGeometry::Circle { center: pt(50.0, 50.0), radius_px: 10.0 });
    assert_eq!(f.generation, 1);
}

#[test]
fn circle_radius_doubles_with_drag_distance() {
    let mut a = tracker_in(DrawingMode::Circle);
    let mut b = tracker_in(DrawingMode::Circle);
    let ra = drag(&mut a, pt(0.0, 0.0), &[pt(30.0, 40.0)], pt(30.0, 40.0));
    let rb = drag(&mut b, pt(0.0, 0.0), &[pt(60.0, 80.0)], pt(60.0, 80.0));
    let (Some(GestureGeometry::Circle { radius_px: r1, .. }), Some(GestureGeometry::Circle { radius_px: r2, .. })) =
        (finished(&ra).map(|f| &f.geometry), finished(&rb).map(|f| &f.geometry))
    else {
        panic!("expected two circles");
    };
    assert_eq!(*r2, 2.0 * *r1);
}

// =============================================================
// Rectangle
// =============================================================

#[test]
fn rectangle_extent_is_signed() {
    let mut tracker = tracker_in(DrawingMode::Rectangle);
    let actions = drag(&mut tracker, pt(100.0, 100.0), &[pt(60.0, 30.0)], pt(60.0, 30.0));
    let f = finished(&actions).unwrap();
    assert_eq!(f.geometry, GestureGeometry::Rectangle { origin: pt(100.0, 100.0), width: -40.0, height: -70.0 });
}

#[test]
fn rectangle_keeps_last_move_extent() {
    let mut tracker = tracker_in(DrawingMode::Rectangle);
    let actions = drag(&mut tracker, pt(0.0, 0.0), &[pt(10.0, 20.0)], pt(15.0, 25.0));
    let f = finished(&actions).unwrap();
    assert_eq!(f.geometry, GestureGeometry::Rectangle { origin: pt(0.0, 0.0), width: 10.0, height: 20.0 });
}

// =============================================================
// Single-shot and degenerate gestures
// =============================================================

#[test]
fn gesture_end_returns_to_idle_without_bumping_generation() {
    let mut tracker = tracker_in(DrawingMode::Circle);
    drag(&mut tracker, pt(0.0, 0.0), &[pt(5.0, 0.0)], pt(5.0, 0.0));
    assert_eq!(tracker.mode(), DrawingMode::None);
    assert_eq!(tracker.generation(), 1);

    // A second drag needs a fresh selection.
    assert!(drag(&mut tracker, pt(0.0, 0.0), &[pt(5.0, 0.0)], pt(5.0, 0.0)).is_empty());
}

#[test]
fn zero_movement_gestures_still_emit_once() {
    for mode in [DrawingMode::FreehandLine, DrawingMode::Circle, DrawingMode::Rectangle] {
        let mut tracker = tracker_in(mode);
        let actions = drag(&mut tracker, pt(7.0, 7.0), &[], pt(7.0, 7.0));
        let emitted: Vec<_> = actions.iter().filter(|a| matches!(a, Action::Finished(_))).collect();
        assert_eq!(emitted.len(), 1, "{mode:?}");
        let f = finished(&actions).unwrap();
        assert_eq!(f.mode(), mode);
        assert!(f.is_degenerate(), "{mode:?}");
    }
}
