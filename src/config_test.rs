#![allow(clippy::float_cmp)]

use std::sync::Mutex;

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

const KEYS: [&str; 7] = [
    "SKETCH_PLATFORM",
    "SKETCH_SCALE_PROBE_PX",
    "SKETCH_LABEL_MIN_RADIUS_PX",
    "SKETCH_LABEL_MIN_WIDTH_PX",
    "SKETCH_LABEL_MIN_HEIGHT_PX",
    "SKETCH_CIRCLE_SEGMENTS",
    "SKETCH_INPUT_QUEUE_CAPACITY",
];

/// # Safety
/// Callers hold `ENV_LOCK` so no other test touches these vars concurrently.
unsafe fn clear_sketch_env() {
    for key in KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: usize = env_parse("__SKETCH_TEST_NONEXISTENT__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__SKETCH_TEST_EP_VALID__", " 12.5 ") };
    let val: f64 = env_parse("__SKETCH_TEST_EP_VALID__", 0.0);
    assert_eq!(val, 12.5);
    unsafe { std::env::remove_var("__SKETCH_TEST_EP_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__SKETCH_TEST_EP_INVALID__", "wide") };
    let val: usize = env_parse("__SKETCH_TEST_EP_INVALID__", 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var("__SKETCH_TEST_EP_INVALID__") };
}

// =============================================================================
// SketchConfig::from_env
// =============================================================================

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_sketch_env() };

    let cfg = SketchConfig::from_env().unwrap();
    assert_eq!(cfg, SketchConfig::default());
    assert_eq!(cfg.platform, Platform::Ios);
    assert_eq!(cfg.scale_probe_px, 100.0);
    assert_eq!(cfg.labels.radius_px, 90.0);
    assert_eq!(cfg.labels.width_px, 90.0);
    assert_eq!(cfg.labels.height_px, 60.0);
    assert_eq!(cfg.circle_segments, 64);
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_sketch_env();
        std::env::set_var("SKETCH_PLATFORM", "Android");
        std::env::set_var("SKETCH_SCALE_PROBE_PX", "50");
        std::env::set_var("SKETCH_LABEL_MIN_RADIUS_PX", "10");
        std::env::set_var("SKETCH_CIRCLE_SEGMENTS", "1");
        std::env::set_var("SKETCH_INPUT_QUEUE_CAPACITY", "0");
    }

    let cfg = SketchConfig::from_env().unwrap();
    assert_eq!(cfg.platform, Platform::Android);
    assert_eq!(cfg.scale_probe_px, 50.0);
    assert_eq!(cfg.labels.radius_px, 10.0);
    assert_eq!(cfg.circle_segments, 3);
    assert_eq!(cfg.input_queue_capacity, 1);

    unsafe { clear_sketch_env() };
}

#[test]
fn from_env_rejects_unknown_platform() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_sketch_env();
        std::env::set_var("SKETCH_PLATFORM", "symbian");
    }

    let err = SketchConfig::from_env().unwrap_err();
    assert!(matches!(err, SketchError::ConfigParse(ref msg) if msg.contains("symbian")));

    unsafe { clear_sketch_env() };
}

#[test]
fn from_env_rejects_non_positive_probe() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_sketch_env();
        std::env::set_var("SKETCH_SCALE_PROBE_PX", "0");
    }

    assert!(matches!(SketchConfig::from_env(), Err(SketchError::ConfigParse(_))));

    unsafe { clear_sketch_env() };
}

#[test]
fn from_env_rejects_non_finite_probe() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    for raw in ["NaN", "inf", "-inf"] {
        unsafe {
            clear_sketch_env();
            std::env::set_var("SKETCH_SCALE_PROBE_PX", raw);
        }
        assert!(matches!(SketchConfig::from_env(), Err(SketchError::ConfigParse(_))), "{raw}");
    }

    unsafe { clear_sketch_env() };
}

#[test]
fn from_env_rejects_non_finite_label_threshold() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_sketch_env();
        std::env::set_var("SKETCH_LABEL_MIN_HEIGHT_PX", "NaN");
    }

    let err = SketchConfig::from_env().unwrap_err();
    assert!(matches!(err, SketchError::ConfigParse(ref msg) if msg.contains("SKETCH_LABEL_MIN_HEIGHT_PX")));

    unsafe { clear_sketch_env() };
}

// =============================================================================
// Platform
// =============================================================================

#[test]
fn platform_label_offsets() {
    assert_eq!(Platform::Ios.label_offset_px(), 10.5);
    assert_eq!(Platform::Android.label_offset_px(), 15.5);
}
