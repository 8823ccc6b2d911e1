//! Gesture-to-geometry core for sketching shapes on top of a map view.
//!
//! A touch surface sits over a host map. The user picks a drawing mode, drags
//! a finger, and this crate turns the drag into a geographic shape: a polygon
//! (freehand trace closed into its convex hull, or a rectangle) or a circle.
//! The host map is reached only through the [`projector::HostMap`] trait, and
//! the overlay is described as a display list the host draws however it likes.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Gesture task + projection task joined by a single-slot handoff |
//! | [`tracker`] | Gesture state machine accumulating per-mode screen geometry |
//! | [`projector`] | Screen → geo conversion, scale factor, shape reconstruction |
//! | [`preview`] | Live preview display list and toolbar state |
//! | [`input`] | Drawing modes and pointer event types |
//! | [`geo`] | Screen/geo point types, haversine, convex hull |
//! | [`shape`] | Shape payloads and GeoJSON encoding |
//! | [`viewport`] | Web-Mercator region viewport usable as a host map |
//! | [`config`] | Environment-driven configuration |
//! | [`error`] | Error taxonomy |
//! | [`consts`] | Shared numeric constants |

pub mod config;
pub mod consts;
pub mod error;
pub mod geo;
pub mod input;
pub mod preview;
pub mod projector;
pub mod session;
pub mod shape;
pub mod tracker;
pub mod viewport;

pub use config::{Platform, SketchConfig};
pub use error::SketchError;
pub use geo::{GeoPoint, ScaleFactor, ScreenPoint};
pub use input::{DrawingMode, InputEvent};
pub use projector::{HostMap, Projector};
pub use session::{DrawEndSink, Emission, SketchHandle, spawn_sketch};
pub use shape::ShapeResult;
pub use tracker::{FinishedGesture, GestureTracker};
