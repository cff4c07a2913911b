//! Track module - everything static about the run
//!
//! This module provides:
//! - Geometry helpers (distance, snapped interpolation, projection)
//! - `TrackPath`, the closed polyline the marker follows
//! - `SensorGrid`, the toggleable sample points along each segment
//! - `FinishMarker`, exits that end a run
//! - The built-in maze layout

pub mod geometry;
pub mod maze;
mod finish;
mod path;
mod sensors;

pub use finish::{reached, FinishMarker};
pub use geometry::Point;
pub use path::{CanvasFit, TrackPath};
pub use sensors::{label_for, SamplePoint, SensorGrid, MAX_SAMPLES_PER_SEGMENT};
