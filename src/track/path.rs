//! Track path - the closed sequence of waypoints the marker follows
//!
//! Segment `i` runs from waypoint `i` to waypoint `(i + 1) % len`, so the
//! last segment wraps back to the first waypoint.

use serde::{Deserialize, Serialize};

use super::geometry::{distance, Point};
use crate::error::{Result, TrackError};

/// Logical canvas the layout is centered in, plus a manual nudge
///
/// The nudge is applied after centering. Positive `fine_tune_y` moves the
/// layout down.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasFit {
    pub width: f64,
    pub height: f64,
    pub fine_tune_x: f64,
    pub fine_tune_y: f64,
}

impl Default for CanvasFit {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            fine_tune_x: 40.0,
            fine_tune_y: 22.0,
        }
    }
}

/// A closed polyline
#[derive(Clone, Debug)]
pub struct TrackPath {
    /// Waypoints in travel order
    waypoints: Vec<Point>,
    /// Cached segment lengths, indexed like segments
    segment_lengths: Vec<f64>,
}

impl TrackPath {
    /// Create a closed path from waypoints, used as given
    pub fn new(waypoints: Vec<Point>) -> Result<Self> {
        if waypoints.len() < 2 {
            return Err(TrackError::TooFewWaypoints(waypoints.len()));
        }

        let n = waypoints.len();
        let segment_lengths = (0..n)
            .map(|i| distance(&waypoints[i], &waypoints[(i + 1) % n]))
            .collect();

        Ok(Self {
            waypoints,
            segment_lengths,
        })
    }

    /// Create a closed path whose bounding box is centered in `canvas`
    ///
    /// This is a one-time transform: the waypoints are moved once and then
    /// stay fixed for the lifetime of the path.
    pub fn centered(mut waypoints: Vec<Point>, canvas: &CanvasFit) -> Result<Self> {
        if waypoints.len() < 2 {
            return Err(TrackError::TooFewWaypoints(waypoints.len()));
        }

        let (min_x, max_x, min_y, max_y) = waypoints.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(min_x, max_x, min_y, max_y), p| {
                (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
            },
        );

        let offset_x = (canvas.width - (max_x - min_x)) / 2.0 - min_x + canvas.fine_tune_x;
        let offset_y = (canvas.height - (max_y - min_y)) / 2.0 - min_y + canvas.fine_tune_y;

        for p in &mut waypoints {
            p.x += offset_x;
            p.y += offset_y;
        }

        log::debug!(
            "Centered {} waypoints with offset ({:.1}, {:.1})",
            waypoints.len(),
            offset_x,
            offset_y
        );

        Self::new(waypoints)
    }

    /// Number of segments (equal to the number of waypoints, the path is closed)
    pub fn segment_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Waypoint `i`, wrapping around the ends
    pub fn waypoint(&self, i: usize) -> Point {
        self.waypoints[i % self.waypoints.len()]
    }

    /// Start and end of segment `i`, wrapping around the ends
    pub fn segment(&self, i: usize) -> (Point, Point) {
        (self.waypoint(i), self.waypoint(i + 1))
    }

    /// Length of segment `i`, wrapping around the ends
    pub fn segment_length(&self, i: usize) -> f64 {
        self.segment_lengths[i % self.segment_lengths.len()]
    }

    /// Normalise any signed segment index into `[0, segment_count)`
    pub fn wrap_index(&self, i: isize) -> usize {
        i.rem_euclid(self.segment_count() as isize) as usize
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }
}
