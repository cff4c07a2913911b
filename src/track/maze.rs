//! The built-in maze layout
//!
//! Waypoints are given in raw layout coordinates and are expected to go
//! through `TrackPath::centered`. Finish markers are absolute canvas
//! positions and are not moved by centering.

use super::finish::FinishMarker;
use super::geometry::Point;

const WAYPOINTS: [(f64, f64); 14] = [
    (235.0, 75.0),
    (720.0, 75.0),
    (720.0, 258.0),
    (598.0, 258.0),
    (598.0, 458.0),
    (327.0, 458.0),
    (327.0, 565.0),
    (327.0, 428.0),
    (215.0, 428.0),
    (215.0, 205.0),
    (165.0, 205.0),
    (165.0, 130.0),
    (285.0, 130.0),
    (285.0, 75.0),
];

/// Waypoints of the maze, in travel order
pub fn waypoints() -> Vec<Point> {
    WAYPOINTS.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// The two exits of the maze
pub fn finish_markers() -> Vec<FinishMarker> {
    vec![
        FinishMarker::new(2, 320.0, 570.0),
        FinishMarker::new(0, 230.0, 70.0),
    ]
}
