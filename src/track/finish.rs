//! Finish markers - exits that stop the marker when it gets close

use super::geometry::{distance, Point};

/// A point off the sample grid whose proximity ends a run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinishMarker {
    /// Identifier reported on arrival
    pub ref_index: usize,
    pub position: Point,
}

impl FinishMarker {
    pub fn new(ref_index: usize, x: f64, y: f64) -> Self {
        Self {
            ref_index,
            position: Point::new(x, y),
        }
    }

    /// Whether `p` is strictly within `tolerance` of this marker
    pub fn is_reached(&self, p: &Point, tolerance: f64) -> bool {
        distance(&self.position, p) < tolerance
    }
}

/// First marker (in list order) within `tolerance` of `p`
pub fn reached<'a>(markers: &'a [FinishMarker], p: &Point, tolerance: f64) -> Option<&'a FinishMarker> {
    markers.iter().find(|m| m.is_reached(p, tolerance))
}
