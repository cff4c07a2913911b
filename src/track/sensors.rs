//! Sensor grid - evenly spaced sample points ("dots") along every segment
//!
//! Each dot can be toggled blocked/unblocked. The traversal logic asks the grid
//! whether a blocked dot lies between two ratios on a segment before it
//! commits a move.
//!
//! ## Layout
//!
//! Dots are stored per segment, so `dots[segment][index]` is the dot at
//! fraction `index / (count - 1)` along that segment. Dot 0 sits on the
//! segment's start waypoint and, on axis-aligned segments, the last dot sits
//! on its end waypoint.

use super::geometry::{interpolate, Point};
use super::path::TrackPath;
use crate::error::{Result, TrackError};

/// Labels handed out along a segment, reset for every segment
const LABELS: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Upper bound for samples per segment (one per label)
pub const MAX_SAMPLES_PER_SEGMENT: usize = LABELS.len();

/// Tolerance used when matching dot fractions against a ratio range
const RATIO_EPSILON: f64 = 1e-9;

/// A single sample point on a segment
#[derive(Clone, Debug, PartialEq)]
pub struct SamplePoint {
    /// Segment this dot belongs to
    pub segment: usize,
    /// Position within the segment, 0 at the start waypoint
    pub index: usize,
    pub position: Point,
    pub label: char,
    pub blocked: bool,
}

/// Label for the `k`th dot of a segment, clamped to the last letter
pub fn label_for(k: usize) -> char {
    LABELS[k.min(LABELS.len() - 1)]
}

/// Fraction along the segment for dot `k` out of `count`
fn fraction(k: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        k as f64 / (count - 1) as f64
    }
}

/// All sample points of a track, grouped by segment
#[derive(Clone, Debug)]
pub struct SensorGrid {
    dots: Vec<Vec<SamplePoint>>,
    spacing: f64,
    max_per_segment: usize,
}

impl SensorGrid {
    /// Build the grid for `path`
    ///
    /// # Arguments
    /// * `spacing` - Desired distance between neighbouring dots
    /// * `max_per_segment` - Cap on dots per segment, at most 26
    pub fn generate(path: &TrackPath, spacing: f64, max_per_segment: usize) -> Result<Self> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(TrackError::InvalidSpacing(spacing));
        }
        if !(2..=MAX_SAMPLES_PER_SEGMENT).contains(&max_per_segment) {
            return Err(TrackError::InvalidSampleCap {
                cap: max_per_segment,
                max: MAX_SAMPLES_PER_SEGMENT,
            });
        }

        let mut grid = Self {
            dots: Vec::new(),
            spacing,
            max_per_segment,
        };
        grid.regenerate(path);
        Ok(grid)
    }

    /// Throw away every dot and rebuild from `path`
    ///
    /// Block flags do not survive a rebuild.
    pub fn regenerate(&mut self, path: &TrackPath) {
        self.dots.clear();

        for segment in 0..path.segment_count() {
            let (start, end) = path.segment(segment);
            let length = path.segment_length(segment);
            // Clamp before casting, length / spacing is unbounded
            let count = ((length / self.spacing).round() + 1.0).clamp(2.0, self.max_per_segment as f64)
                as usize;

            let dots = (0..count)
                .map(|k| SamplePoint {
                    segment,
                    index: k,
                    position: interpolate(&start, &end, fraction(k, count), true),
                    label: label_for(k),
                    blocked: false,
                })
                .collect();
            self.dots.push(dots);
        }

        log::debug!(
            "Generated {} sample points over {} segments",
            self.len(),
            self.dots.len()
        );
    }

    pub fn segment_count(&self) -> usize {
        self.dots.len()
    }

    /// Dots of one segment, empty if the segment does not exist
    pub fn segment(&self, segment: usize) -> &[SamplePoint] {
        self.dots.get(segment).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of dots across all segments
    pub fn len(&self) -> usize {
        self.dots.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every dot, segment by segment
    pub fn iter(&self) -> impl Iterator<Item = &SamplePoint> {
        self.dots.iter().flatten()
    }

    pub fn get(&self, segment: usize, index: usize) -> Option<&SamplePoint> {
        self.dots.get(segment)?.get(index)
    }

    fn get_mut(&mut self, segment: usize, index: usize) -> Result<&mut SamplePoint> {
        let count = self.dots.len();
        let dots = self
            .dots
            .get_mut(segment)
            .ok_or(TrackError::SegmentOutOfRange { segment, count })?;
        let count = dots.len();
        dots.get_mut(index)
            .ok_or(TrackError::SampleOutOfRange { segment, index, count })
    }

    /// Flip the blocked flag of a dot, returning its new state
    pub fn toggle(&mut self, segment: usize, index: usize) -> Result<bool> {
        let dot = self.get_mut(segment, index)?;
        dot.blocked = !dot.blocked;
        Ok(dot.blocked)
    }

    /// Set the blocked flag of a dot
    pub fn set_blocked(&mut self, segment: usize, index: usize, blocked: bool) -> Result<()> {
        self.get_mut(segment, index)?.blocked = blocked;
        Ok(())
    }

    /// Clear every blocked flag
    pub fn reset_all(&mut self) {
        for dot in self.dots.iter_mut().flatten() {
            dot.blocked = false;
        }
    }

    pub fn blocked_count(&self) -> usize {
        self.iter().filter(|d| d.blocked).count()
    }

    /// First blocked dot on `segment` whose fraction lies between the two ratios
    ///
    /// The order of `ratio_a` and `ratio_b` does not matter. Dots sitting
    /// exactly on either bound count as between. Scans in index order, so the
    /// lowest-index match wins. An unknown segment yields `None`.
    pub fn find_blocked_between(
        &self,
        segment: usize,
        ratio_a: f64,
        ratio_b: f64,
    ) -> Option<&SamplePoint> {
        let dots = self.dots.get(segment)?;
        let low = ratio_a.min(ratio_b);
        let high = ratio_a.max(ratio_b);
        let count = dots.len();

        dots.iter().enumerate().find_map(|(k, dot)| {
            let t = fraction(k, count);
            let in_range = t + RATIO_EPSILON >= low && t - RATIO_EPSILON <= high;
            (in_range && dot.blocked).then_some(dot)
        })
    }
}
