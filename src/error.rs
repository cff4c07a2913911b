//! Error types for track construction and sample lookups

use thiserror::Error;

/// Errors that can occur while building or querying a track
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("A closed path needs at least 2 waypoints, got {0}")]
    TooFewWaypoints(usize),

    #[error("Sample spacing must be a positive finite number, got {0}")]
    InvalidSpacing(f64),

    #[error("Speed must be a positive finite number, got {0}")]
    InvalidSpeed(f64),

    #[error("Finish tolerance must be a non-negative finite number, got {0}")]
    InvalidTolerance(f64),

    #[error("Samples per segment must be within 2..={max}, got {cap}")]
    InvalidSampleCap { cap: usize, max: usize },

    #[error("Segment {segment} is out of range (path has {count} segments)")]
    SegmentOutOfRange { segment: usize, count: usize },

    #[error("Sample {index} is out of range on segment {segment} ({count} samples)")]
    SampleOutOfRange {
        segment: usize,
        index: usize,
        count: usize,
    },
}

/// Convenience alias for track results
pub type Result<T> = std::result::Result<T, TrackError>;
