//! Traversal state - where the marker is and which way it is heading

use crate::track::Point;

/// Travel direction along the segment order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// +1 for forward, -1 for backward
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "back",
        }
    }
}

/// Progress of the marker along the path
///
/// `ratio` is always relative to segment `segment` (waypoint `segment` to
/// waypoint `segment + 1`), whichever way the marker is moving.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TraversalState {
    pub segment: usize,
    pub ratio: f64,
    pub direction: Direction,
    pub moving: bool,
}

/// Status shown on the start/stop control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Advancing,
    Finished,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Advancing => "advancing",
            Status::Finished => "finished",
        }
    }
}

/// Where the marker physically is relative to the path
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// On the path at the traversal state's segment and ratio
    OnPath,
    /// Snapped to a finish marker by `start`; segment and ratio are stale
    AtFinish { ref_index: usize },
    /// Dragged somewhere by the user; segment and ratio are stale
    Free,
}

/// Something noteworthy that happened during a tick
#[derive(Clone, Debug, PartialEq)]
pub enum TickEvent {
    /// A blocked dot turned the marker around
    ObstacleHit {
        segment: usize,
        index: usize,
        label: char,
    },
    /// The marker reached a finish marker and stopped
    Finished { ref_index: usize },
}

/// Outcome of a single tick, for display
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub position: Point,
    pub segment: usize,
    pub direction: Direction,
    pub status: Status,
    pub event: Option<TickEvent>,
}
