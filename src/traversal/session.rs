//! Session - the single owner of all mutable run state
//!
//! A `Session` holds the track, the sensor grid, the marker and its traversal
//! state. Every user action and every animation frame is a `&mut self` method,
//! so ticks never overlap and user input always lands between two ticks.
//!
//! ## Driving a session
//!
//! The caller owns the loop and decides the cadence (one `tick()` per display
//! refresh in an interactive front end, as fast as possible in the headless
//! runner):
//!
//! ```no_run
//! use rat_run::{maze, Session, Settings};
//!
//! let mut session = Session::initialize(maze::waypoints(), maze::finish_markers(), &Settings::default())?;
//! session.on_start_stop_toggle();
//! loop {
//!     let report = session.tick();
//!     if !session.state().moving {
//!         break;
//!     }
//! #   let _ = report;
//! }
//! # Ok::<(), rat_run::TrackError>(())
//! ```

use super::deferred::UnblockQueue;
use super::state::{Direction, Placement, Status, TickEvent, TickReport, TraversalState};
use crate::error::{Result, TrackError};
use crate::settings::Settings;
use crate::track::geometry::{distance, interpolate, project_onto_segment};
use crate::track::{reached, FinishMarker, Point, SamplePoint, SensorGrid, TrackPath};

/// A running maze
pub struct Session {
    path: TrackPath,
    grid: SensorGrid,
    finish_markers: Vec<FinishMarker>,

    state: TraversalState,
    status: Status,
    /// Rendered marker position
    marker: Point,
    placement: Placement,

    /// Logical clock, one unit per tick
    clock: u64,
    unblocks: UnblockQueue,
    /// Last obstacle that turned the marker around, cleared on the next free move
    last_obstacle: Option<TickEvent>,

    speed: f64,
    finish_tolerance: f64,
    unblock_delay_ticks: u64,
}

impl Session {
    /// Build the path and sensor grid and put the marker on the first waypoint
    ///
    /// Waypoints are centered on the canvas when `settings.canvas` is set.
    /// Finish markers are used as given.
    pub fn initialize(
        waypoints: Vec<Point>,
        finish_markers: Vec<FinishMarker>,
        settings: &Settings,
    ) -> Result<Self> {
        if !settings.speed.is_finite() || settings.speed <= 0.0 {
            return Err(TrackError::InvalidSpeed(settings.speed));
        }
        if !settings.finish_tolerance.is_finite() || settings.finish_tolerance < 0.0 {
            return Err(TrackError::InvalidTolerance(settings.finish_tolerance));
        }

        let path = match &settings.canvas {
            Some(canvas) => TrackPath::centered(waypoints, canvas)?,
            None => TrackPath::new(waypoints)?,
        };
        let grid = SensorGrid::generate(&path, settings.spacing, settings.max_per_segment)?;
        let marker = path.waypoint(0);

        log::info!(
            "Session ready: {} segments, {} sample points, {} finish markers",
            path.segment_count(),
            grid.len(),
            finish_markers.len()
        );

        Ok(Self {
            path,
            grid,
            finish_markers,
            state: TraversalState::default(),
            status: Status::Idle,
            marker,
            placement: Placement::OnPath,
            clock: 0,
            unblocks: UnblockQueue::new(),
            last_obstacle: None,
            speed: settings.speed,
            finish_tolerance: settings.finish_tolerance,
            unblock_delay_ticks: settings.unblock_delay_ticks,
        })
    }

    pub fn path(&self) -> &TrackPath {
        &self.path
    }

    pub fn grid(&self) -> &SensorGrid {
        &self.grid
    }

    /// Every sample point, for rendering
    pub fn sample_points(&self) -> impl Iterator<Item = &SamplePoint> {
        self.grid.iter()
    }

    pub fn finish_markers(&self) -> &[FinishMarker] {
        &self.finish_markers
    }

    pub fn state(&self) -> &TraversalState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn marker(&self) -> Point {
        self.marker
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn last_obstacle(&self) -> Option<&TickEvent> {
        self.last_obstacle.as_ref()
    }

    /// Toggle the dot the user clicked, returning its new blocked state
    ///
    /// Unknown dots are ignored and yield `None`.
    pub fn on_sample_click(&mut self, segment: usize, index: usize) -> Option<bool> {
        match self.grid.toggle(segment, index) {
            Ok(blocked) => {
                log::debug!("Dot {}:{} blocked={}", segment, index, blocked);
                Some(blocked)
            }
            Err(e) => {
                log::warn!("Ignoring click: {}", e);
                None
            }
        }
    }

    /// Clear every obstacle
    pub fn on_reset_blocks(&mut self) {
        self.grid.reset_all();
        log::info!("All obstacles cleared");
    }

    /// Start when idle, stop when advancing
    pub fn on_start_stop_toggle(&mut self) -> Status {
        if self.state.moving {
            self.stop();
        } else {
            self.start();
        }
        self.status
    }

    /// Move the marker by hand
    ///
    /// Only allowed while idle. Segment and ratio are left alone and get
    /// recomputed on the next start.
    pub fn on_drag_marker(&mut self, position: Point) -> bool {
        if self.state.moving {
            log::debug!("Drag rejected while advancing");
            return false;
        }
        self.marker = position;
        self.placement = Placement::Free;
        true
    }

    fn start(&mut self) {
        self.place_at_nearest();
        self.state.moving = true;
        self.status = Status::Advancing;
        log::info!(
            "Started at ({:.1}, {:.1}) on segment {}",
            self.marker.x,
            self.marker.y,
            self.state.segment
        );
    }

    fn stop(&mut self) {
        self.state.moving = false;
        self.status = Status::Idle;
        log::info!("Stopped on segment {}", self.state.segment);
    }

    /// Snap the marker to the closest point of the path, or to a finish
    /// marker if one is closer still
    fn place_at_nearest(&mut self) {
        let mut best = None;
        let mut best_dist = f64::INFINITY;

        for segment in 0..self.path.segment_count() {
            let (start, end) = self.path.segment(segment);
            // Zero-length segments are skipped
            if let Some(proj) = project_onto_segment(&self.marker, &start, &end) {
                if proj.distance < best_dist {
                    best_dist = proj.distance;
                    best = Some((segment, proj.t));
                }
            }
        }

        let mut finish = None;
        for marker in &self.finish_markers {
            let d = distance(&self.marker, &marker.position);
            if d < best_dist {
                best_dist = d;
                finish = Some(*marker);
            }
        }

        if let Some(marker) = finish {
            // Parked off-path: segment and ratio stay as they were
            self.marker = marker.position;
            self.placement = Placement::AtFinish {
                ref_index: marker.ref_index,
            };
        } else if let Some((segment, t)) = best {
            self.state.segment = segment;
            self.state.ratio = t;
            self.marker = self.position_on_path();
            self.placement = Placement::OnPath;
        }
    }

    /// Interpolated position for the current segment and ratio
    fn position_on_path(&self) -> Point {
        let (start, end) = self.path.segment(self.state.segment);
        interpolate(&start, &end, self.state.ratio, true)
    }

    /// Fire every deferred unblock that has come due
    fn fire_due_unblocks(&mut self) {
        for pending in self.unblocks.drain_due(self.clock) {
            if let Err(e) = self.grid.set_blocked(pending.segment, pending.index, false) {
                log::warn!("Deferred unblock skipped: {}", e);
            } else {
                log::debug!("Dot {}:{} reopened", pending.segment, pending.index);
            }
        }
    }

    fn report(&self, event: Option<TickEvent>) -> TickReport {
        TickReport {
            position: self.marker,
            segment: self.state.segment,
            direction: self.state.direction,
            status: self.status,
            event,
        }
    }

    /// Advance one animation frame
    ///
    /// The logical clock advances and due unblocks fire on every call. The
    /// marker only moves while advancing.
    pub fn tick(&mut self) -> TickReport {
        self.clock += 1;
        self.fire_due_unblocks();

        if !self.state.moving {
            return self.report(None);
        }

        let n = self.path.segment_count();
        let current = self.state.segment;
        let direction = self.state.direction;

        // Step length comes from the segment being travelled towards
        let active = match direction {
            Direction::Forward => current,
            Direction::Backward => self.path.wrap_index(current as isize - 1),
        };
        let length = self.path.segment_length(active);
        let length = if length > 0.0 { length } else { 1.0 };
        let proposed = self.state.ratio + self.speed / length * direction.sign();

        let arrived = reached(&self.finish_markers, &self.marker, self.finish_tolerance)
            .map(|marker| marker.ref_index);
        if let Some(ref_index) = arrived {
            self.state.moving = false;
            self.status = Status::Finished;
            log::info!("Reached finish line {}", ref_index);
            return self.report(Some(TickEvent::Finished { ref_index }));
        }

        let check = self.path.wrap_index(current as isize);
        let blocked = self
            .grid
            .find_blocked_between(check, self.state.ratio, proposed)
            .map(|dot| (dot.segment, dot.index, dot.label));

        if let Some((segment, index, label)) = blocked {
            self.state.direction = direction.reversed();
            self.unblocks
                .schedule(self.clock, self.unblock_delay_ticks, segment, index);
            log::debug!(
                "Seg {} dot {} blocked, now heading {}",
                segment,
                label,
                self.state.direction.name()
            );
            let event = TickEvent::ObstacleHit {
                segment,
                index,
                label,
            };
            self.last_obstacle = Some(event.clone());
            return self.report(Some(event));
        }
        self.last_obstacle = None;

        let mut ratio = proposed;
        match direction {
            Direction::Forward if ratio >= 1.0 => {
                ratio -= 1.0;
                self.state.segment = (current + 1) % n;
            }
            Direction::Backward if ratio <= 0.0 => {
                ratio += 1.0;
                self.state.segment = self.path.wrap_index(current as isize - 1);
            }
            _ => {}
        }
        self.state.ratio = ratio.clamp(0.0, 1.0);

        self.marker = self.position_on_path();
        self.placement = Placement::OnPath;

        log::trace!(
            "t={} seg={} ratio={:.3} pos=({:.1}, {:.1})",
            self.clock,
            self.state.segment,
            self.state.ratio,
            self.marker.x,
            self.marker.y
        );

        self.report(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::maze;

    const EPS: f64 = 1e-9;

    fn rectangle() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    fn settings() -> Settings {
        Settings {
            spacing: 5.0,
            speed: 2.0,
            canvas: None,
            ..Settings::default()
        }
    }

    fn session(finish_markers: Vec<FinishMarker>) -> Session {
        Session::initialize(rectangle(), finish_markers, &settings()).unwrap()
    }

    /// Put the marker in motion at an exact spot, bypassing the nearest-point snap
    fn set_moving(session: &mut Session, segment: usize, ratio: f64, direction: Direction) {
        session.state = TraversalState {
            segment,
            ratio,
            direction,
            moving: true,
        };
        session.status = Status::Advancing;
        session.marker = session.position_on_path();
    }

    #[test]
    fn test_initialize() {
        let session = session(vec![]);
        assert_eq!(session.marker(), Point::new(0.0, 0.0));
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.sample_points().count(), 12);
        assert!(session.sample_points().all(|d| !d.blocked));
    }

    #[test]
    fn test_initialize_rejects_bad_input() {
        assert!(Session::initialize(vec![Point::new(0.0, 0.0)], vec![], &settings()).is_err());
        let bad = Settings {
            spacing: -1.0,
            ..settings()
        };
        assert!(Session::initialize(rectangle(), vec![], &bad).is_err());
    }

    #[test]
    fn test_initialize_rejects_bad_speed_and_tolerance() {
        for speed in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let bad = Settings {
                speed,
                ..settings()
            };
            assert!(matches!(
                Session::initialize(rectangle(), vec![], &bad),
                Err(TrackError::InvalidSpeed(_))
            ));
        }

        let bad = Settings {
            finish_tolerance: -1.0,
            ..settings()
        };
        assert!(matches!(
            Session::initialize(rectangle(), vec![], &bad),
            Err(TrackError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn test_start_stop_labels() {
        let mut session = session(vec![]);
        assert_eq!(session.on_start_stop_toggle().label(), "advancing");
        assert_eq!(session.on_start_stop_toggle().label(), "idle");
    }

    #[test]
    fn test_idle_tick_does_not_move() {
        let mut session = session(vec![]);
        let before = *session.state();
        let report = session.tick();
        assert_eq!(*session.state(), before);
        assert_eq!(report.status, Status::Idle);
        assert!(report.event.is_none());
        assert_eq!(session.clock(), 1);
    }

    #[test]
    fn test_forward_step() {
        let mut session = session(vec![]);
        set_moving(&mut session, 0, 0.0, Direction::Forward);
        let report = session.tick();
        assert!((session.state().ratio - 0.2).abs() < EPS);
        assert_eq!(report.position, Point::new(2.0, 0.0));
    }

    #[test]
    fn test_forward_wraparound() {
        let mut session = session(vec![]);
        set_moving(&mut session, 3, 0.99, Direction::Forward);
        let report = session.tick();
        assert_eq!(report.segment, 0);
        assert!((session.state().ratio - 0.19).abs() < EPS);
    }

    #[test]
    fn test_backward_wraparound() {
        let mut session = session(vec![]);
        set_moving(&mut session, 0, 0.1, Direction::Backward);
        session.tick();
        assert_eq!(session.state().segment, 3);
        assert!((session.state().ratio - 0.9).abs() < EPS);
        assert!((session.marker().y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_obstacle_reverses_without_moving() {
        let mut session = session(vec![]);
        assert_eq!(session.on_sample_click(0, 1), Some(true));
        set_moving(&mut session, 0, 0.4, Direction::Forward);
        let before = session.marker();

        let report = session.tick();
        assert_eq!(
            report.event,
            Some(TickEvent::ObstacleHit {
                segment: 0,
                index: 1,
                label: 'b'
            })
        );
        assert_eq!(report.direction, Direction::Backward);
        assert_eq!(session.state().ratio, 0.4);
        assert_eq!(session.marker(), before);
        assert!(session.last_obstacle().is_some());

        // next frame moves away from the dot
        let report = session.tick();
        assert!(report.event.is_none());
        assert!((session.state().ratio - 0.2).abs() < EPS);
        assert!(session.last_obstacle().is_none());
    }

    #[test]
    fn test_obstacle_while_backward_turns_forward() {
        let mut session = session(vec![]);
        session.on_sample_click(0, 1);
        set_moving(&mut session, 0, 0.6, Direction::Backward);
        let before = session.marker();

        let report = session.tick();
        assert_eq!(
            report.event,
            Some(TickEvent::ObstacleHit {
                segment: 0,
                index: 1,
                label: 'b'
            })
        );
        assert_eq!(report.direction, Direction::Forward);
        assert_eq!(session.state().ratio, 0.6);
        assert_eq!(session.state().segment, 0);
        assert_eq!(session.marker(), before);
    }

    #[test]
    fn test_obstacle_clears_after_delay() {
        let settings = Settings {
            unblock_delay_ticks: 3,
            ..settings()
        };
        let mut session = Session::initialize(rectangle(), vec![], &settings).unwrap();
        session.on_sample_click(0, 1);
        set_moving(&mut session, 0, 0.4, Direction::Forward);
        session.tick();
        session.on_start_stop_toggle();

        session.tick();
        session.tick();
        assert!(session.grid().get(0, 1).unwrap().blocked);
        session.tick();
        assert!(!session.grid().get(0, 1).unwrap().blocked);
    }

    #[test]
    fn test_finish_wins_over_obstacle() {
        let mut session = session(vec![FinishMarker::new(7, 0.0, 0.0)]);
        session.on_sample_click(0, 1);
        set_moving(&mut session, 0, 0.4, Direction::Forward);
        session.marker = Point::new(5.0, 5.0);

        let report = session.tick();
        assert_eq!(report.event, Some(TickEvent::Finished { ref_index: 7 }));
        assert_eq!(report.status, Status::Finished);
        assert!(!session.state().moving);
        assert_eq!(session.state().direction, Direction::Forward);
        assert!(session.grid().get(0, 1).unwrap().blocked);
    }

    #[test]
    fn test_start_snaps_to_nearest_segment() {
        let mut session = session(vec![FinishMarker::new(0, 100.0, 100.0)]);
        assert!(session.on_drag_marker(Point::new(4.0, -3.0)));
        assert_eq!(session.placement(), Placement::Free);

        session.on_start_stop_toggle();
        assert_eq!(session.state().segment, 0);
        assert!((session.state().ratio - 0.4).abs() < EPS);
        assert_eq!(session.marker(), Point::new(4.0, 0.0));
        assert_eq!(session.placement(), Placement::OnPath);
    }

    #[test]
    fn test_start_parks_on_closer_finish() {
        let mut session = session(vec![FinishMarker::new(3, 20.0, -2.0)]);
        session.on_drag_marker(Point::new(19.0, -1.0));
        session.on_start_stop_toggle();

        assert_eq!(session.marker(), Point::new(20.0, -2.0));
        assert_eq!(session.placement(), Placement::AtFinish { ref_index: 3 });
        assert_eq!(session.state().segment, 0);
        assert_eq!(session.state().ratio, 0.0);

        let report = session.tick();
        assert_eq!(report.event, Some(TickEvent::Finished { ref_index: 3 }));
    }

    #[test]
    fn test_drag_rejected_while_advancing() {
        let mut session = session(vec![]);
        session.on_start_stop_toggle();
        let before = session.marker();
        assert!(!session.on_drag_marker(Point::new(50.0, 50.0)));
        assert_eq!(session.marker(), before);
    }

    #[test]
    fn test_invalid_click_is_noop() {
        let mut session = session(vec![]);
        assert_eq!(session.on_sample_click(99, 0), None);
        assert_eq!(session.on_sample_click(0, 99), None);
        assert_eq!(session.grid().blocked_count(), 0);
    }

    #[test]
    fn test_toggle_twice_and_reset() {
        let mut session = session(vec![]);
        assert_eq!(session.on_sample_click(2, 0), Some(true));
        assert_eq!(session.on_sample_click(2, 0), Some(false));
        session.on_sample_click(1, 1);
        session.on_sample_click(3, 2);
        session.on_reset_blocks();
        session.on_reset_blocks();
        assert_eq!(session.grid().blocked_count(), 0);
    }

    #[test]
    fn test_degenerate_segment_uses_unit_length() {
        let waypoints = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        let settings = Settings {
            speed: 0.5,
            ..settings()
        };
        let mut session = Session::initialize(waypoints, vec![], &settings).unwrap();
        set_moving(&mut session, 1, 0.0, Direction::Forward);
        session.tick();
        assert_eq!(session.state().segment, 1);
        assert!((session.state().ratio - 0.5).abs() < EPS);
        assert_eq!(session.marker(), Point::new(10.0, 0.0));
    }

    fn run_until_stopped(session: &mut Session, max_ticks: usize) -> Vec<TickEvent> {
        let mut events = Vec::new();
        for _ in 0..max_ticks {
            if let Some(event) = session.tick().event {
                events.push(event);
            }
            if !session.state().moving {
                break;
            }
        }
        events
    }

    #[test]
    fn test_maze_run_reaches_lower_exit() {
        let mut session =
            Session::initialize(maze::waypoints(), maze::finish_markers(), &Settings::default())
                .unwrap();
        let start = session.path().waypoint(3);
        session.on_drag_marker(start);
        session.on_start_stop_toggle();

        let events = run_until_stopped(&mut session, 2_000);
        assert_eq!(events, vec![TickEvent::Finished { ref_index: 2 }]);
        assert_eq!(session.status(), Status::Finished);
    }

    #[test]
    fn test_maze_run_bounces_back_to_upper_exit() {
        let mut session =
            Session::initialize(maze::waypoints(), maze::finish_markers(), &Settings::default())
                .unwrap();
        session.on_sample_click(4, 10);
        let start = session.path().waypoint(3);
        session.on_drag_marker(start);
        session.on_start_stop_toggle();

        let events = run_until_stopped(&mut session, 5_000);
        assert_eq!(
            events,
            vec![
                TickEvent::ObstacleHit {
                    segment: 4,
                    index: 10,
                    label: 'k'
                },
                TickEvent::Finished { ref_index: 0 },
            ]
        );
        // the bounced-off dot reopened while the marker was on its way back
        assert!(!session.grid().get(4, 10).unwrap().blocked);
    }
}
