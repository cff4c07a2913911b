//! rat-run - headless maze runner
//!
//! Builds the built-in maze, drops the rat at the bottom of the right-hand
//! corridor, blocks one dot in its way and lets it run until it reaches an
//! exit or the tick budget runs out. Set `RUST_LOG=debug` to watch bounces
//! and reopened dots, `RUST_LOG=trace` for every frame.

use rat_run::{maze, Session, Settings, Status, TickEvent, TrackError};

/// Segment and dot blocked before the run starts
const DEMO_BLOCK: (usize, usize) = (4, 10);

fn main() -> Result<(), TrackError> {
    env_logger::init();
    log::info!("Starting rat-run");

    let first_run = !Settings::is_saved();
    let settings = Settings::load();
    let mut session = Session::initialize(maze::waypoints(), maze::finish_markers(), &settings)?;

    let start = session.path().waypoint(3);
    session.on_drag_marker(start);
    if session.on_sample_click(DEMO_BLOCK.0, DEMO_BLOCK.1).is_none() {
        log::warn!("Demo obstacle does not exist with these settings");
    }

    session.on_start_stop_toggle();

    let mut bounces = 0;
    for _ in 0..settings.max_ticks {
        let report = session.tick();
        match report.event {
            Some(TickEvent::ObstacleHit { segment, label, .. }) => {
                bounces += 1;
                log::info!("Seg {} dot {} blocked, turning {}", segment, label, report.direction.name());
            }
            Some(TickEvent::Finished { ref_index }) => {
                log::info!("Rat reached finish line {}", ref_index);
            }
            None => {}
        }
        if report.status != Status::Advancing {
            break;
        }
    }

    let marker = session.marker();
    log::info!(
        "Run {} after {} ticks and {} bounces at ({:.0}, {:.0})",
        session.status().label(),
        session.clock(),
        bounces,
        marker.x,
        marker.y
    );

    // Leave a file to edit on first run, never overwrite an existing one
    if first_run {
        settings.save();
    }
    Ok(())
}
