//! rat-run - a marker running laps of a closed maze path
//!
//! A "rat" follows a closed polyline. Evenly spaced dots along every segment
//! can be blocked; when the rat is about to cross a blocked dot it turns
//! around, and the dot reopens a moment later. Reaching a finish marker ends
//! the run.
//!
//! The crate is the deterministic core only. A front end calls the
//! `Session::on_*` methods for user input and `Session::tick` once per frame,
//! then draws whatever the returned `TickReport` says.

pub mod error;
pub mod settings;
pub mod track;
pub mod traversal;

pub use error::{Result, TrackError};
pub use settings::Settings;
pub use track::maze;
pub use traversal::{Direction, Session, Status, TickEvent, TickReport};
