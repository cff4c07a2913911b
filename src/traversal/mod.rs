//! Traversal module - the marker's state machine
//!
//! This module provides:
//! - `Session`, which owns the track and all mutable run state
//! - `TraversalState`, `Direction` and `Status` for the marker
//! - `TickReport` / `TickEvent`, returned from every frame
//! - A logical-clock queue for obstacles that clear themselves

mod deferred;
mod session;
mod state;

pub use deferred::{PendingUnblock, UnblockQueue};
pub use session::Session;
pub use state::{Direction, Placement, Status, TickEvent, TickReport, TraversalState};
