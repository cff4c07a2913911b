//! Deferred unblocks on a logical clock
//!
//! When the marker bounces off a dot, that dot clears itself a fixed number of
//! ticks later. Time is counted in ticks rather than wall-clock seconds so a
//! run is fully deterministic.
//!
//! There is no cancellation. If the user toggles the dot again before the
//! unblock fires, the unblock still clears it when it comes due.

/// A dot waiting to be cleared
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingUnblock {
    /// Tick at which the unblock fires
    pub due: u64,
    pub segment: usize,
    pub index: usize,
}

/// Queue of scheduled unblocks, in scheduling order
#[derive(Clone, Debug, Default)]
pub struct UnblockQueue {
    pending: Vec<PendingUnblock>,
}

impl UnblockQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule dot `(segment, index)` to clear `delay` ticks after `now`
    pub fn schedule(&mut self, now: u64, delay: u64, segment: usize, index: usize) {
        self.pending.push(PendingUnblock {
            due: now.saturating_add(delay),
            segment,
            index,
        });
    }

    /// Remove and return every unblock due at or before `now`
    pub fn drain_due(&mut self, now: u64) -> Vec<PendingUnblock> {
        let (due, later): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = later;
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
