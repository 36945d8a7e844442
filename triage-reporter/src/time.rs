// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Clocks for timing suites and the run as a whole.
//!
//! The reporter never reads the system clock directly. It asks a [`Clock`] instead, so that tests
//! can decide exactly how much time has passed between two events.

use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

/// A source of monotonic timestamps.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// A [`Clock`] backed by [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A [`Clock`] that only moves when told to.
///
/// Clones share the same underlying time: hand one clone to the reporter and keep another to
/// advance it.
#[derive(Clone, Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Creates a new clock at elapsed time zero.
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Sets the time elapsed since the clock was created.
    ///
    /// Moving backwards is allowed. Durations measured across such a move saturate at zero.
    pub fn set_elapsed(&self, elapsed: Duration) {
        self.offset.set(elapsed);
    }

    /// Returns the time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let start = clock.now();

        handle.advance(Duration::from_millis(1500));
        assert_eq!(clock.now() - start, Duration::from_millis(1500));
        assert_eq!(clock.elapsed(), Duration::from_millis(1500));

        handle.set_elapsed(Duration::from_millis(250));
        assert_eq!(
            clock.now().saturating_duration_since(start),
            Duration::from_millis(250)
        );
    }
}
