//! Frame clocks.
//!
//! The game reads time only through the value the loop passes in. Real
//! sessions use the wall clock; reproducible runs derive time from the frame
//! index so the same seed and input always give the same round.

use std::time::Instant;

pub trait Clock {
    /// Milliseconds since the session started, for the given frame.
    fn now_ms(&self, frame: u64) -> u64;
}

/// Elapsed real time.
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn now_ms(&self, _frame: u64) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// `frame * 1000 / fps`, independent of how long frames really take.
pub struct FixedStepClock {
    fps: u64,
}

impl FixedStepClock {
    pub fn new(fps: u32) -> Self {
        Self {
            fps: u64::from(fps.max(1)),
        }
    }
}

impl Clock for FixedStepClock {
    fn now_ms(&self, frame: u64) -> u64 {
        frame.saturating_mul(1000) / self.fps
    }
}
