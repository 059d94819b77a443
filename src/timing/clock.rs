use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic count of frames elapsed since the game booted.
///
/// Cloning yields another handle onto the same counter. Only the game loop advances it;
/// everything else reads.
#[derive(Debug, Clone, Default)]
pub struct FrameClock(Rc<Cell<u64>>);

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current frame number.
    pub fn now(&self) -> u64 {
        self.0.get()
    }

    /// Moves to the next frame, returning the new frame number.
    pub fn advance(&self) -> u64 {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }
}

/// Source of wall-clock time for deferred callbacks.
///
/// Returns the time elapsed since an arbitrary fixed origin.
pub trait WallClock {
    fn now(&self) -> Duration;
}

/// Real time, measured from construction.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A wall clock that only moves when told to. Used by the headless runner and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    elapsed: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> Duration {
        self.elapsed.get()
    }
}
