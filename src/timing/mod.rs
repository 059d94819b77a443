//! Frame-stepped timing: the frame clock, periodic tick gates and one-shot deferred callbacks.

pub mod clock;
pub mod ticker;
pub mod timer;

pub use clock::{FrameClock, ManualClock, SystemClock, WallClock};
pub use ticker::{TickGate, TickGateRegistry};
pub use timer::{DeferredTimer, TimerHandle};
