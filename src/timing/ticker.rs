use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::error::TimingError;
use crate::timing::clock::FrameClock;

#[derive(Debug)]
struct GateState {
    clock: FrameClock,
    period: u64,
    accumulated: Cell<u64>,
    last_frame: Cell<u64>,
}

impl GateState {
    /// Folds the frames elapsed since the last observation into the accumulator.
    /// Calling it twice within one frame is a no-op the second time.
    fn advance(&self) {
        let now = self.clock.now();
        let elapsed = now.saturating_sub(self.last_frame.get());
        self.last_frame.set(now);
        self.accumulated.set(self.accumulated.get() + elapsed);
    }
}

/// A rate limiter that opens once every `period` frames.
///
/// Cloning shares the gate; the registry only keeps a weak handle, so the gate lives exactly
/// as long as its owner holds on to it.
#[derive(Debug, Clone)]
pub struct TickGate(Rc<GateState>);

impl TickGate {
    /// Creates a gate counting from the clock's current frame.
    ///
    /// # Errors
    ///
    /// Returns `TimingError::ZeroPeriod` if `period` is zero.
    pub fn new(clock: &FrameClock, period: u64) -> Result<Self, TimingError> {
        if period == 0 {
            return Err(TimingError::ZeroPeriod);
        }

        Ok(Self(Rc::new(GateState {
            clock: clock.clone(),
            period,
            accumulated: Cell::new(0),
            last_frame: Cell::new(clock.now()),
        })))
    }

    pub fn period(&self) -> u64 {
        self.0.period
    }

    /// Returns true, and starts counting again, once at least `period` frames have elapsed.
    pub fn get(&self) -> bool {
        self.0.advance();
        if self.0.accumulated.get() >= self.0.period {
            self.0.accumulated.set(0);
            true
        } else {
            false
        }
    }

    /// Discards any accumulated frames.
    pub fn reset(&self) {
        self.0.last_frame.set(self.0.clock.now());
        self.0.accumulated.set(0);
    }
}

/// Hands out [`TickGate`]s and advances all of them once per frame.
#[derive(Debug)]
pub struct TickGateRegistry {
    clock: FrameClock,
    gates: RefCell<Vec<Weak<GateState>>>,
}

impl TickGateRegistry {
    pub fn new(clock: FrameClock) -> Self {
        Self {
            clock,
            gates: RefCell::new(Vec::new()),
        }
    }

    /// Creates a gate tracked by this registry.
    pub fn attach(&self, period: u64) -> Result<TickGate, TimingError> {
        let gate = TickGate::new(&self.clock, period)?;
        self.gates.borrow_mut().push(Rc::downgrade(&gate.0));
        trace!(period, "Tick gate attached");
        Ok(gate)
    }

    /// Advances every live gate to the current frame and forgets gates whose owners are gone.
    pub fn update_all(&self) {
        self.gates.borrow_mut().retain(|gate| match gate.upgrade() {
            Some(gate) => {
                gate.advance();
                true
            }
            None => false,
        });
    }

    /// Number of gates still owned by someone.
    pub fn len(&self) -> usize {
        self.gates.borrow().iter().filter(|gate| gate.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
