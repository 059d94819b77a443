use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::timing::clock::WallClock;

type Callback = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    Pending,
    Fired,
    Cancelled,
}

struct Entry {
    deadline: Duration,
    tag: Option<&'static str>,
    state: Cell<EntryState>,
    callback: RefCell<Option<Callback>>,
}

/// Handle to a scheduled one-shot callback.
pub struct TimerHandle(Rc<Entry>);

impl TimerHandle {
    /// Sets the callback run when the deadline passes, replacing any previous one.
    pub fn when_over(&self, callback: impl FnOnce() + 'static) -> &Self {
        *self.0.callback.borrow_mut() = Some(Box::new(callback));
        self
    }

    pub fn is_pending(&self) -> bool {
        self.0.state.get() == EntryState::Pending
    }

    pub fn cancel(&self) {
        if self.0.state.get() == EntryState::Pending {
            self.0.state.set(EntryState::Cancelled);
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("deadline", &self.0.deadline)
            .field("tag", &self.0.tag)
            .field("state", &self.0.state.get())
            .finish()
    }
}

/// Wall-clock delayed callbacks, polled once per frame.
///
/// Entries that come due in the same poll fire in the order they were attached, regardless of
/// their deadlines. Callbacks may attach new entries or cancel others while a poll is running.
pub struct DeferredTimer {
    clock: Rc<dyn WallClock>,
    entries: RefCell<Vec<Rc<Entry>>>,
}

impl DeferredTimer {
    pub fn new(clock: Rc<dyn WallClock>) -> Self {
        Self {
            clock,
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Schedules an entry `delay_secs` seconds from now. Negative delays count as zero.
    pub fn attach(&self, delay_secs: f64, tag: Option<&'static str>) -> TimerHandle {
        let delay = Duration::from_secs_f64(delay_secs.max(0.0));
        let entry = Rc::new(Entry {
            deadline: self.clock.now() + delay,
            tag,
            state: Cell::new(EntryState::Pending),
            callback: RefCell::new(None),
        });
        self.entries.borrow_mut().push(entry.clone());
        trace!(?delay, tag, "Timer attached");
        TimerHandle(entry)
    }

    /// Fires every entry whose deadline has passed and drops it. Returns how many fired.
    pub fn update(&self) -> usize {
        let now = self.clock.now();
        let due: SmallVec<[Rc<Entry>; 8]> = self
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.deadline <= now)
            .cloned()
            .collect();

        let mut fired = 0;
        for entry in due {
            // An earlier callback in this poll may have cancelled it.
            if entry.state.get() != EntryState::Pending {
                continue;
            }
            entry.state.set(EntryState::Fired);
            fired += 1;

            let callback = entry.callback.borrow_mut().take();
            if let Some(callback) = callback {
                callback();
            }
        }

        self.entries
            .borrow_mut()
            .retain(|entry| entry.state.get() == EntryState::Pending);
        fired
    }

    /// Cancels every pending entry carrying `tag` without running it. Returns how many were cancelled.
    pub fn destroy_by_id(&self, tag: &str) -> usize {
        let mut entries = self.entries.borrow_mut();
        let mut cancelled = 0;
        entries.retain(|entry| {
            let matches = entry.tag == Some(tag) && entry.state.get() == EntryState::Pending;
            if matches {
                entry.state.set(EntryState::Cancelled);
                cancelled += 1;
            }
            !matches
        });

        if cancelled > 0 {
            debug!(tag, cancelled, "Cancelled pending timers");
        }
        cancelled
    }

    pub fn pending(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.state.get() == EntryState::Pending)
            .count()
    }
}
