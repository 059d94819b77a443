use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::events::{Event, EventKind};

/// A single handler's answer to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reply {
    Yes,
    No,
    /// The handler had nothing to say. Neutral when aggregating.
    #[default]
    Silent,
    /// The handler could not decide.
    Unsure,
}

impl From<bool> for Reply {
    fn from(value: bool) -> Self {
        if value {
            Reply::Yes
        } else {
            Reply::No
        }
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::Silent
    }
}

impl From<Option<bool>> for Reply {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Reply::Silent, Reply::from)
    }
}

/// The aggregate of every handler's [`Reply`] for one publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NoSubscribers,
    /// No handler said no, and none was unsure.
    Confirmed,
    /// At least one handler said no.
    Denied,
    /// Nobody said no, but at least one handler was unsure.
    Indeterminate,
}

impl Outcome {
    pub fn from_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        let (mut any, mut denied, mut unsure) = (false, false, false);
        for reply in replies {
            any = true;
            match reply {
                Reply::No => denied = true,
                Reply::Unsure => unsure = true,
                Reply::Yes | Reply::Silent => {}
            }
        }

        match (any, denied, unsure) {
            (false, _, _) => Outcome::NoSubscribers,
            (_, true, _) => Outcome::Denied,
            (_, _, true) => Outcome::Indeterminate,
            _ => Outcome::Confirmed,
        }
    }

    pub fn is_confirmed(self) -> bool {
        self == Outcome::Confirmed
    }

    /// `Some(true)` for confirmed, `Some(false)` for denied, `None` otherwise.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Outcome::Confirmed => Some(true),
            Outcome::Denied => Some(false),
            Outcome::NoSubscribers | Outcome::Indeterminate => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&Event) -> Reply>;

struct Subscriber {
    id: SubscriptionId,
    handler: Handler,
}

/// Synchronous publish/subscribe keyed by [`EventKind`].
///
/// Handlers run in subscription order. Publishing is reentrant: a handler may publish, subscribe
/// or unsubscribe. The handler list is captured when a publish starts, so changes made during a
/// dispatch apply from the next publish on.
#[derive(Default)]
pub struct EventBus {
    next_id: Cell<u64>,
    table: RefCell<HashMap<EventKind, SmallVec<[Subscriber; 4]>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<R>(&self, kind: EventKind, handler: impl Fn(&Event) -> R + 'static) -> SubscriptionId
    where
        R: Into<Reply>,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let handler: Handler = Rc::new(move |event: &Event| handler(event).into());
        self.table
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Subscriber { id, handler });
        debug!(event = %kind, id = id.0, "Subscribed");
        id
    }

    /// Subscribes a method of a shared, mutable target without keeping the target alive.
    ///
    /// Once the target is dropped the handler stays silent. If the target is already borrowed
    /// (it is the one publishing), the event is skipped for it and a warning is logged.
    pub fn subscribe_to<T, R>(
        &self,
        kind: EventKind,
        target: &Rc<RefCell<T>>,
        handler: impl Fn(&mut T, &Event) -> R + 'static,
    ) -> SubscriptionId
    where
        T: 'static,
        R: Into<Reply>,
    {
        let target = Rc::downgrade(target);
        self.subscribe(kind, move |event| {
            let Some(target) = target.upgrade() else {
                return Reply::Silent;
            };
            let Ok(mut target) = target.try_borrow_mut() else {
                warn!(event = %kind, subscriber = type_name::<T>(), "Subscriber is busy; skipping reentrant event");
                return Reply::Silent;
            };
            handler(&mut target, event).into()
        })
    }

    /// Like [`subscribe_to`](Self::subscribe_to) for targets with interior mutability.
    pub fn subscribe_weak<T, R>(
        &self,
        kind: EventKind,
        target: &Rc<T>,
        handler: impl Fn(&T, &Event) -> R + 'static,
    ) -> SubscriptionId
    where
        T: 'static,
        R: Into<Reply>,
    {
        let target = Rc::downgrade(target);
        self.subscribe(kind, move |event| match target.upgrade() {
            Some(target) => handler(&target, event).into(),
            None => Reply::Silent,
        })
    }

    /// Removes a handler. Returns false if it was not subscribed to `kind`.
    pub fn unsubscribe(&self, kind: EventKind, id: SubscriptionId) -> bool {
        let mut table = self.table.borrow_mut();
        let Some(subscribers) = table.get_mut(&kind) else {
            return false;
        };

        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.id != id);
        let removed = subscribers.len() != before;
        if removed {
            debug!(event = %kind, id = id.0, "Unsubscribed");
        }
        removed
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.table.borrow().get(&kind).map_or(0, |subscribers| subscribers.len())
    }

    /// Delivers `event` to every handler subscribed to its kind and aggregates their replies.
    pub fn publish(&self, event: impl Into<Event>) -> Outcome {
        let event = event.into();
        let kind = EventKind::from(&event);
        let handlers: SmallVec<[Handler; 4]> = self
            .table
            .borrow()
            .get(&kind)
            .map(|subscribers| subscribers.iter().map(|s| s.handler.clone()).collect())
            .unwrap_or_default();

        let outcome = Outcome::from_replies(handlers.iter().map(|handler| handler(&event)));
        trace!(event = %kind, handlers = handlers.len(), ?outcome, "Published");
        outcome
    }
}
