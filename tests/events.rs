use std::cell::{Cell, RefCell};
use std::rc::Rc;

use misi_hijau::events::{Event, EventBus, EventKind, Outcome, Reply};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use strum::IntoEnumIterator;

fn bus_with_replies(replies: &[Reply]) -> EventBus {
    let bus = EventBus::new();
    for reply in replies.iter().copied() {
        bus.subscribe(EventKind::CheckLevelComplete, move |_| reply);
    }
    bus
}

#[test]
fn test_outcome_aggregation() {
    let cases = [
        (vec![], Outcome::NoSubscribers),
        (vec![Reply::Yes], Outcome::Confirmed),
        (vec![Reply::Silent], Outcome::Confirmed),
        (vec![Reply::Yes, Reply::Silent], Outcome::Confirmed),
        (vec![Reply::Yes, Reply::No], Outcome::Denied),
        (vec![Reply::No, Reply::Unsure], Outcome::Denied),
        (vec![Reply::Yes, Reply::Unsure], Outcome::Indeterminate),
        (vec![Reply::Silent, Reply::Unsure, Reply::Yes], Outcome::Indeterminate),
    ];

    for (replies, expected) in cases {
        let bus = bus_with_replies(&replies);
        assert_eq!(bus.publish(Event::CheckLevelComplete), expected, "replies {replies:?}");
    }
}

#[test]
fn test_outcome_as_bool() {
    assert_that(&Outcome::Confirmed.as_bool()).is_equal_to(Some(true));
    assert_that(&Outcome::Denied.as_bool()).is_equal_to(Some(false));
    assert_that(&Outcome::Indeterminate.as_bool()).is_none();
    assert_that(&Outcome::NoSubscribers.as_bool()).is_none();
    assert_that(&Outcome::NoSubscribers.is_confirmed()).is_false();
}

#[test]
fn test_handler_return_types_convert_to_replies() {
    let bus = EventBus::new();
    bus.subscribe(EventKind::AdvanceLevel, |_| true);
    bus.subscribe(EventKind::AdvanceLevel, |_| ());
    bus.subscribe(EventKind::AdvanceLevel, |_| None::<bool>);
    assert_eq!(bus.publish(Event::AdvanceLevel), Outcome::Confirmed);

    bus.subscribe(EventKind::AdvanceLevel, |_| Some(false));
    assert_eq!(bus.publish(Event::AdvanceLevel), Outcome::Denied);
}

#[test]
fn test_handlers_run_in_subscription_order() {
    let bus = EventBus::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    for name in ["first", "second", "third"] {
        let log = log.clone();
        bus.subscribe(EventKind::UpdateStatusbar, move |_| log.borrow_mut().push(name));
    }

    bus.publish(Event::UpdateStatusbar);
    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_only_matching_kind_is_delivered() {
    let bus = EventBus::new();
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    bus.subscribe(EventKind::PlayerHealthChange, move |event| {
        if let Event::PlayerHealthChange { delta } = event {
            counter.set(counter.get() + delta);
        }
    });

    bus.publish(Event::PlayerHealthChange { delta: 2 });
    bus.publish(Event::UpdateStatusbar);
    bus.publish(Event::PlayerHealthChange { delta: -5 });
    assert_that(&hits.get()).is_equal_to(-3);
}

#[test]
fn test_unsubscribe_during_publish_applies_next_time() {
    let bus = Rc::new(EventBus::new());
    let calls = Rc::new(Cell::new(0));
    let id = Rc::new(Cell::new(None));

    {
        let calls = calls.clone();
        let slot = id.clone();
        let weak = Rc::downgrade(&bus);
        let subscription = bus.subscribe(EventKind::AdvanceLevel, move |_| {
            calls.set(calls.get() + 1);
            if let (Some(bus), Some(id)) = (weak.upgrade(), slot.get()) {
                bus.unsubscribe(EventKind::AdvanceLevel, id);
            }
        });
        id.set(Some(subscription));
    }

    let second = calls.clone();
    bus.subscribe(EventKind::AdvanceLevel, move |_| second.set(second.get() + 10));

    bus.publish(Event::AdvanceLevel);
    assert_that(&calls.get()).is_equal_to(11);
    assert_that(&bus.subscriber_count(EventKind::AdvanceLevel)).is_equal_to(1);

    bus.publish(Event::AdvanceLevel);
    assert_that(&calls.get()).is_equal_to(21);
}

#[test]
fn test_unsubscribe_unknown_id() {
    let bus = EventBus::new();
    let id = bus.subscribe(EventKind::FinishGame, |_| ());

    assert_that(&bus.unsubscribe(EventKind::StartGame, id)).is_false();
    assert_that(&bus.unsubscribe(EventKind::FinishGame, id)).is_true();
    assert_that(&bus.unsubscribe(EventKind::FinishGame, id)).is_false();
    assert_eq!(bus.publish(Event::FinishGame), Outcome::NoSubscribers);
}

#[test]
fn test_reentrant_publish() {
    let bus = Rc::new(EventBus::new());
    let seen = Rc::new(RefCell::new(Vec::new()));

    let weak = Rc::downgrade(&bus);
    let log = seen.clone();
    bus.subscribe(EventKind::CheckLevelComplete, move |_| {
        log.borrow_mut().push("check");
        weak.upgrade().map(|bus| bus.publish(Event::AdvanceLevel).is_confirmed())
    });
    let log = seen.clone();
    bus.subscribe(EventKind::AdvanceLevel, move |_| {
        log.borrow_mut().push("advance");
        true
    });

    assert_eq!(bus.publish(Event::CheckLevelComplete), Outcome::Confirmed);
    assert_eq!(*seen.borrow(), vec!["check", "advance"]);
}

struct Counter {
    count: i32,
}

#[test]
fn test_subscribe_to_skips_dropped_targets() {
    let bus = EventBus::new();
    let counter = Rc::new(RefCell::new(Counter { count: 0 }));
    bus.subscribe_to(EventKind::UpdateStatusbar, &counter, |counter, _| {
        counter.count += 1;
        true
    });

    assert_eq!(bus.publish(Event::UpdateStatusbar), Outcome::Confirmed);
    assert_that(&counter.borrow().count).is_equal_to(1);

    drop(counter);
    // The subscription stays, but replies silently.
    assert_eq!(bus.publish(Event::UpdateStatusbar), Outcome::Confirmed);
    assert_that(&bus.subscriber_count(EventKind::UpdateStatusbar)).is_equal_to(1);
}

#[test]
fn test_subscribe_to_skips_busy_targets() {
    let bus = EventBus::new();
    let counter = Rc::new(RefCell::new(Counter { count: 0 }));
    bus.subscribe_to(EventKind::UpdateStatusbar, &counter, |counter, _| {
        counter.count += 1;
        false
    });

    {
        let _busy = counter.borrow_mut();
        assert_eq!(bus.publish(Event::UpdateStatusbar), Outcome::Confirmed);
    }
    assert_that(&counter.borrow().count).is_equal_to(0);

    assert_eq!(bus.publish(Event::UpdateStatusbar), Outcome::Denied);
    assert_that(&counter.borrow().count).is_equal_to(1);
}

#[test]
fn test_subscribe_weak() {
    let bus = EventBus::new();
    let total = Rc::new(Cell::new(0));
    bus.subscribe_weak(EventKind::PlayerHealthChange, &total, |total, event| {
        if let Event::PlayerHealthChange { delta } = event {
            total.set(total.get() + delta);
        }
    });

    bus.publish(Event::PlayerHealthChange { delta: 3 });
    assert_that(&total.get()).is_equal_to(3);
}

#[test]
fn test_event_kind_names() {
    assert_that(&EventKind::from(&Event::StartGame)).is_equal_to(EventKind::StartGame);
    assert_that(&EventKind::ShowLevelDialog.to_string()).is_equal_to("ShowLevelDialog".to_string());
    assert_that(&EventKind::iter().count()).is_greater_than(20);
}
