use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use misi_hijau::constants::LOOP_TIME;
use misi_hijau::timing::{DeferredTimer, ManualClock};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

fn timer() -> (DeferredTimer, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new());
    (DeferredTimer::new(clock.clone()), clock)
}

fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let make = move |name: &'static str| -> Box<dyn FnOnce()> {
        let sink = sink.clone();
        Box::new(move || sink.borrow_mut().push(name))
    };
    (log, make)
}

#[test]
fn test_fires_once_after_delay() {
    let (timer, clock) = timer();
    let (log, make) = recorder();
    let handle = timer.attach(1.0, None);
    handle.when_over(make("one"));

    // Thirty frames fall just short of a second.
    for _ in 0..30 {
        clock.advance(LOOP_TIME);
        assert_that(&timer.update()).is_equal_to(0);
    }
    assert_that(&handle.is_pending()).is_true();

    clock.advance(LOOP_TIME);
    assert_that(&timer.update()).is_equal_to(1);
    assert_that(&handle.is_pending()).is_false();

    clock.advance(Duration::from_secs(5));
    timer.update();
    assert_eq!(*log.borrow(), vec!["one"]);
    assert_that(&timer.pending()).is_equal_to(0);
}

#[test]
fn test_due_entries_fire_in_attach_order() {
    let (timer, clock) = timer();
    let (log, make) = recorder();
    timer.attach(0.5, None).when_over(make("late deadline"));
    timer.attach(0.1, None).when_over(make("early deadline"));
    timer.attach(0.3, None).when_over(make("middle deadline"));

    clock.advance(Duration::from_secs(1));
    timer.update();

    assert_eq!(*log.borrow(), vec!["late deadline", "early deadline", "middle deadline"]);
}

#[test]
fn test_negative_delay_fires_on_next_update() {
    let (timer, _clock) = timer();
    let (log, make) = recorder();
    timer.attach(-3.0, None).when_over(make("now"));

    timer.update();
    assert_eq!(*log.borrow(), vec!["now"]);
}

#[test]
fn test_destroy_by_id_cancels_only_matching_tags() {
    let (timer, clock) = timer();
    let (log, make) = recorder();
    timer.attach(0.2, Some("dialog")).when_over(make("dialog a"));
    timer.attach(0.2, Some("dialog")).when_over(make("dialog b"));
    timer.attach(0.2, Some("story")).when_over(make("story"));
    timer.attach(0.2, None).when_over(make("untagged"));

    assert_that(&timer.destroy_by_id("dialog")).is_equal_to(2);
    assert_that(&timer.destroy_by_id("missing")).is_equal_to(0);
    assert_that(&timer.pending()).is_equal_to(2);

    clock.advance(Duration::from_secs(1));
    timer.update();
    assert_eq!(*log.borrow(), vec!["story", "untagged"]);
}

#[test]
fn test_cancelled_handle_never_fires() {
    let (timer, clock) = timer();
    let (log, make) = recorder();
    let handle = timer.attach(0.1, None);
    handle.when_over(make("cancelled"));
    handle.cancel();

    clock.advance(Duration::from_secs(1));
    assert_that(&timer.update()).is_equal_to(0);
    assert_that(&log.borrow().is_empty()).is_true();
}

#[test]
fn test_callback_can_cancel_later_entry_in_same_poll() {
    let (timer, clock) = timer();
    let (log, make) = recorder();
    let timer = Rc::new(timer);

    let inner = Rc::downgrade(&timer);
    let first = make("first");
    timer.attach(0.1, None).when_over(move || {
        first();
        if let Some(timer) = inner.upgrade() {
            timer.destroy_by_id("second");
        }
    });
    timer.attach(0.1, Some("second")).when_over(make("second"));

    clock.advance(Duration::from_secs(1));
    assert_that(&timer.update()).is_equal_to(1);
    assert_eq!(*log.borrow(), vec!["first"]);
}

#[test]
fn test_entry_attached_during_poll_waits_for_next_poll() {
    let (timer, clock) = timer();
    let (log, make) = recorder();
    let timer = Rc::new(timer);

    let inner = Rc::downgrade(&timer);
    let chained = RefCell::new(Some(make("chained")));
    timer.attach(0.1, None).when_over(move || {
        if let (Some(timer), Some(callback)) = (inner.upgrade(), chained.borrow_mut().take()) {
            timer.attach(0.0, None).when_over(callback);
        }
    });

    clock.advance(Duration::from_secs(1));
    timer.update();
    assert_that(&log.borrow().is_empty()).is_true();
    assert_that(&timer.pending()).is_equal_to(1);

    timer.update();
    assert_eq!(*log.borrow(), vec!["chained"]);
}

#[test]
fn test_replacing_callback() {
    let (timer, _clock) = timer();
    let (log, make) = recorder();
    let handle = timer.attach(0.0, None);
    handle.when_over(make("replaced")).when_over(make("kept"));

    timer.update();
    assert_eq!(*log.borrow(), vec!["kept"]);
}
