use std::cell::Cell;
use std::rc::Rc;

use misi_hijau::audio::Sound;
use misi_hijau::constants::LOOP_TIME;
use misi_hijau::entity::Entity;
use misi_hijau::events::{DialogRequest, Event, EventKind, HintRequest, TextRequest};
use misi_hijau::game::{Phase, Services};
use misi_hijau::input::Keys;
use misi_hijau::render::Color;
use misi_hijau::storyline::INTRO_SLIDES;
use misi_hijau::timing::ManualClock;
use misi_hijau::ui::{BlinkingHint, Dialog, TextEngine};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::Harness;

/// Frames a slide needs to finish typing and show its prompt, with slack.
const SLIDE_FRAMES: usize = 300;

fn advance(services: &Services, clock: &ManualClock) {
    services.clock.advance();
    clock.advance(LOOP_TIME);
    services.advance();
}

#[test]
fn test_splash_moves_on_by_itself() {
    let mut h = Harness::new();
    h.step_n(140, Keys::empty());
    assert_that(&h.canvas.contains_text("MISI HIJAU")).is_true();

    h.step_n(10, Keys::empty());
    assert_that(&h.canvas.contains_text("MISI HIJAU")).is_false();
    assert_that(&h.canvas.contains_text(&format!("1/{}", INTRO_SLIDES.len()))).is_true();
}

#[test]
fn test_intro_slideshow_starts_the_game() {
    let mut h = Harness::new();
    h.step(Keys::empty());
    h.tap(Keys::SPACE);

    for slide in 1..=INTRO_SLIDES.len() {
        assert_eq!(h.game.phase(), Phase::Intro);
        assert_that(&h.canvas.contains_text(&format!("{slide}/{}", INTRO_SLIDES.len()))).is_true();

        // Confirming while the text is still typing does nothing.
        h.tap(Keys::SPACE);
        assert_that(&h.canvas.contains_text(&format!("{slide}/{}", INTRO_SLIDES.len()))).is_true();

        let mut prompted = false;
        for _ in 0..SLIDE_FRAMES {
            h.step(Keys::empty());
            prompted |= h.canvas.contains_text("press space to continue...");
        }
        assert_that(&prompted).is_true();
        h.tap(Keys::SPACE);
    }

    assert_eq!(h.game.phase(), Phase::Blank);
    assert_that(&h.level_idx()).is_equal_to(1);
    assert_that(&h.canvas.contains_text("press space to continue...")).is_false();
    assert_that(&h.sounds.played().contains(&Sound::Typing)).is_true();
}

#[test]
fn test_slide_text_is_revealed_gradually() {
    let mut h = Harness::new();
    h.step(Keys::empty());
    h.tap(Keys::SPACE);

    h.step_n(10, Keys::empty());
    assert_that(&h.canvas.contains_text("The year")).is_true();
    assert_that(&h.canvas.contains_text("The year is 3000.")).is_false();

    h.step_n(SLIDE_FRAMES, Keys::empty());
    assert_that(&h.canvas.contains_text("The year is 3000.")).is_true();
}

#[test]
fn test_hint_appears_after_delay_and_blinks() {
    let (services, clock, _sounds) = common::services();
    let hint = BlinkingHint::new(&services).unwrap();

    services.bus.publish(Event::ShowBlinkingHint(HintRequest {
        text: "wait for it".to_string(),
        x: 0,
        y: 0,
        color: Color::White,
        delay_secs: 0.5,
    }));
    assert_that(&hint.borrow().request().is_some()).is_true();

    let mut visible = Vec::new();
    for _ in 0..80 {
        advance(&services, &clock);
        hint.borrow_mut().update();
        visible.push(hint.borrow().is_visible());
    }

    let first = visible.iter().position(|v| *v).unwrap();
    assert_that(&first).is_greater_than_or_equal_to(14);
    assert_that(&first).is_less_than(17);
    // Blinks every thirty frames once shown.
    assert_that(&visible[first..first + 30].iter().all(|v| *v)).is_true();
    assert_that(&visible[first + 30]).is_false();

    services.bus.publish(Event::HideBlinkingHint);
    assert_that(&hint.borrow().is_visible()).is_false();
    assert_that(&hint.borrow().request().is_none()).is_true();
}

#[test]
fn test_new_hint_replaces_pending_one() {
    let (services, clock, _sounds) = common::services();
    let hint = BlinkingHint::new(&services).unwrap();
    let request = |text: &str, delay_secs: f64| {
        Event::ShowBlinkingHint(HintRequest {
            text: text.to_string(),
            x: 0,
            y: 0,
            color: Color::White,
            delay_secs,
        })
    };

    services.bus.publish(request("first", 0.1));
    services.bus.publish(request("second", 2.0));
    for _ in 0..10 {
        advance(&services, &clock);
        hint.borrow_mut().update();
    }

    assert_that(&hint.borrow().is_visible()).is_false();
    assert_eq!(hint.borrow().request().map(|r| r.text.as_str()), Some("second"));
}

#[test]
fn test_text_engine_types_and_reports_completion() {
    let (services, clock, sounds) = common::services();
    let engine = TextEngine::new(&services);
    let done = Rc::new(Cell::new(0));
    let counter = done.clone();
    services
        .bus
        .subscribe(EventKind::SlideshowNext, move |_| counter.set(counter.get() + 1));

    services.bus.publish(Event::AnimateText(TextRequest {
        text: "abcdefghij".to_string(),
        x: 0,
        y: 0,
        width: 200,
        color: Color::White,
        on_done: Some(Box::new(Event::SlideshowNext)),
    }));
    assert_that(&engine.borrow().is_animating()).is_true();

    // One frame is a little over three characters' worth of time.
    advance(&services, &clock);
    engine.borrow_mut().update();
    let shown = engine.borrow().visible_lines().concat();
    assert_that(&shown.len()).is_greater_than(0);
    assert_that(&shown.len()).is_less_than(10);

    for _ in 0..10 {
        advance(&services, &clock);
        engine.borrow_mut().update();
    }
    assert_eq!(engine.borrow().visible_lines(), vec!["abcdefghij"]);
    assert_that(&engine.borrow().is_animating()).is_false();
    assert_that(&done.get()).is_equal_to(1);
    assert_that(&sounds.played().contains(&Sound::Typing)).is_true();

    services.bus.publish(Event::InterruptText);
    assert_that(&engine.borrow().visible_lines().is_empty()).is_true();
}

#[test]
fn test_dialog_publishes_follow_up_on_dismiss() {
    let (services, clock, _sounds) = common::services();
    let dialog = Dialog::new(&services);
    let stops = Rc::new(Cell::new(0));
    let resumes = Rc::new(Cell::new(0));
    let finished = Rc::new(Cell::new(0));
    for (kind, count) in [
        (EventKind::StopGameLoop, &stops),
        (EventKind::ResumeGameLoop, &resumes),
        (EventKind::FinishGame, &finished),
    ] {
        let count = count.clone();
        services.bus.subscribe(kind, move |_| count.set(count.get() + 1));
    }

    services.bus.publish(Event::ShowDialog(DialogRequest {
        text: "hello there".to_string(),
        width: 100,
        text_color: Color::White,
        background: Color::Navy,
        dismiss_hint: None,
        on_dismiss: Some(Box::new(Event::FinishGame)),
    }));
    assert_that(&dialog.borrow().is_open()).is_true();
    assert_that(&dialog.borrow().can_dismiss()).is_false();
    assert_that(&stops.get()).is_equal_to(1);

    for _ in 0..common::DIALOG_ARM_FRAMES {
        advance(&services, &clock);
    }
    assert_that(&dialog.borrow().can_dismiss()).is_true();
    assert_that(&dialog.borrow().keybindings()[0].switch.is_active()).is_true();

    services.bus.publish(Event::Command(misi_hijau::input::GameCommand::DismissDialog));
    assert_that(&dialog.borrow().is_open()).is_false();
    assert_that(&dialog.borrow().can_dismiss()).is_false();
    assert_that(&resumes.get()).is_equal_to(1);
    assert_that(&finished.get()).is_equal_to(1);

    // A second dismissal has nothing to close.
    services.bus.publish(Event::Command(misi_hijau::input::GameCommand::DismissDialog));
    assert_that(&resumes.get()).is_equal_to(1);
}
