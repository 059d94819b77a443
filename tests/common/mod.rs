#![allow(dead_code)]

use std::rc::Rc;

use misi_hijau::audio::{Audio, RecordingBackend};
use misi_hijau::constants::{LOOP_TIME, MAP_SIZE};
use misi_hijau::events::{Event, Outcome};
use misi_hijau::game::{Game, Phase, Services};
use misi_hijau::input::Keys;
use misi_hijau::level::{table, Level, LevelMap};
use misi_hijau::render::RecordingCanvas;
use misi_hijau::timing::ManualClock;

pub const SEED: u64 = 7;

/// A layout with nothing in it.
pub static OPEN_LAYOUT: [&str; MAP_SIZE.y as usize] = ["................................"; MAP_SIZE.y as usize];

/// Frames needed for the dialog's dismiss key to arm, with some slack.
pub const DIALOG_ARM_FRAMES: usize = 35;

/// Services over the built-in levels, a manual clock and a recording audio backend.
pub fn services() -> (Rc<Services>, Rc<ManualClock>, RecordingBackend) {
    services_with_levels(table::levels())
}

pub fn services_with_levels(levels: Vec<Level>) -> (Rc<Services>, Rc<ManualClock>, RecordingBackend) {
    let clock = Rc::new(ManualClock::new());
    let sounds = RecordingBackend::new();
    let services = Services::with_levels(clock.clone(), Audio::new(Box::new(sounds.clone())), Some(SEED), levels)
        .expect("services should build");
    (services, clock, sounds)
}

/// The built-in levels with every map replaced by an empty layout.
pub fn open_levels() -> Vec<Level> {
    table::levels()
        .into_iter()
        .map(|mut level| {
            level.map = LevelMap::new(&OPEN_LAYOUT);
            level
        })
        .collect()
}

/// A headless game stepped one frame at a time, with a simulated wall clock.
pub struct Harness {
    pub game: Game,
    pub clock: Rc<ManualClock>,
    pub canvas: RecordingCanvas,
    pub sounds: RecordingBackend,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_levels(table::levels())
    }

    pub fn with_levels(levels: Vec<Level>) -> Self {
        let (services, clock, sounds) = services_with_levels(levels);
        Self {
            game: Game::with_services(services).expect("game should build"),
            clock,
            canvas: RecordingCanvas::new(),
            sounds,
        }
    }

    pub fn services(&self) -> &Rc<Services> {
        self.game.services()
    }

    pub fn publish(&self, event: impl Into<Event>) -> Outcome {
        self.services().bus.publish(event)
    }

    /// Runs one frame with `keys` held.
    pub fn step(&mut self, keys: Keys) {
        self.clock.advance(LOOP_TIME);
        self.canvas.clear();
        self.game.frame(keys, &mut self.canvas).expect("frame should run");
    }

    pub fn step_n(&mut self, frames: usize, keys: Keys) {
        for _ in 0..frames {
            self.step(keys);
        }
    }

    /// Presses and releases `keys`.
    pub fn tap(&mut self, keys: Keys) {
        self.step(keys);
        self.step(Keys::empty());
    }

    /// Skips the intro, dismisses the first briefing and lands in gameplay.
    pub fn start_playing(&mut self) {
        self.publish(Event::StartGame);
        self.step(Keys::empty());
        assert_eq!(self.game.phase(), Phase::Blank, "the level briefing should hold the loop");

        self.dismiss_dialog();
        assert_eq!(self.game.phase(), Phase::Playing);
    }

    /// Waits for the dialog's dismiss key to arm, then presses it.
    pub fn dismiss_dialog(&mut self) {
        self.step_n(DIALOG_ARM_FRAMES, Keys::empty());
        self.tap(Keys::Q);
    }

    pub fn level_idx(&self) -> usize {
        self.services().level(|level| level.idx)
    }

    pub fn statusbar_lines(&self) -> Vec<String> {
        self.services().statusbar.borrow().lines()
    }
}
