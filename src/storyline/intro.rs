use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, info};

use crate::audio::Sound;
use crate::constants::mechanics::INTRO_SPLASH_DELAY;
use crate::constants::{timers, CANVAS_SIZE, FONT_HEIGHT, FONT_WIDTH};
use crate::events::{Event, EventKind, HintRequest, TextRequest};
use crate::game::Services;
use crate::input::GameCommand;
use crate::render::{Canvas, Color};
use crate::storyline::INTRO_SLIDES;

const MARGIN: i32 = 8;
const TITLE: &str = "MISI HIJAU";
const SUBTITLE: &str = "press space";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroState {
    Splash,
    /// The slide's text is still being typed.
    Typing(usize),
    /// The slide is fully shown; waiting for the player.
    Waiting(usize),
    Done,
}

/// Splash screen followed by the story slideshow. Publishes `StartGame` after the last slide.
pub struct Intro {
    services: Rc<Services>,
    state: IntroState,
    /// Set by `StartGame`, however it was raised.
    started: Rc<Cell<bool>>,
    frames: u64,
}

impl Intro {
    pub fn new(services: &Rc<Services>) -> Rc<RefCell<Self>> {
        let intro = Rc::new(RefCell::new(Self {
            services: services.clone(),
            state: IntroState::Splash,
            started: Rc::new(Cell::new(false)),
            frames: 0,
        }));

        let bus = &services.bus;
        let started = intro.borrow().started.clone();
        bus.subscribe(EventKind::StartGame, move |_| started.set(true));
        bus.subscribe_to(EventKind::SlideshowNext, &intro, |intro, _| intro.on_slide_typed());
        bus.subscribe_to(EventKind::Command, &intro, |intro, event| {
            if let Event::Command(GameCommand::Confirm) = event {
                intro.on_confirm();
            }
        });

        let weak = Rc::downgrade(&intro);
        services
            .timer
            .attach(INTRO_SPLASH_DELAY, Some(timers::STORY))
            .when_over(move || {
                let Some(intro) = weak.upgrade() else {
                    return;
                };
                if let Ok(mut intro) = intro.try_borrow_mut() {
                    if intro.state() == IntroState::Splash {
                        intro.show_slide(0);
                    }
                };
            });

        intro
    }

    pub fn state(&self) -> IntroState {
        if self.started.get() {
            IntroState::Done
        } else {
            self.state
        }
    }

    fn show_slide(&mut self, index: usize) {
        debug!(slide = index, "Showing intro slide");
        self.state = IntroState::Typing(index);
        self.services.audio.play(Sound::Popup);
        self.services.bus.publish(Event::HideBlinkingHint);
        self.services.bus.publish(Event::AnimateText(TextRequest {
            text: INTRO_SLIDES[index].to_string(),
            x: MARGIN,
            y: MARGIN,
            width: CANVAS_SIZE.x as i32 - MARGIN * 2,
            color: Color::White,
            on_done: Some(Box::new(Event::SlideshowNext)),
        }));
    }

    fn on_slide_typed(&mut self) {
        let IntroState::Typing(index) = self.state() else {
            return;
        };
        self.state = IntroState::Waiting(index);
        self.services.bus.publish(Event::ShowBlinkingHint(HintRequest {
            text: "press space to continue...".to_string(),
            x: MARGIN,
            y: CANVAS_SIZE.y as i32 - FONT_HEIGHT - MARGIN,
            color: Color::White,
            delay_secs: 1.0,
        }));
    }

    fn on_confirm(&mut self) {
        match self.state() {
            IntroState::Splash => {
                self.services.timer.destroy_by_id(timers::STORY);
                self.show_slide(0);
            }
            IntroState::Waiting(index) if index + 1 < INTRO_SLIDES.len() => self.show_slide(index + 1),
            IntroState::Waiting(_) => self.finish(),
            IntroState::Typing(_) | IntroState::Done => {}
        }
    }

    fn finish(&mut self) {
        info!("Intro finished");
        self.state = IntroState::Done;
        self.services.timer.destroy_by_id(timers::STORY);
        self.services.bus.publish(Event::InterruptText);
        self.services.bus.publish(Event::HideBlinkingHint);
        self.services.bus.publish(Event::StartGame);
    }

    pub fn update(&mut self) {
        self.frames += 1;
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.cls(Color::Black);
        match self.state() {
            IntroState::Splash => {
                let title_x = (CANVAS_SIZE.x as i32 - TITLE.len() as i32 * FONT_WIDTH) / 2;
                let title_y = CANVAS_SIZE.y as i32 / 2 - FONT_HEIGHT;
                let color = if (self.frames / 15) % 2 == 0 { Color::Lime } else { Color::Green };
                canvas.text(title_x, title_y, TITLE, color);

                let subtitle_x = (CANVAS_SIZE.x as i32 - SUBTITLE.len() as i32 * FONT_WIDTH) / 2;
                canvas.text(subtitle_x, title_y + FONT_HEIGHT * 2, SUBTITLE, Color::Gray);
            }
            IntroState::Typing(index) | IntroState::Waiting(index) => {
                let counter = format!("{}/{}", index + 1, INTRO_SLIDES.len());
                let x = CANVAS_SIZE.x as i32 - counter.len() as i32 * FONT_WIDTH - MARGIN;
                canvas.text(x, CANVAS_SIZE.y as i32 - FONT_HEIGHT - MARGIN, &counter, Color::Gray);
            }
            IntroState::Done => {}
        }
    }
}
