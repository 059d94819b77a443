use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::audio::Sound;
use crate::constants::mechanics::TYPEWRITER_DELAY;
use crate::constants::FONT_HEIGHT;
use crate::entity::Entity;
use crate::events::{Event, EventKind, TextRequest};
use crate::game::Services;
use crate::render::Canvas;
use crate::ui::wrap_text;

const LINE_HEIGHT: i32 = FONT_HEIGHT + 1;

struct Typing {
    request: TextRequest,
    lines: Vec<String>,
    total: usize,
    revealed: usize,
    next_reveal: Duration,
    done: bool,
}

/// Typewriter text: one more character every [`TYPEWRITER_DELAY`] seconds of wall time.
///
/// Polled once per frame. If several deadlines passed since the last frame, all of their
/// characters are revealed at once.
pub struct TextEngine {
    services: Rc<Services>,
    typing: Option<Typing>,
}

impl TextEngine {
    pub fn new(services: &Rc<Services>) -> Rc<RefCell<Self>> {
        let engine = Rc::new(RefCell::new(Self {
            services: services.clone(),
            typing: None,
        }));

        let bus = &services.bus;
        bus.subscribe_to(EventKind::AnimateText, &engine, |engine, event| {
            if let Event::AnimateText(request) = event {
                engine.animate(request.clone());
            }
        });
        bus.subscribe_to(EventKind::InterruptText, &engine, |engine, _| {
            if engine.typing.take().is_some() {
                debug!("Text animation interrupted");
            }
        });

        engine
    }

    pub fn is_animating(&self) -> bool {
        self.typing.as_ref().is_some_and(|typing| !typing.done)
    }

    /// The text revealed so far, one entry per wrapped line.
    pub fn visible_lines(&self) -> Vec<&str> {
        let Some(typing) = &self.typing else {
            return Vec::new();
        };

        let mut remaining = typing.revealed;
        let mut visible = Vec::new();
        for line in &typing.lines {
            if remaining == 0 {
                break;
            }
            let end = line.char_indices().nth(remaining).map_or(line.len(), |(i, _)| i);
            visible.push(&line[..end]);
            remaining = remaining.saturating_sub(line.chars().count());
        }
        visible
    }

    fn animate(&mut self, request: TextRequest) {
        let lines = wrap_text(&request.text, request.width);
        let total = lines.iter().map(|line| line.chars().count()).sum();
        debug!(chars = total, lines = lines.len(), "Text animation started");

        self.typing = Some(Typing {
            request,
            lines,
            total,
            revealed: 0,
            next_reveal: self.services.wall.now(),
            done: false,
        });
    }
}

impl Entity for TextEngine {
    fn update(&mut self) {
        let Some(typing) = &mut self.typing else {
            return;
        };
        if typing.done {
            return;
        }

        let now = self.services.wall.now();
        let before = typing.revealed;
        while typing.revealed < typing.total && typing.next_reveal <= now {
            typing.revealed += 1;
            typing.next_reveal += Duration::from_secs_f64(TYPEWRITER_DELAY);
        }
        if typing.revealed > before {
            self.services.audio.play(Sound::Typing);
        }

        if typing.revealed == typing.total {
            typing.done = true;
            let next = typing.request.on_done.clone();
            if let Some(next) = next {
                self.services.bus.publish(*next);
            }
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let Some(typing) = &self.typing else {
            return;
        };
        let TextRequest { x, y, color, .. } = typing.request;
        for (i, line) in self.visible_lines().into_iter().enumerate() {
            canvas.text(x, y + i as i32 * LINE_HEIGHT, line, color);
        }
    }
}
