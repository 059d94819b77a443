use std::cell::RefCell;
use std::rc::Rc;

use glam::IVec2;
use tracing::info;

use crate::constants::mechanics::OUTRO_QUIT_HINT_DELAY;
use crate::constants::{CANVAS_SIZE, FONT_HEIGHT, FONT_WIDTH};
use crate::events::{Event, EventKind, HintRequest};
use crate::game::Services;
use crate::input::{ButtonMode, GameCommand, KeyBinding, Keys};
use crate::render::{Canvas, Color, Sprite};

const PLANE_SPEED: i32 = 3;
const QUIT_HINT: &str = "q to quit the game...";
const LINES: [&str; 3] = ["MISSION COMPLETE", "All three minerals are on their way", "back to Earth."];

/// The closing screen: a plane crosses the screen, then the quit key is armed.
pub struct Outro {
    services: Rc<Services>,
    quit: KeyBinding,
    plane: Option<IVec2>,
    started: bool,
}

impl Outro {
    pub fn new(services: &Rc<Services>) -> Rc<RefCell<Self>> {
        let quit = KeyBinding::new("outro_quit", Keys::Q, ButtonMode::Pressed { hold: 0, repeat: 0 }, GameCommand::Quit)
            .inactive();
        let outro = Rc::new(RefCell::new(Self {
            services: services.clone(),
            quit,
            plane: None,
            started: false,
        }));

        services
            .bus
            .subscribe_to(EventKind::FinishGame, &outro, |outro, _| outro.start());

        outro
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn bindings(&self) -> Vec<KeyBinding> {
        vec![self.quit.clone()]
    }

    fn start(&mut self) {
        info!("Playing outro");
        self.started = true;
        let size = Sprite::Plane.size();
        self.plane = Some(IVec2::new((CANVAS_SIZE.x as i32 - size.x) / 2, CANVAS_SIZE.y as i32 + size.y));

        let switch = self.quit.switch.clone();
        let services = Rc::downgrade(&self.services);
        self.services.timer.attach(OUTRO_QUIT_HINT_DELAY, None).when_over(move || {
            switch.set(true);
            let Some(services) = services.upgrade() else {
                return;
            };
            services.bus.publish(Event::ShowBlinkingHint(HintRequest {
                text: QUIT_HINT.to_string(),
                x: (CANVAS_SIZE.x as i32 - QUIT_HINT.len() as i32 * FONT_WIDTH) / 2,
                y: CANVAS_SIZE.y as i32 - FONT_HEIGHT - 10,
                color: Color::White,
                delay_secs: 0.0,
            }));
        });
    }

    pub fn update(&mut self) {
        if let Some(plane) = &mut self.plane {
            plane.y -= PLANE_SPEED;
            if plane.y + Sprite::Plane.size().y < 0 {
                self.plane = None;
            }
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let top = CANVAS_SIZE.y as i32 / 3;
        for (i, line) in LINES.iter().enumerate() {
            let x = (CANVAS_SIZE.x as i32 - line.len() as i32 * FONT_WIDTH) / 2;
            let color = if i == 0 { Color::Lime } else { Color::White };
            canvas.text(x, top + i as i32 * (FONT_HEIGHT + 2), line, color);
        }
        if let Some(plane) = self.plane {
            canvas.sprite(plane.x, plane.y, Sprite::Plane);
        }
    }
}
