use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::constants::mechanics::HINT_BLINK_PERIOD;
use crate::constants::timers;
use crate::entity::Entity;
use crate::error::GameResult;
use crate::events::{Event, EventKind, HintRequest};
use crate::game::Services;
use crate::render::Canvas;
use crate::timing::TickGate;

/// A line of text that blinks to prompt the player.
pub struct BlinkingHint {
    services: Rc<Services>,
    request: Option<HintRequest>,
    gate: TickGate,
    /// Set once the show delay has elapsed.
    armed: Rc<Cell<bool>>,
    visible: bool,
}

impl BlinkingHint {
    pub fn new(services: &Rc<Services>) -> GameResult<Rc<RefCell<Self>>> {
        let hint = Rc::new(RefCell::new(Self {
            services: services.clone(),
            request: None,
            gate: services.ticks.attach(HINT_BLINK_PERIOD)?,
            armed: Rc::new(Cell::new(false)),
            visible: false,
        }));

        let bus = &services.bus;
        bus.subscribe_to(EventKind::ShowBlinkingHint, &hint, |hint, event| {
            if let Event::ShowBlinkingHint(request) = event {
                hint.show(request.clone());
            }
        });
        bus.subscribe_to(EventKind::HideBlinkingHint, &hint, |hint, _| hint.hide());
        bus.subscribe_to(EventKind::StartGame, &hint, |hint, _| hint.hide());

        Ok(hint)
    }

    pub fn request(&self) -> Option<&HintRequest> {
        self.request.as_ref()
    }

    /// Whether the text is drawn this frame.
    pub fn is_visible(&self) -> bool {
        self.request.is_some() && self.armed.get() && self.visible
    }

    fn show(&mut self, request: HintRequest) {
        self.services.timer.destroy_by_id(timers::BLINKING_HINT);
        debug!(text = %request.text, delay = request.delay_secs, "Blinking hint scheduled");

        self.armed.set(false);
        self.visible = true;
        let (armed, gate) = (self.armed.clone(), self.gate.clone());
        self.services
            .timer
            .attach(request.delay_secs, Some(timers::BLINKING_HINT))
            .when_over(move || {
                armed.set(true);
                gate.reset();
            });
        self.request = Some(request);
    }

    fn hide(&mut self) {
        self.services.timer.destroy_by_id(timers::BLINKING_HINT);
        if self.request.take().is_some() {
            debug!("Blinking hint hidden");
        }
        self.armed.set(false);
    }
}

impl Entity for BlinkingHint {
    fn update(&mut self) {
        if self.armed.get() && self.gate.get() {
            self.visible = !self.visible;
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if let (true, Some(request)) = (self.is_visible(), &self.request) {
            canvas.text(request.x, request.y, &request.text, request.color);
        }
    }
}
