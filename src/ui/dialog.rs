use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::audio::Sound;
use crate::constants::mechanics::DIALOG_DISMISS_DELAY;
use crate::constants::{timers, CANVAS_SIZE, FONT_HEIGHT, FONT_WIDTH};
use crate::entity::Entity;
use crate::events::{DialogRequest, Event, EventKind};
use crate::game::Services;
use crate::input::{BindingSwitch, ButtonMode, GameCommand, KeyBinding, Keys};
use crate::render::{Canvas, Color};
use crate::ui::wrap_text;

const PADDING: i32 = 5;
const LINE_HEIGHT: i32 = FONT_HEIGHT + 1;

/// A modal message box.
///
/// Showing one stops the game loop. The dismiss key only works once the box has been on screen
/// for [`DIALOG_DISMISS_DELAY`] seconds, so a key held from gameplay cannot close it by accident.
pub struct Dialog {
    services: Rc<Services>,
    binding: KeyBinding,
    request: Option<DialogRequest>,
    lines: Vec<String>,
}

impl Dialog {
    pub fn new(services: &Rc<Services>) -> Rc<RefCell<Self>> {
        let binding = KeyBinding::new(
            "dismiss_dialog",
            Keys::Q,
            ButtonMode::Pressed { hold: 0, repeat: 0 },
            GameCommand::DismissDialog,
        )
        .inactive();

        let dialog = Rc::new(RefCell::new(Self {
            services: services.clone(),
            binding,
            request: None,
            lines: Vec::new(),
        }));

        let bus = &services.bus;
        bus.subscribe_to(EventKind::ShowDialog, &dialog, |dialog, event| {
            if let Event::ShowDialog(request) = event {
                dialog.show(request.clone());
            }
        });
        bus.subscribe_to(EventKind::Command, &dialog, |dialog, event| {
            if let Event::Command(GameCommand::DismissDialog) = event {
                dialog.dismiss();
            }
        });

        dialog
    }

    pub fn is_open(&self) -> bool {
        self.request.is_some()
    }

    /// Whether the dismiss key is armed.
    pub fn can_dismiss(&self) -> bool {
        self.binding.switch.is_active()
    }

    fn show(&mut self, request: DialogRequest) {
        debug!(width = request.width, "Dialog shown");
        self.lines = wrap_text(&request.text, request.width);
        self.request = Some(request);

        self.services.audio.play(Sound::Popup);
        self.services.bus.publish(Event::StopGameLoop);

        self.services.timer.destroy_by_id(timers::DIALOG);
        let switch: BindingSwitch = self.binding.switch.clone();
        switch.set(false);
        self.services
            .timer
            .attach(DIALOG_DISMISS_DELAY, Some(timers::DIALOG))
            .when_over(move || {
                trace!("Dialog dismissal armed");
                switch.set(true);
            });
    }

    fn dismiss(&mut self) {
        let Some(request) = self.request.take() else {
            return;
        };
        debug!("Dialog dismissed");
        self.lines.clear();
        self.binding.switch.set(false);
        self.services.timer.destroy_by_id(timers::DIALOG);

        self.services.bus.publish(Event::ResumeGameLoop);
        if let Some(next) = request.on_dismiss {
            self.services.bus.publish(*next);
        }
    }
}

impl Entity for Dialog {
    fn draw(&self, canvas: &mut dyn Canvas) {
        let Some(request) = &self.request else {
            return;
        };

        let hint_rows = i32::from(request.dismiss_hint.is_some()) * 2;
        let w = request.width + PADDING * 2;
        let h = (self.lines.len() as i32 + hint_rows) * LINE_HEIGHT + PADDING * 2;
        let x = (CANVAS_SIZE.x as i32 - w) / 2;
        let y = (CANVAS_SIZE.y as i32 - h) / 2;

        canvas.rect(x, y, w, h, request.background);
        canvas.rectb(x, y, w, h, Color::Black);
        for (i, line) in self.lines.iter().enumerate() {
            canvas.text(x + PADDING, y + PADDING + i as i32 * LINE_HEIGHT, line, request.text_color);
        }

        if let (Some(hint), true) = (&request.dismiss_hint, self.can_dismiss()) {
            let hint_x = x + w - PADDING - hint.len() as i32 * FONT_WIDTH;
            canvas.text(hint_x, y + h - PADDING - FONT_HEIGHT, hint, Color::Yellow);
        }
    }

    fn keybindings(&self) -> Vec<KeyBinding> {
        vec![self.binding.clone()]
    }
}
