use std::rc::Rc;

use tracing::{debug, warn};

use crate::events::{DialogRequest, Event, EventKind};
use crate::game::Services;
use crate::render::Color;
use crate::storyline::LEVEL_BRIEFINGS;

const DIALOG_WIDTH: i32 = 200;

/// Shows each level's briefing when it starts. Play begins once it is dismissed.
pub struct StoryDialogs {
    services: Rc<Services>,
}

impl StoryDialogs {
    pub fn new(services: &Rc<Services>) -> Rc<Self> {
        let dialogs = Rc::new(Self {
            services: services.clone(),
        });

        services
            .bus
            .subscribe_weak(EventKind::ShowLevelDialog, &dialogs, |dialogs, event| {
                if let Event::ShowLevelDialog { level } = event {
                    dialogs.show(*level);
                }
            });

        dialogs
    }

    fn show(&self, level: usize) {
        let Some(text) = level.checked_sub(1).and_then(|index| LEVEL_BRIEFINGS.get(index)) else {
            warn!(level, "No briefing for level; starting immediately");
            self.services.bus.publish(Event::ActivateLevel);
            return;
        };

        debug!(level, "Showing level briefing");
        self.services.bus.publish(Event::ShowDialog(DialogRequest {
            text: text.to_string(),
            width: DIALOG_WIDTH,
            text_color: Color::White,
            background: Color::Brown,
            dismiss_hint: Some("Q to dismiss and start".to_string()),
            on_dismiss: Some(Box::new(Event::ActivateLevel)),
        }));
    }
}
