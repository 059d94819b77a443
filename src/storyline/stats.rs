use crate::constants::{CANVAS_SIZE, FONT_HEIGHT, FONT_WIDTH};
use crate::game::Services;
use crate::render::{Canvas, Color};

/// Snapshot of the statusbar taken when a level is completed, shown until the player confirms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelStats {
    pub level: usize,
    pub lines: Vec<String>,
}

impl LevelStats {
    pub fn capture(services: &Services) -> Self {
        Self {
            level: services.level(|level| level.idx),
            lines: services.statusbar.borrow().lines(),
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.cls(Color::Navy);

        let title = format!("LEVEL {} COMPLETE", self.level);
        let x = (CANVAS_SIZE.x as i32 - title.len() as i32 * FONT_WIDTH) / 2;
        let top = CANVAS_SIZE.y as i32 / 3;
        canvas.text(x, top, &title, Color::Yellow);

        for (i, line) in self.lines.iter().enumerate() {
            canvas.text(x, top + (i as i32 + 2) * (FONT_HEIGHT + 2), line, Color::White);
        }
    }
}
