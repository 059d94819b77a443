use glam::IVec2;

use crate::map::Tile;
use crate::render::{Canvas, Color, Sprite};

/// A single recorded draw call, in screen coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear(Color),
    Pixel { at: IVec2, color: Color },
    Rect { at: IVec2, size: IVec2, color: Color, filled: bool },
    Text { at: IVec2, text: String, color: Color },
    Sprite { at: IVec2, sprite: Sprite },
    Tile { at: IVec2, tile: Tile },
}

/// A canvas that remembers what was drawn since the last clear.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    camera: IVec2,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything recorded so far. The camera is kept.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Every text drawn, with its position, in draw order.
    pub fn texts(&self) -> Vec<(IVec2, &str)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { at, text, .. } => Some((*at, text.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|(_, text)| text.contains(needle))
    }

    pub fn sprites(&self) -> Vec<(IVec2, Sprite)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Sprite { at, sprite } => Some((*at, *sprite)),
                _ => None,
            })
            .collect()
    }

    /// True when nothing but screen clears was drawn.
    pub fn is_blank(&self) -> bool {
        self.commands.iter().all(|command| matches!(command, DrawCommand::Clear(_)))
    }

    fn screen(&self, x: i32, y: i32) -> IVec2 {
        IVec2::new(x, y) - self.camera
    }
}

impl Canvas for RecordingCanvas {
    fn cls(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn camera(&mut self, offset: IVec2) {
        self.camera = offset;
    }

    fn pixel(&mut self, x: i32, y: i32, color: Color) {
        let at = self.screen(x, y);
        self.commands.push(DrawCommand::Pixel { at, color });
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let at = self.screen(x, y);
        self.commands.push(DrawCommand::Rect {
            at,
            size: IVec2::new(w, h),
            color,
            filled: true,
        });
    }

    fn rectb(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let at = self.screen(x, y);
        self.commands.push(DrawCommand::Rect {
            at,
            size: IVec2::new(w, h),
            color,
            filled: false,
        });
    }

    fn text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        let at = self.screen(x, y);
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            color,
        });
    }

    fn sprite(&mut self, x: i32, y: i32, sprite: Sprite) {
        let at = self.screen(x, y);
        self.commands.push(DrawCommand::Sprite { at, sprite });
    }

    fn tile(&mut self, x: i32, y: i32, tile: Tile) {
        let at = self.screen(x, y);
        self.commands.push(DrawCommand::Tile { at, tile });
    }
}
