//! SDL2 implementations of the drawing surface and keyboard polling.

use glam::IVec2;
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::keyboard::Scancode;
use sdl2::pixels;
use sdl2::rect::{Point, Rect};
use sdl2::render::Canvas as SdlRenderer;
use sdl2::video::Window;
use sdl2::EventPump;
use tracing::trace;

use crate::constants::TILE_SIZE;
use crate::input::Keys;
use crate::map::Tile;
use crate::render::{Canvas, Color, Sprite};

const KEYMAP: [(Scancode, Keys); 11] = [
    (Scancode::Up, Keys::UP),
    (Scancode::Down, Keys::DOWN),
    (Scancode::Left, Keys::LEFT),
    (Scancode::Right, Keys::RIGHT),
    (Scancode::Space, Keys::SPACE),
    (Scancode::Q, Keys::Q),
    (Scancode::Escape, Keys::ESCAPE),
    (Scancode::Backspace, Keys::BACKSPACE),
    (Scancode::M, Keys::M),
    (Scancode::P, Keys::P),
    (Scancode::Tab, Keys::TAB),
];

/// The game keys currently held down.
pub fn pressed_keys(event_pump: &EventPump) -> Keys {
    let state = event_pump.keyboard_state();
    KEYMAP
        .iter()
        .filter(|(scancode, _)| state.is_scancode_pressed(*scancode))
        .fold(Keys::empty(), |keys, (_, key)| keys | *key)
}

fn to_sdl(color: Color) -> pixels::Color {
    let rgb = color.rgb();
    pixels::Color::RGB((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

fn report(result: Result<(), String>) {
    if let Err(error) = result {
        trace!(%error, "Draw call failed");
    }
}

/// Draws into an SDL window canvas at the logical game resolution.
///
/// Sprites and tiles are rendered as flat colored shapes.
pub struct SdlCanvas {
    inner: SdlRenderer<Window>,
    offset: IVec2,
}

impl SdlCanvas {
    pub fn new(inner: SdlRenderer<Window>) -> Self {
        Self {
            inner,
            offset: IVec2::ZERO,
        }
    }

    pub fn present(&mut self) {
        self.inner.present();
    }

    fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.inner.set_draw_color(to_sdl(color));
        report(self.inner.fill_rect(Rect::new(x - self.offset.x, y - self.offset.y, w as u32, h as u32)));
    }
}

impl Canvas for SdlCanvas {
    fn cls(&mut self, color: Color) {
        self.inner.set_draw_color(to_sdl(color));
        self.inner.clear();
    }

    fn camera(&mut self, offset: IVec2) {
        self.offset = offset;
    }

    fn pixel(&mut self, x: i32, y: i32, color: Color) {
        self.inner.set_draw_color(to_sdl(color));
        report(self.inner.draw_point(Point::new(x - self.offset.x, y - self.offset.y)));
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        self.fill(x, y, w, h, color);
    }

    fn rectb(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.inner.set_draw_color(to_sdl(color));
        report(self.inner.draw_rect(Rect::new(x - self.offset.x, y - self.offset.y, w as u32, h as u32)));
    }

    fn text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        let (x, y) = (x - self.offset.x, y - self.offset.y);
        report(self.inner.string(x as i16, y as i16, text, to_sdl(color)));
    }

    fn sprite(&mut self, x: i32, y: i32, sprite: Sprite) {
        let size = sprite.size();
        self.fill(x, y, size.x, size.y, sprite.color());
    }

    fn tile(&mut self, x: i32, y: i32, tile: Tile) {
        match tile {
            Tile::Blank | Tile::EnemySpawner => {}
            Tile::Rock => self.fill(x, y, TILE_SIZE, TILE_SIZE, Color::Brown),
            Tile::Mineral(kind) => self.fill(x + 2, y + 2, TILE_SIZE - 4, TILE_SIZE - 4, Sprite::Mineral(kind).color()),
            Tile::PowerUp(kind) => self.sprite(x, y, Sprite::PowerUp(kind)),
        }
    }
}
