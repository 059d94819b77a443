//! The drawing surface the game renders onto.
//!
//! Everything draws through the [`Canvas`] trait: the windowed frontend blits to SDL2, while
//! the headless runner and the tests record draw calls with [`RecordingCanvas`].

use glam::IVec2;

use crate::level::{EnemyVariant, ShipVariant};
use crate::map::{MineralKind, PowerUpKind, Tile};

pub mod recording;

pub use recording::{DrawCommand, RecordingCanvas};

/// The fixed 16-color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum_macros::EnumIter)]
#[repr(u8)]
pub enum Color {
    #[default]
    Black,
    Navy,
    Purple,
    Green,
    Brown,
    DarkBlue,
    LightBlue,
    White,
    Red,
    Orange,
    Yellow,
    Lime,
    Cyan,
    Gray,
    Pink,
    Peach,
}

impl Color {
    /// The color as `0xRRGGBB`.
    pub const fn rgb(self) -> u32 {
        match self {
            Color::Black => 0x000000,
            Color::Navy => 0x2B335F,
            Color::Purple => 0x7E2072,
            Color::Green => 0x19959C,
            Color::Brown => 0x8B4852,
            Color::DarkBlue => 0x395C98,
            Color::LightBlue => 0xA9C1FF,
            Color::White => 0xEEEEEE,
            Color::Red => 0xD4186C,
            Color::Orange => 0xD38441,
            Color::Yellow => 0xE9C35B,
            Color::Lime => 0x70C6A9,
            Color::Cyan => 0x7696DE,
            Color::Gray => 0xA3A3A3,
            Color::Pink => 0xFF9798,
            Color::Peach => 0xEDC7B0,
        }
    }
}

/// Images the game blits, identified by what they depict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Ship(ShipVariant),
    Enemy(EnemyVariant),
    /// Impact effect at the given stage.
    Blast(u8),
    Heart,
    Mineral(MineralKind),
    PowerUp(PowerUpKind),
    Plane,
}

impl Sprite {
    /// Size in pixels.
    pub fn size(self) -> IVec2 {
        match self {
            Sprite::Plane => IVec2::new(16, 16),
            _ => IVec2::splat(8),
        }
    }

    /// The dominant color, used by frontends that render sprites as flat shapes.
    pub fn color(self) -> Color {
        match self {
            Sprite::Ship(ShipVariant::Scout) => Color::LightBlue,
            Sprite::Ship(ShipVariant::Hauler) => Color::Lime,
            Sprite::Ship(ShipVariant::Cruiser) => Color::Peach,
            Sprite::Enemy(EnemyVariant::Grug) => Color::Green,
            Sprite::Enemy(EnemyVariant::Phong) => Color::Purple,
            Sprite::Enemy(EnemyVariant::Squidge) => Color::Pink,
            Sprite::Blast(_) => Color::Orange,
            Sprite::Heart => Color::Red,
            Sprite::Mineral(MineralKind::Nethonite) => Color::DarkBlue,
            Sprite::Mineral(MineralKind::Photosium) => Color::Green,
            Sprite::Mineral(MineralKind::Electricium) => Color::Yellow,
            Sprite::PowerUp(_) => Color::White,
            Sprite::Plane => Color::Gray,
        }
    }
}

/// Immediate-mode drawing primitives, in pixels.
///
/// Positions are offset by the current camera, so entities draw in map coordinates and
/// interface elements reset the camera to draw in screen coordinates.
pub trait Canvas {
    fn cls(&mut self, color: Color);
    fn camera(&mut self, offset: IVec2);
    fn pixel(&mut self, x: i32, y: i32, color: Color);
    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);
    /// Rectangle outline.
    fn rectb(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);
    fn text(&mut self, x: i32, y: i32, text: &str, color: Color);
    fn sprite(&mut self, x: i32, y: i32, sprite: Sprite);
    fn tile(&mut self, x: i32, y: i32, tile: Tile);
}
