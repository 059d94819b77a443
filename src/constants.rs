//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::{IVec2, UVec2};

/// Target frame rate of the fixed-step loop.
pub const FPS: u32 = 30;
pub const LOOP_TIME: Duration = Duration::from_nanos(1_000_000_000 / FPS as u64);

/// The size of the canvas, in pixels.
pub const CANVAS_SIZE: UVec2 = UVec2::new(256, 256);
/// The scale factor for the window (integer zoom)
pub const SCALE: u32 = 3;

/// The size of each tile, in pixels.
pub const TILE_SIZE: i32 = 8;
/// The size of a level map, in tiles.
pub const MAP_SIZE: UVec2 = UVec2::new(32, 40);
/// The size of a level map, in pixels.
pub const MAP_PIXEL_SIZE: IVec2 = IVec2::new(MAP_SIZE.x as i32 * TILE_SIZE, MAP_SIZE.y as i32 * TILE_SIZE);

pub const FONT_WIDTH: i32 = 4;
pub const FONT_HEIGHT: i32 = 6;

pub mod statusbar {
    use glam::IVec2;

    use super::TILE_SIZE;

    /// Top-left corner the automatic layout starts from.
    pub const ORIGIN: IVec2 = IVec2::new(TILE_SIZE + 3, 10);
    /// Vertical gap inserted above an item unless it specifies its own.
    pub const DEFAULT_GAP: i32 = 2;
    /// Horizontal gap between a progress item's icon and its bar.
    pub const ICON_GAP: i32 = 2;
    pub const BAR_WIDTH: i32 = 40;
    pub const BAR_HEIGHT: i32 = 6;
}

/// Tags used to cancel groups of deferred timers.
pub mod timers {
    pub const BLINKING_HINT: &str = "blinking_text";
    pub const DIALOG: &str = "dialog";
    pub const STORY: &str = "story";
}

/// Tuning values for gameplay. Periods are in frames, delays in seconds.
pub mod mechanics {
    pub const PLAYER_ACCELERATION: f32 = 0.1;
    pub const PLAYER_DRAG: f32 = 0.04;
    pub const PLAYER_MAX_SPEED: f32 = 2.5;
    /// Distance between the ship and the bottom edge of the viewport.
    pub const CAMERA_LEAD: i32 = 64;
    /// Frames a shield or speed power-up stays in effect.
    pub const POWERUP_FRAMES: u64 = 150;
    pub const SPEED_BOOST: f32 = 1.6;

    pub const SHOOT_HOLD: u32 = 8;
    pub const SHOOT_REPEAT: u32 = 4;

    pub const BULLET_SPEED: f32 = 3.0;
    pub const BULLET_WIDTH: f32 = 2.0;
    pub const BULLET_HEIGHT: f32 = 8.0;

    pub const ENEMY_WANDER_PERIOD: u64 = 8;
    pub const ENEMY_SPEED: f32 = 0.6;
    pub const ENEMY_KNOCKBACK: f32 = 16.0;

    pub const BLAST_STAGE_PERIOD: u64 = 5;
    pub const BLAST_STAGES: u8 = 5;

    /// Spare minerals placed on top of the required amount.
    pub const MINERAL_SURPLUS: u32 = 4;

    pub const HINT_BLINK_PERIOD: u64 = 30;
    pub const TYPEWRITER_DELAY: f64 = 0.03;
    pub const DIALOG_DISMISS_DELAY: f64 = 1.0;
    pub const INTRO_SPLASH_DELAY: f64 = 4.8;
    pub const OUTRO_QUIT_HINT_DELAY: f64 = 3.0;
    pub const STAR_COUNT: usize = 48;
}
