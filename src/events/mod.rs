//! The closed set of events entities exchange, and the bus that carries them.

use glam::Vec2;

use crate::input::GameCommand;
use crate::map::{PowerUpKind, Tile};
use crate::render::Color;

pub mod bus;

pub use bus::{EventBus, Outcome, Reply, SubscriptionId};

/// An axis-aligned rectangle in map pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn at(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.x + other.w && other.x < self.x + self.w && self.y < other.y + other.h && other.y < self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// A modal message box. `on_dismiss` is published once the player closes it.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogRequest {
    pub text: String,
    pub width: i32,
    pub text_color: Color,
    pub background: Color,
    pub dismiss_hint: Option<String>,
    pub on_dismiss: Option<Box<Event>>,
}

/// A line of text that blinks after an optional delay.
#[derive(Debug, Clone, PartialEq)]
pub struct HintRequest {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub color: Color,
    pub delay_secs: f64,
}

/// Text revealed one character at a time. `on_done` is published when the last character shows.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub color: Color,
    pub on_done: Option<Box<Event>>,
}

#[derive(Debug, Clone, PartialEq, strum_macros::EnumDiscriminants)]
#[strum_discriminants(name(EventKind), derive(Hash, strum_macros::Display, strum_macros::EnumIter))]
pub enum Event {
    /// The intro finished; set up and announce the first level.
    StartGame,
    /// A completion flag may have changed; re-test the current level.
    CheckLevelComplete,
    AdvanceLevel,
    /// The player was defeated; restart the current level in place.
    LevelRestart,
    /// Gameplay becomes interactive after the level's introduction.
    ActivateLevel,
    /// Announce a freshly initialised level (1-based index).
    ShowLevelDialog { level: usize },
    /// The last level is complete.
    FinishGame,
    StopGameLoop,
    ResumeGameLoop,

    PlayerShoot { x: f32, y: f32 },
    /// Does any projectile overlap these bounds? A projectile that does is consumed.
    BulletsCheck(Bounds),
    /// Does the player overlap these bounds?
    PlayerCollidingEnemy(Bounds),
    PlayerHealthChange { delta: i32 },
    AppendBlastEffect(Bounds),
    PowerUpCollected(PowerUpKind),
    /// The player is over a non-blank tile, in tile coordinates.
    TilemapProbe { tile: Tile, x: u32, y: u32 },

    UpdateStatusbar,
    ShowDialog(DialogRequest),
    ShowBlinkingHint(HintRequest),
    HideBlinkingHint,
    AnimateText(TextRequest),
    InterruptText,
    /// The current slide finished animating.
    SlideshowNext,

    Command(GameCommand),
}

impl From<GameCommand> for Event {
    fn from(command: GameCommand) -> Self {
        Event::Command(command)
    }
}
