use crate::game::controller::{DrawFn, UpdateFn};
use crate::game::world::World;

/// The screens the game moves through. Each maps to the update/draw pair the loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum_macros::Display, strum_macros::EnumIter)]
pub enum Phase {
    /// Splash screen and story slideshow.
    #[default]
    Intro,
    Playing,
    /// Paused by the player: the scene stays on screen but nothing moves.
    Suspended,
    /// Nothing runs or draws while a modal dialog owns the screen.
    Blank,
    /// Interstitial summary shown between two levels.
    LevelStats,
    Outro,
}

impl Phase {
    pub fn functions(self) -> (Option<UpdateFn<World>>, Option<DrawFn<World>>) {
        match self {
            Phase::Intro => (Some(World::update_intro), Some(World::draw_intro)),
            Phase::Playing => (Some(World::update_playing), Some(World::draw_playing)),
            Phase::Suspended => (None, Some(World::draw_suspended)),
            Phase::Blank => (None, None),
            Phase::LevelStats => (None, Some(World::draw_level_stats)),
            Phase::Outro => (Some(World::update_outro), Some(World::draw_outro)),
        }
    }
}
