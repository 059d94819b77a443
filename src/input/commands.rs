use crate::direction::Direction;

/// High-level intents produced by key bindings and broadcast as [`Event::Command`](crate::events::Event::Command).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameCommand {
    Move(Direction),
    Shoot,
    /// Advance a slideshow or leave the level-stats screen.
    Confirm,
    DismissDialog,
    /// Debug shortcut that completes the current level.
    SkipLevel,
    TogglePause,
    ToggleMute,
    ToggleDebug,
    Quit,
}
