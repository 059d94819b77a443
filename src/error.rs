//! Centralized error types for the game.
//!
//! Every fallible operation in the core reports one of the domain errors below,
//! which all convert into [`GameError`] so callers can propagate with `?`.

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Timing error: {0}")]
    Timing(#[from] TimingError),

    #[error("Statusbar error: {0}")]
    Statusbar(#[from] StatusbarError),

    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised when building frame-based timing primitives.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingError {
    #[error("Tick gate period must be at least one frame")]
    ZeroPeriod,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusbarError {
    #[error("Cannot lay out a statusbar with no items")]
    EmptyLayout,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelError {
    #[error("No level at index {0}")]
    NoSuchLevel(usize),

    #[error("Level table is empty")]
    EmptyTable,
}

/// Error type for level layout parsing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("Unknown character in layout: {0:?}")]
    UnknownTile(char),

    #[error("Row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("Layout has {found} rows, expected {expected}")]
    WrongHeight { expected: usize, found: usize },
}

/// Platform-specific errors.
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    #[error("Tracing initialization failed: {0}")]
    Tracing(String),

    #[cfg(feature = "sdl")]
    #[error("SDL error: {0}")]
    Sdl(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
