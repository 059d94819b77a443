//! Heads-up display elements drawn over the playfield.

pub mod statusbar;

pub use statusbar::{Statusbar, StatusbarItem};
