//! Misi Hijau: a retro shoot-'em-up about mining minerals at the edge of the Kuiper belt.
//!
//! The library holds the whole game behind two narrow host interfaces, [`render::Canvas`] and
//! [`audio::SoundBackend`], so it runs the same in the SDL window, the headless runner and tests.

#[cfg(feature = "sdl")]
pub mod app;
pub mod audio;
pub mod constants;
pub mod direction;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod hud;
pub mod input;
pub mod level;
pub mod map;
pub mod platform;
pub mod render;
pub mod sprites;
pub mod storyline;
pub mod systems;
pub mod timing;
pub mod ui;
