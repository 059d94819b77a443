//! Runs the game without a window: scripted keys, a recording canvas and a simulated clock.
//!
//! Usage: `headless [FRAMES]`. Logs the frame-stage timings every ten simulated seconds.

use std::rc::Rc;

use anyhow::{Context, Result};
use misi_hijau::audio::NullBackend;
use misi_hijau::constants::{FPS, LOOP_TIME};
use misi_hijau::game::Game;
use misi_hijau::input::Keys;
use misi_hijau::platform;
use misi_hijau::render::RecordingCanvas;
use misi_hijau::timing::ManualClock;
use tracing::info;

const DEFAULT_FRAMES: u64 = FPS as u64 * 120;
const REPORT_PERIOD: u64 = FPS as u64 * 10;

/// A crude autopilot: climbs while weaving, fires constantly and taps the menu keys.
fn scripted_keys(frame: u64) -> Keys {
    let mut keys = Keys::UP;
    match frame % 120 {
        60..80 => keys |= Keys::LEFT,
        80..100 => keys |= Keys::RIGHT,
        _ => {}
    }
    if frame % 45 < 2 {
        keys |= Keys::SPACE;
    }
    if frame % 60 == 30 {
        keys |= Keys::Q;
    }
    keys
}

fn main() -> Result<()> {
    platform::init_tracing("info")?;

    let frames = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().with_context(|| format!("invalid frame count: {arg}"))?,
        None => DEFAULT_FRAMES,
    };

    let clock = Rc::new(ManualClock::new());
    let mut game = Game::new(clock.clone(), Box::new(NullBackend), Some(0x4d69_7369))?;
    let mut canvas = RecordingCanvas::new();
    info!(frames, "Running headless");

    for frame in 0..frames {
        clock.advance(LOOP_TIME);
        canvas.clear();
        game.frame(scripted_keys(frame), &mut canvas)?;

        if frame % REPORT_PERIOD == REPORT_PERIOD - 1 {
            for line in game.timings().format_timing_display() {
                info!(phase = %game.phase(), "{line}");
            }
        }
        if game.should_quit() {
            info!(frame, "Game asked to quit");
            break;
        }
    }

    let level = game.services().level(|level| level.idx);
    info!(phase = %game.phase(), level, "Headless run finished");
    Ok(())
}
