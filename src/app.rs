use std::rc::Rc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use sdl2::event::{Event, WindowEvent};
use sdl2::EventPump;
use tracing::{debug, error, info, warn};

use crate::audio::NullBackend;
use crate::constants::{CANVAS_SIZE, LOOP_TIME, SCALE};
use crate::game::Game;
use crate::platform::sdl::{pressed_keys, SdlCanvas};
use crate::platform::sleep;
use crate::timing::SystemClock;

pub struct App {
    game: Game,
    canvas: SdlCanvas,
    event_pump: EventPump,
}

impl App {
    pub fn new() -> Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;

        let window = video_subsystem
            .window("Misi Hijau", CANVAS_SIZE.x * SCALE, CANVAS_SIZE.y * SCALE)
            .resizable()
            .position_centered()
            .build()?;

        let mut canvas = window.into_canvas().build()?;
        canvas.set_logical_size(CANVAS_SIZE.x, CANVAS_SIZE.y)?;

        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
        let game = Game::new(Rc::new(SystemClock::new()), Box::new(NullBackend), None)?;

        Ok(Self {
            game,
            canvas: SdlCanvas::new(canvas),
            event_pump,
        })
    }

    /// Runs one frame. Returns false once the game should exit.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Window { win_event, .. } => match win_event {
                    WindowEvent::Hidden => debug!("Window hidden"),
                    WindowEvent::Shown => debug!("Window shown"),
                    _ => {}
                },
                Event::Quit { .. } => {
                    info!("Window closed. Exiting...");
                    return false;
                }
                _ => {}
            }
        }

        let keys = pressed_keys(&self.event_pump);
        if let Err(e) = self.game.frame(keys, &mut self.canvas) {
            error!("Frame failed: {e}");
            return false;
        }
        self.canvas.present();

        if self.game.should_quit() {
            info!("Exit requested. Exiting...");
            return false;
        }

        let elapsed = start.elapsed();
        if elapsed < LOOP_TIME {
            sleep(LOOP_TIME.saturating_sub(elapsed));
        } else {
            let slowest = self.game.timings().get_slowest_stages(2);
            warn!(behind = ?(elapsed - LOOP_TIME), ?slowest, "Game loop behind schedule");
        }

        true
    }
}

