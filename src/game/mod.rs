//! The game loop: shared services, the phase-driven loop controller, and the [`Game`] facade the
//! frontends drive once per frame.

use std::rc::Rc;
use std::time::Instant;

use glam::IVec2;
use tracing::info;

use crate::audio::{Audio, SoundBackend};
use crate::constants::{CANVAS_SIZE, FONT_HEIGHT};
use crate::error::GameResult;
use crate::formatter;
use crate::input::Keys;
use crate::render::{Canvas, Color};
use crate::systems::{StageId, StageTimings};
use crate::timing::WallClock;

pub mod controller;
pub mod services;
pub mod state;
pub mod world;

pub use controller::{LoopContext, LoopController};
pub use services::Services;
pub use state::Phase;
pub use world::World;

/// One running game: the loop controller and the world it drives.
pub struct Game {
    controller: LoopController<World>,
    world: World,
}

impl Game {
    pub fn new(wall: Rc<dyn WallClock>, backend: Box<dyn SoundBackend>, seed: Option<u64>) -> GameResult<Self> {
        let services = Services::new(wall, Audio::new(backend), seed)?;
        Self::with_services(services)
    }

    pub fn with_services(services: Rc<Services>) -> GameResult<Self> {
        let world = World::new(services)?;
        let mut controller = LoopController::new();
        let (update, draw) = world.phase().functions();
        controller.install(update, draw);

        info!(phase = %world.phase(), "Game created");
        Ok(Self { controller, world })
    }

    pub fn set_keys(&mut self, keys: Keys) {
        self.world.set_keys(keys);
    }

    /// Runs one frame of simulation.
    pub fn tick(&mut self) -> GameResult<()> {
        let frame = self.world.services.clock.advance();
        formatter::set_frame(frame);

        self.controller.tick(&mut self.world);

        let timings = self.world.timings.clone();
        let next = timings.measure(StageId::Lifecycle, || self.world.end_frame())?;
        if let Some(phase) = next {
            info!(%phase, "Phase change");
            let (update, draw) = phase.functions();
            self.controller.install(update, draw);
        }
        Ok(())
    }

    /// Renders the current phase, then the interface layer on top.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let timings = self.world.timings.clone();
        timings.measure(StageId::Draw, || {
            self.controller.render(&self.world, canvas);
            canvas.camera(IVec2::ZERO);
            self.world.ui.draw_all(canvas);
            if self.world.debug_overlay() {
                self.draw_timings(canvas);
            }
        });
    }

    /// Feeds input, ticks and draws, recording the frame's total time.
    pub fn frame(&mut self, keys: Keys, canvas: &mut dyn Canvas) -> GameResult<()> {
        let start = Instant::now();
        self.set_keys(keys);
        self.tick()?;
        self.draw(canvas);
        self.world.timings.add_timing(StageId::Total, start.elapsed());
        Ok(())
    }

    fn draw_timings(&self, canvas: &mut dyn Canvas) {
        let lines = self.world.timings.format_timing_display();
        let line_height = FONT_HEIGHT + 1;
        let top = CANVAS_SIZE.y as i32 - lines.len() as i32 * line_height - 2;
        for (i, line) in lines.iter().enumerate() {
            canvas.text(2, top + i as i32 * line_height, line, Color::Lime);
        }
    }

    pub fn should_quit(&self) -> bool {
        self.world.should_quit()
    }

    pub fn phase(&self) -> Phase {
        self.world.phase()
    }

    pub fn services(&self) -> &Rc<Services> {
        &self.world.services
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn timings(&self) -> &StageTimings {
        &self.world.timings
    }
}
