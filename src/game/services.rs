use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::IVec2;
use rand::rngs::SmallRng;

use crate::audio::Audio;
use crate::error::GameResult;
use crate::events::{EventBus, EventKind};
use crate::hud::Statusbar;
use crate::level::{table, Level, LevelHandler};
use crate::map::TileGrid;
use crate::platform;
use crate::timing::{DeferredTimer, FrameClock, TickGateRegistry, WallClock};

/// The engine-facing context every entity is constructed with.
///
/// Holds the frame clock and the scheduling, messaging and world-state services. Entities keep
/// an `Rc` to it instead of reaching for global state.
pub struct Services {
    pub clock: FrameClock,
    pub wall: Rc<dyn WallClock>,
    pub bus: EventBus,
    pub ticks: TickGateRegistry,
    pub timer: DeferredTimer,
    pub levels: RefCell<LevelHandler>,
    pub tilemap: RefCell<TileGrid>,
    pub statusbar: Rc<RefCell<Statusbar>>,
    pub audio: Audio,
    /// Top-left corner of the viewport, in map pixels.
    pub camera: Cell<IVec2>,
    rng: RefCell<SmallRng>,
}

impl Services {
    /// Services over the built-in level table.
    pub fn new(wall: Rc<dyn WallClock>, audio: Audio, seed: Option<u64>) -> GameResult<Rc<Self>> {
        Self::with_levels(wall, audio, seed, table::levels())
    }

    pub fn with_levels(wall: Rc<dyn WallClock>, audio: Audio, seed: Option<u64>, levels: Vec<Level>) -> GameResult<Rc<Self>> {
        let levels = LevelHandler::new(levels)?;
        let tilemap = levels.current().map.load()?;
        let clock = FrameClock::new();

        let services = Rc::new(Self {
            ticks: TickGateRegistry::new(clock.clone()),
            timer: DeferredTimer::new(wall.clone()),
            clock,
            wall,
            bus: EventBus::new(),
            levels: RefCell::new(levels),
            tilemap: RefCell::new(tilemap),
            statusbar: Rc::new(RefCell::new(Statusbar::new())),
            audio,
            camera: Cell::new(IVec2::ZERO),
            rng: RefCell::new(platform::rng(seed)),
        });

        services
            .bus
            .subscribe_to(EventKind::UpdateStatusbar, &services.statusbar, |statusbar, _| {
                statusbar.refresh_values()
            });

        Ok(services)
    }

    /// Advances the frame-derived services: tick gates first, then due timers.
    pub fn advance(&self) {
        self.ticks.update_all();
        self.timer.update();
    }

    pub fn with_rng<R>(&self, f: impl FnOnce(&mut SmallRng) -> R) -> R {
        f(&mut self.rng.borrow_mut())
    }

    /// Runs `f` against the current level.
    pub fn level<R>(&self, f: impl FnOnce(&Level) -> R) -> R {
        f(self.levels.borrow().current())
    }

    pub fn level_mut<R>(&self, f: impl FnOnce(&mut Level) -> R) -> R {
        f(self.levels.borrow_mut().current_mut())
    }
}
