use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::entity::EntityRegistry;
use crate::error::{GameError, GameResult};
use crate::events::{Event, EventKind, Outcome, Reply, SubscriptionId};
use crate::game::Services;

/// Where the campaign stands. Indices are zero-based positions in the level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    AwaitingStart,
    Playing(usize),
    LevelComplete(usize),
    PlayerDefeated(usize),
    AllLevelsComplete,
}

/// A structural change requested by an event, applied by the game at the end of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Advance,
    Restart,
}

/// Reacts to lifecycle events and sequences level setup across the registries, the statusbar
/// and the bus.
///
/// Event handlers only record state changes and queue a [`Transition`]; the heavy lifting in
/// the `apply_*` methods runs between frames, never while an entity is mid-update.
pub struct LevelLifecycle {
    services: Rc<Services>,
    state: Cell<LevelState>,
    pending: Cell<Option<Transition>>,
    advance_subscription: Cell<Option<SubscriptionId>>,
}

impl LevelLifecycle {
    pub fn new(services: Rc<Services>) -> Rc<Self> {
        let lifecycle = Rc::new(Self {
            services,
            state: Cell::new(LevelState::AwaitingStart),
            pending: Cell::new(None),
            advance_subscription: Cell::new(None),
        });

        let bus = &lifecycle.services.bus;
        bus.subscribe_weak(EventKind::StartGame, &lifecycle, |this, _| this.on_start_game());
        bus.subscribe_weak(EventKind::CheckLevelComplete, &lifecycle, |this, _| {
            this.on_check_level_complete()
        });
        let advance = bus.subscribe_weak(EventKind::AdvanceLevel, &lifecycle, |this, _| this.on_advance_level());
        lifecycle.advance_subscription.set(Some(advance));
        bus.subscribe_weak(EventKind::LevelRestart, &lifecycle, |this, _| this.on_level_restart());

        lifecycle
    }

    pub fn state(&self) -> LevelState {
        self.state.get()
    }

    pub fn pending(&self) -> Option<Transition> {
        self.pending.get()
    }

    pub fn take_pending(&self) -> Option<Transition> {
        self.pending.take()
    }

    /// Both completion flags of the current level are set.
    pub fn check_complete(&self) -> bool {
        self.services.level(|level| level.is_complete())
    }

    fn request(&self, transition: Transition) -> bool {
        if let Some(queued) = self.pending.get() {
            debug!(?queued, ?transition, "Transition already queued");
            return false;
        }
        self.pending.set(Some(transition));
        true
    }

    fn on_start_game(&self) -> Reply {
        if self.state.get() != LevelState::AwaitingStart {
            return Reply::No;
        }
        self.request(Transition::Start).into()
    }

    fn on_check_level_complete(&self) -> Reply {
        if !matches!(self.state.get(), LevelState::Playing(_)) || !self.check_complete() {
            return Reply::No;
        }
        self.services.bus.publish(Event::AdvanceLevel);
        Reply::Yes
    }

    fn on_advance_level(&self) -> Reply {
        let LevelState::Playing(index) = self.state.get() else {
            debug!(state = ?self.state.get(), "Ignoring advance request");
            return Reply::No;
        };

        if self.services.levels.borrow().is_last() {
            info!("All levels complete");
            self.state.set(LevelState::AllLevelsComplete);
            if let Some(id) = self.advance_subscription.take() {
                self.services.bus.unsubscribe(EventKind::AdvanceLevel, id);
            }
            self.services.bus.publish(Event::FinishGame);
            return Reply::Yes;
        }

        if !self.request(Transition::Advance) {
            return Reply::No;
        }
        info!(level = index + 1, "Level complete");
        self.state.set(LevelState::LevelComplete(index));
        Reply::Yes
    }

    fn on_level_restart(&self) -> Reply {
        let LevelState::Playing(index) = self.state.get() else {
            return Reply::No;
        };
        if !self.request(Transition::Restart) {
            return Reply::No;
        }
        info!(level = index + 1, "Player defeated");
        self.state.set(LevelState::PlayerDefeated(index));
        Reply::Yes
    }

    /// Sets up the first level.
    pub fn apply_start(&self, registries: &[&EntityRegistry]) -> GameResult<()> {
        if self.state.get() != LevelState::AwaitingStart {
            return Err(GameError::InvalidState(format!("cannot start from {:?}", self.state.get())));
        }
        self.begin_level(0, registries)
    }

    /// Moves from a completed level to the next one. On failure the current level stays.
    pub fn apply_advance(&self, registries: &[&EntityRegistry]) -> GameResult<()> {
        let LevelState::LevelComplete(index) = self.state.get() else {
            return Err(GameError::InvalidState(format!("cannot advance from {:?}", self.state.get())));
        };

        self.begin_level(index + 1, registries).inspect_err(|error| {
            warn!(%error, "Advance failed; staying on the current level");
            self.state.set(LevelState::Playing(index));
        })
    }

    /// Resets the current level in place after a defeat.
    pub fn apply_restart(&self, registries: &[&EntityRegistry]) -> GameResult<()> {
        let LevelState::PlayerDefeated(index) = self.state.get() else {
            return Err(GameError::InvalidState(format!("cannot restart from {:?}", self.state.get())));
        };

        self.services.level_mut(|level| level.reset_flags());
        self.services.bus.publish(Event::HideBlinkingHint);
        for registry in registries {
            registry.restart_level_all();
        }
        self.services.statusbar.borrow_mut().refresh_values();

        self.state.set(LevelState::Playing(index));
        info!(level = index + 1, "Level restarted");
        Ok(())
    }

    fn begin_level(&self, index: usize, registries: &[&EntityRegistry]) -> GameResult<()> {
        let grid = {
            let mut levels = self.services.levels.borrow_mut();
            // Parsed before switching so a broken layout leaves the current level in place.
            let grid = levels.get(index)?.map.load()?;
            levels.advance_to(index)?;
            levels.current_mut().reset_flags();
            grid
        };
        *self.services.tilemap.borrow_mut() = grid;
        self.services.bus.publish(Event::HideBlinkingHint);

        for registry in registries {
            registry.init_level_all();
        }

        let items: Vec<_> = registries
            .iter()
            .flat_map(|registry| registry.collect_statusbar_items())
            .collect();
        {
            let mut statusbar = self.services.statusbar.borrow_mut();
            statusbar.clear();
            if !items.is_empty() {
                statusbar.add_many(items)?;
            }
            statusbar.refresh_values();
        }

        self.state.set(LevelState::Playing(index));
        let level = self.services.level(|level| level.idx);
        info!(level, "Level initialised");

        if self.services.bus.publish(Event::ShowLevelDialog { level }) == Outcome::NoSubscribers {
            self.services.bus.publish(Event::ActivateLevel);
        }
        Ok(())
    }
}
