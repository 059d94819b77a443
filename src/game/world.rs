use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::IVec2;
use tracing::{debug, info, warn};

use crate::constants::{CANVAS_SIZE, FONT_HEIGHT, FONT_WIDTH, MAP_SIZE, TILE_SIZE};
use crate::entity::{Bucket, EntityRegistry};
use crate::error::GameResult;
use crate::events::{Event, EventKind, HintRequest};
use crate::game::controller::LoopContext;
use crate::game::state::Phase;
use crate::game::Services;
use crate::input::{ButtonMode, GameCommand, InputState, KeyBinding, KeyListener, Keys};
use crate::level::lifecycle::{LevelLifecycle, Transition};
use crate::map::Tile;
use crate::render::{Canvas, Color};
use crate::sprites::{Blasts, Bullets, EnemyHandler, Minerals, Player, PowerUps, Stars};
use crate::storyline::{Intro, LevelStats, Outro, StoryDialogs};
use crate::systems::{StageId, StageTimings};
use crate::ui::{BlinkingHint, Dialog, TextEngine};

const PRESS: ButtonMode = ButtonMode::Pressed { hold: 0, repeat: 0 };

fn global_bindings() -> [KeyBinding; 6] {
    [
        KeyBinding::new("confirm", Keys::SPACE, PRESS, GameCommand::Confirm),
        KeyBinding::new("quit", Keys::ESCAPE, PRESS, GameCommand::Quit),
        KeyBinding::new("pause", Keys::P, PRESS, GameCommand::TogglePause),
        KeyBinding::new("mute", Keys::M, PRESS, GameCommand::ToggleMute),
        KeyBinding::new("debug", Keys::TAB, PRESS, GameCommand::ToggleDebug),
        KeyBinding::new("skip_level", Keys::BACKSPACE, PRESS, GameCommand::SkipLevel),
    ]
}

/// Phase bookkeeping driven by bus events. Requests are collected during a frame and applied at
/// its end; the last request of a frame wins.
struct Flow {
    services: Rc<Services>,
    phase: Cell<Phase>,
    requested: Cell<Option<Phase>>,
    quit: Cell<bool>,
    confirm: Cell<bool>,
    debug: Cell<bool>,
}

impl Flow {
    fn new(services: Rc<Services>) -> Rc<Self> {
        let flow = Rc::new(Self {
            services,
            phase: Cell::new(Phase::Intro),
            requested: Cell::new(None),
            quit: Cell::new(false),
            confirm: Cell::new(false),
            debug: Cell::new(false),
        });

        let bus = &flow.services.bus;
        bus.subscribe_weak(EventKind::StopGameLoop, &flow, |flow, _| flow.request(Phase::Blank));
        bus.subscribe_weak(EventKind::ResumeGameLoop, &flow, |flow, _| flow.request(Phase::Playing));
        bus.subscribe_weak(EventKind::FinishGame, &flow, |flow, _| flow.request(Phase::Outro));
        bus.subscribe_weak(EventKind::Command, &flow, |flow, event| {
            if let Event::Command(command) = event {
                flow.on_command(*command);
            }
        });

        flow
    }

    fn request(&self, phase: Phase) {
        debug!(%phase, "Phase requested");
        self.requested.set(Some(phase));
    }

    /// The phase the loop will be in next frame, as far as is known now.
    fn effective(&self) -> Phase {
        self.requested.get().unwrap_or(self.phase.get())
    }

    fn take_request(&self) -> Option<Phase> {
        let requested = self.requested.take()?;
        if requested == self.phase.get() {
            return None;
        }
        self.phase.set(requested);
        Some(requested)
    }

    fn on_command(&self, command: GameCommand) {
        match command {
            GameCommand::TogglePause => match self.effective() {
                Phase::Playing => self.request(Phase::Suspended),
                Phase::Suspended => self.request(Phase::Playing),
                phase => debug!(%phase, "Pause ignored"),
            },
            GameCommand::Quit => {
                info!("Exit requested");
                self.quit.set(true);
            }
            GameCommand::ToggleMute => self.services.audio.toggle_mute(),
            GameCommand::ToggleDebug => self.debug.set(!self.debug.get()),
            GameCommand::SkipLevel => {
                if self.effective() == Phase::Playing {
                    warn!("Skipping level");
                    self.services.bus.publish(Event::AdvanceLevel);
                }
            }
            GameCommand::Confirm => self.confirm.set(true),
            GameCommand::Move(_) | GameCommand::Shoot | GameCommand::DismissDialog => {}
        }
    }
}

/// Everything the loop functions operate on: the services, both entity registries, the level
/// lifecycle and the story screens.
pub struct World {
    pub services: Rc<Services>,
    /// Gameplay entities, drawn under the camera.
    pub entities: EntityRegistry,
    /// Interface elements. Updated and drawn every frame whatever the phase.
    pub ui: EntityRegistry,
    pub lifecycle: Rc<LevelLifecycle>,
    pub timings: Rc<StageTimings>,
    flow: Rc<Flow>,
    listener: KeyListener,
    input: InputState,
    keys: Keys,
    intro: Rc<RefCell<Intro>>,
    outro: Rc<RefCell<Outro>>,
    stats: LevelStats,
    _story: Rc<StoryDialogs>,
}

impl World {
    pub fn new(services: Rc<Services>) -> GameResult<Self> {
        let lifecycle = LevelLifecycle::new(services.clone());
        let flow = Flow::new(services.clone());

        // Handlers are drawn in registration order, back to front.
        let mut entities = EntityRegistry::new();
        entities.register(Bucket::Handlers, "bullets", Bullets::new(&services));
        entities.register(Bucket::Handlers, "enemies", EnemyHandler::new(&services)?);
        entities.register(Bucket::Handlers, "blasts", Blasts::new(&services)?);
        entities.register(Bucket::Handlers, "player", Player::new(&services));
        // Power-ups are restored before minerals are scattered over the blank tiles.
        entities.register(Bucket::Tilemap, "powerups", PowerUps::new(&services));
        entities.register(Bucket::Tilemap, "minerals", Minerals::new(&services));
        entities.register(Bucket::Passive, "stars", Stars::new(&services));

        let mut ui = EntityRegistry::new();
        ui.register(Bucket::Handlers, "text", TextEngine::new(&services));
        ui.register(Bucket::Handlers, "hint", BlinkingHint::new(&services)?);
        ui.register(Bucket::Handlers, "dialog", Dialog::new(&services));

        let intro = Intro::new(&services);
        let outro = Outro::new(&services);
        let story = StoryDialogs::new(&services);

        let mut listener = KeyListener::new();
        listener.add(global_bindings());
        listener.add(entities.collect_keybindings());
        listener.add(ui.collect_keybindings());
        listener.add(outro.borrow().bindings());
        debug!(bindings = listener.bindings().len(), "Key bindings collected");

        Ok(Self {
            services,
            entities,
            ui,
            lifecycle,
            timings: Rc::new(StageTimings::default()),
            flow,
            listener,
            input: InputState::new(),
            keys: Keys::empty(),
            intro,
            outro,
            stats: LevelStats::default(),
            _story: story,
        })
    }

    /// Keys held down for the coming frame.
    pub fn set_keys(&mut self, keys: Keys) {
        self.keys = keys;
    }

    pub fn phase(&self) -> Phase {
        self.flow.phase.get()
    }

    pub fn should_quit(&self) -> bool {
        self.flow.quit.get()
    }

    pub fn debug_overlay(&self) -> bool {
        self.flow.debug.get()
    }

    /// Applies the transitions raised during the frame. Returns the phase to install, if it changed.
    pub fn end_frame(&mut self) -> GameResult<Option<Phase>> {
        let registries = [&self.entities];

        match self.lifecycle.take_pending() {
            Some(Transition::Start) => {
                // Requested first so that a dialog raised by the new level can override it.
                self.flow.request(Phase::Playing);
                self.lifecycle.apply_start(&registries)?;
            }
            Some(Transition::Advance) => {
                self.stats = LevelStats::capture(&self.services);
                self.flow.request(Phase::LevelStats);
                self.services.bus.publish(Event::ShowBlinkingHint(HintRequest {
                    text: "Press SPACE to continue".to_string(),
                    x: (CANVAS_SIZE.x as i32 - 23 * FONT_WIDTH) / 2,
                    y: CANVAS_SIZE.y as i32 - 40,
                    color: Color::White,
                    delay_secs: 1.0,
                }));
            }
            Some(Transition::Restart) => self.lifecycle.apply_restart(&registries)?,
            None => {}
        }

        if self.flow.phase.get() == Phase::LevelStats && self.flow.confirm.take() {
            self.flow.request(Phase::Playing);
            self.lifecycle.apply_advance(&registries)?;
        }
        self.flow.confirm.set(false);

        Ok(self.flow.take_request())
    }

    pub(crate) fn update_intro(&mut self) {
        self.intro.borrow_mut().update();
    }

    pub(crate) fn update_playing(&mut self) {
        let timings = self.timings.clone();
        timings.measure(StageId::Update, || self.entities.update_all());
    }

    pub(crate) fn update_outro(&mut self) {
        self.outro.borrow_mut().update();
    }

    pub(crate) fn draw_intro(&self, canvas: &mut dyn Canvas) {
        self.intro.borrow().draw(canvas);
    }

    pub(crate) fn draw_playing(&self, canvas: &mut dyn Canvas) {
        canvas.cls(Color::Black);
        canvas.camera(IVec2::ZERO);
        self.entities.draw_passive(canvas);

        let camera = self.services.camera.get();
        canvas.camera(camera);
        self.draw_tilemap(canvas, camera);
        self.entities.draw_all(canvas);

        canvas.camera(IVec2::ZERO);
        self.services.statusbar.borrow().draw(canvas);
    }

    pub(crate) fn draw_suspended(&self, canvas: &mut dyn Canvas) {
        self.draw_playing(canvas);
        let label = "PAUSED";
        let x = (CANVAS_SIZE.x as i32 - label.len() as i32 * FONT_WIDTH) / 2;
        let y = (CANVAS_SIZE.y as i32 - FONT_HEIGHT) / 2;
        canvas.rect(x - 4, y - 4, label.len() as i32 * FONT_WIDTH + 8, FONT_HEIGHT + 8, Color::Navy);
        canvas.text(x, y, label, Color::White);
    }

    pub(crate) fn draw_level_stats(&self, canvas: &mut dyn Canvas) {
        self.stats.draw(canvas);
    }

    pub(crate) fn draw_outro(&self, canvas: &mut dyn Canvas) {
        canvas.cls(Color::Black);
        canvas.camera(IVec2::ZERO);
        self.entities.draw_passive(canvas);
        self.outro.borrow().draw(canvas);
    }

    /// Draws the rows of the tile grid that intersect the viewport.
    fn draw_tilemap(&self, canvas: &mut dyn Canvas, camera: IVec2) {
        let first = (camera.y / TILE_SIZE).max(0) as u32;
        let last = ((camera.y + CANVAS_SIZE.y as i32) / TILE_SIZE + 1).min(MAP_SIZE.y as i32) as u32;

        let tilemap = self.services.tilemap.borrow();
        for y in first..last {
            for x in 0..MAP_SIZE.x {
                match tilemap.get(x, y) {
                    Some(Tile::Blank) | None => {}
                    Some(tile) => canvas.tile(x as i32 * TILE_SIZE, y as i32 * TILE_SIZE, tile),
                }
            }
        }
    }
}

impl LoopContext for World {
    fn advance_services(&mut self) {
        let timings = self.timings.clone();
        timings.measure(StageId::Services, || {
            self.services.advance();
            self.input.update(self.keys);
            self.listener.check(&self.input, &self.services.bus);
            self.ui.update_all();
        });
    }
}
