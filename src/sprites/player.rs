//! The player's ship.
//!
//! Movement and shooting live in [`Player`], which is driven by `Move`/`Shoot` commands and
//! stays inert after a level initialises until `ActivateLevel` arrives. Health and timed
//! power-ups live in [`ShipVitals`] so that pickups reported while the ship is mid-update can
//! still be applied.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::{IVec2, Vec2};
use tracing::{debug, info, trace};

use crate::audio::Sound;
use crate::constants::mechanics::{
    CAMERA_LEAD, PLAYER_ACCELERATION, PLAYER_DRAG, PLAYER_MAX_SPEED, POWERUP_FRAMES, SHOOT_HOLD, SHOOT_REPEAT,
    SPEED_BOOST,
};
use crate::constants::{CANVAS_SIZE, MAP_PIXEL_SIZE, TILE_SIZE};
use crate::direction::Direction;
use crate::entity::Entity;
use crate::events::{Bounds, Event, EventKind, Reply};
use crate::game::Services;
use crate::hud::StatusbarItem;
use crate::input::{ButtonMode, GameCommand, KeyBinding, Keys};
use crate::level::ShipVariant;
use crate::map::{PowerUpKind, Tile};
use crate::render::{Canvas, Color, Sprite};
use crate::sprites::{is_blocked, tile_at};

const SHIP_SIZE: IVec2 = IVec2::splat(8);

pub struct ShipVitals {
    services: Rc<Services>,
    health: Rc<Cell<i32>>,
    max_health: Cell<i32>,
    shield_frames: Cell<u64>,
    speed_frames: Cell<u64>,
    defeated: Cell<bool>,
}

impl ShipVitals {
    fn new(services: &Rc<Services>) -> Rc<Self> {
        let vitals = Rc::new(Self {
            services: services.clone(),
            health: Rc::new(Cell::new(0)),
            max_health: Cell::new(0),
            shield_frames: Cell::new(0),
            speed_frames: Cell::new(0),
            defeated: Cell::new(false),
        });

        services
            .bus
            .subscribe_weak(EventKind::PlayerHealthChange, &vitals, |vitals, event| match event {
                Event::PlayerHealthChange { delta } => vitals.change_health(*delta),
                _ => Reply::Silent,
            });
        services
            .bus
            .subscribe_weak(EventKind::PowerUpCollected, &vitals, |vitals, event| {
                if let Event::PowerUpCollected(kind) = event {
                    vitals.apply_power_up(*kind);
                }
            });

        vitals
    }

    pub fn health(&self) -> i32 {
        self.health.get()
    }

    pub fn max_health(&self) -> i32 {
        self.max_health.get()
    }

    pub fn is_shielded(&self) -> bool {
        self.shield_frames.get() > 0
    }

    pub fn is_boosted(&self) -> bool {
        self.speed_frames.get() > 0
    }

    fn reset(&self, max_health: i32) {
        self.max_health.set(max_health);
        self.health.set(max_health);
        self.shield_frames.set(0);
        self.speed_frames.set(0);
        self.defeated.set(false);
    }

    fn tick(&self) {
        self.shield_frames.set(self.shield_frames.get().saturating_sub(1));
        self.speed_frames.set(self.speed_frames.get().saturating_sub(1));
    }

    fn change_health(&self, delta: i32) -> Reply {
        if self.defeated.get() || (delta < 0 && self.is_shielded()) {
            trace!(delta, "Health change ignored");
            return Reply::No;
        }

        let health = (self.health.get() + delta).clamp(0, self.max_health.get());
        self.health.set(health);
        if delta < 0 {
            self.services.audio.play(Sound::Hurt);
        }
        debug!(health, delta, "Player health changed");
        self.services.bus.publish(Event::UpdateStatusbar);

        if health == 0 {
            info!("Player defeated");
            self.defeated.set(true);
            self.services.bus.publish(Event::LevelRestart);
        }
        Reply::Yes
    }

    fn apply_power_up(&self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Shield => self.shield_frames.set(POWERUP_FRAMES),
            PowerUpKind::Speed => self.speed_frames.set(POWERUP_FRAMES),
            PowerUpKind::Health => {}
        }
    }
}

pub struct Player {
    services: Rc<Services>,
    vitals: Rc<ShipVitals>,
    ship: Option<ShipVariant>,
    spawn: Vec2,
    position: Vec2,
    velocity: Vec2,
    thrust: Vec2,
    shooting: bool,
    /// Frame the pending `thrust`/`shooting` were commanded on.
    input_frame: u64,
    active: bool,
}

impl Player {
    pub fn new(services: &Rc<Services>) -> Rc<RefCell<Self>> {
        let player = Rc::new(RefCell::new(Self {
            services: services.clone(),
            vitals: ShipVitals::new(services),
            ship: None,
            spawn: Vec2::ZERO,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            thrust: Vec2::ZERO,
            shooting: false,
            input_frame: 0,
            active: false,
        }));

        let bus = &services.bus;
        bus.subscribe_to(EventKind::Command, &player, |player, event| match event {
            Event::Command(GameCommand::Move(direction)) => *player.pending_input().0 += direction.as_vec2(),
            Event::Command(GameCommand::Shoot) => *player.pending_input().1 = true,
            _ => {}
        });
        bus.subscribe_to(EventKind::ActivateLevel, &player, |player, _| {
            debug!("Player activated");
            player.active = true;
        });
        bus.subscribe_to(EventKind::PlayerCollidingEnemy, &player, |player, event| match event {
            Event::PlayerCollidingEnemy(bounds) => player.is_colliding(bounds),
            _ => false,
        });

        player
    }

    pub fn vitals(&self) -> &Rc<ShipVitals> {
        &self.vitals
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::at(self.position, SHIP_SIZE.as_vec2())
    }

    fn is_colliding(&self, bounds: &Bounds) -> bool {
        self.active && self.bounds().overlaps(bounds)
    }

    /// Input commanded this frame. Whatever was left from an earlier frame, when no update ran
    /// to consume it, is dropped.
    fn pending_input(&mut self) -> (&mut Vec2, &mut bool) {
        let now = self.services.clock.now();
        if self.input_frame != now {
            self.input_frame = now;
            self.thrust = Vec2::ZERO;
            self.shooting = false;
        }
        (&mut self.thrust, &mut self.shooting)
    }

    fn respawn(&mut self) {
        self.position = self.spawn;
        self.velocity = Vec2::ZERO;
        self.thrust = Vec2::ZERO;
        self.shooting = false;
        self.follow_camera();
    }

    fn step(&mut self) {
        let mut next = self.position;

        next.x += self.velocity.x;
        if is_blocked(&self.services, next, SHIP_SIZE) {
            next.x = self.position.x;
            self.velocity.x = 0.0;
        }
        next.y += self.velocity.y;
        if is_blocked(&self.services, next, SHIP_SIZE) {
            next.y = self.position.y;
            self.velocity.y = 0.0;
        }

        self.position = next;
    }

    fn follow_camera(&self) {
        let max_y = MAP_PIXEL_SIZE.y - CANVAS_SIZE.y as i32;
        let y = (self.position.y as i32 + CAMERA_LEAD - CANVAS_SIZE.y as i32).clamp(0, max_y.max(0));
        self.services.camera.set(IVec2::new(0, y));
    }

    /// Reports a pickup under the ship's center.
    fn probe_tile(&self) {
        let tile_pos = tile_at(self.position + SHIP_SIZE.as_vec2() / 2.0);
        let tile = self.services.tilemap.borrow().get(tile_pos.x, tile_pos.y);
        if let Some(tile @ (Tile::Mineral(_) | Tile::PowerUp(_))) = tile {
            self.services.bus.publish(Event::TilemapProbe {
                tile,
                x: tile_pos.x,
                y: tile_pos.y,
            });
        }
    }
}

impl Entity for Player {
    fn update(&mut self) {
        let (thrust, shooting) = {
            let (thrust, shooting) = self.pending_input();
            (std::mem::take(thrust), std::mem::take(shooting))
        };
        if !self.active {
            return;
        }

        self.vitals.tick();
        let max_speed = PLAYER_MAX_SPEED * if self.vitals.is_boosted() { SPEED_BOOST } else { 1.0 };
        self.velocity += thrust.normalize_or_zero() * PLAYER_ACCELERATION;
        self.velocity *= 1.0 - PLAYER_DRAG;
        self.velocity = self.velocity.clamp_length_max(max_speed);

        self.step();
        self.follow_camera();

        if shooting {
            self.services.audio.play(Sound::Shoot);
            self.services.bus.publish(Event::PlayerShoot {
                x: self.position.x + SHIP_SIZE.x as f32 / 2.0,
                y: self.position.y,
            });
        }
        self.probe_tile();
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let Some(ship) = self.ship else {
            return;
        };
        let IVec2 { x, y } = self.position.as_ivec2();
        canvas.sprite(x, y, Sprite::Ship(ship));
        if self.vitals.is_shielded() {
            canvas.rectb(x - 2, y - 2, SHIP_SIZE.x + 4, SHIP_SIZE.y + 4, Color::Cyan);
        }
    }

    fn on_level_init(&mut self) {
        let (ship, max_health) = self.services.level(|level| (level.ship, level.max_health));
        self.ship = Some(ship);
        self.spawn = Vec2::new(
            (MAP_PIXEL_SIZE.x - SHIP_SIZE.x) as f32 / 2.0,
            (MAP_PIXEL_SIZE.y - 3 * TILE_SIZE) as f32,
        );
        self.vitals.reset(max_health);
        self.active = false;
        self.respawn();
    }

    fn on_level_restart(&mut self) {
        self.vitals.reset(self.vitals.max_health());
        self.respawn();
    }

    fn keybindings(&self) -> Vec<KeyBinding> {
        let mut bindings: Vec<KeyBinding> = Direction::DIRECTIONS
            .iter()
            .map(|&direction| {
                let (name, keys) = match direction {
                    Direction::Up => ("move_up", Keys::UP),
                    Direction::Down => ("move_down", Keys::DOWN),
                    Direction::Left => ("move_left", Keys::LEFT),
                    Direction::Right => ("move_right", Keys::RIGHT),
                };
                KeyBinding::new(name, keys, ButtonMode::Held, GameCommand::Move(direction))
            })
            .collect();
        bindings.push(KeyBinding::new(
            "shoot",
            Keys::SPACE,
            ButtonMode::Pressed {
                hold: SHOOT_HOLD,
                repeat: SHOOT_REPEAT,
            },
            GameCommand::Shoot,
        ));
        bindings
    }

    fn statusbar_items(&self) -> Vec<StatusbarItem> {
        let colors = self.services.level(|level| level.statusbar_colors);
        let health = self.vitals.health.clone();
        vec![StatusbarItem::progress(0, self.vitals.max_health(), colors, move || health.get()).with_icon(Sprite::Heart)]
    }
}
