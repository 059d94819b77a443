use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::{IVec2, Vec2};
use rand::Rng;
use tracing::{debug, info};

use crate::audio::Sound;
use crate::constants::mechanics::{ENEMY_KNOCKBACK, ENEMY_SPEED, ENEMY_WANDER_PERIOD};
use crate::entity::Entity;
use crate::error::GameResult;
use crate::events::{Bounds, Event};
use crate::game::Services;
use crate::hud::StatusbarItem;
use crate::level::EnemyVariant;
use crate::map::Tile;
use crate::render::{Canvas, Sprite};
use crate::sprites::{is_blocked, tile_origin};
use crate::timing::TickGate;

const ENEMY_SIZE: IVec2 = IVec2::splat(8);

#[derive(Debug, Clone)]
struct Enemy {
    position: Vec2,
    velocity: Vec2,
    health: i32,
}

impl Enemy {
    fn bounds(&self) -> Bounds {
        Bounds::at(self.position, ENEMY_SIZE.as_vec2())
    }
}

/// The level's aliens.
///
/// Spawner tiles are read once per level, blanked, and remembered so that a restart can put
/// every alien back where it started.
pub struct EnemyHandler {
    services: Rc<Services>,
    enemies: Vec<Enemy>,
    spawn_table: Vec<Vec2>,
    /// Whether `spawn_table` was read from the current level.
    initialised: bool,
    variant: EnemyVariant,
    wander: TickGate,
    eliminated: Rc<Cell<u32>>,
    total: Rc<Cell<u32>>,
}

impl EnemyHandler {
    pub fn new(services: &Rc<Services>) -> GameResult<Rc<RefCell<Self>>> {
        Ok(Rc::new(RefCell::new(Self {
            services: services.clone(),
            enemies: Vec::new(),
            spawn_table: Vec::new(),
            initialised: false,
            variant: EnemyVariant::Grug,
            wander: services.ticks.attach(ENEMY_WANDER_PERIOD)?,
            eliminated: Rc::new(Cell::new(0)),
            total: Rc::new(Cell::new(0)),
        })))
    }

    /// Spawn positions recorded when the current level was initialised.
    pub fn spawn_table(&self) -> &[Vec2] {
        &self.spawn_table
    }

    /// Aliens still alive.
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn eliminated(&self) -> u32 {
        self.eliminated.get()
    }

    fn spawn_all(&mut self) {
        let health = self.variant.health();
        self.enemies = self
            .spawn_table
            .iter()
            .map(|&position| Enemy {
                position,
                velocity: Vec2::ZERO,
                health,
            })
            .collect();
        self.eliminated.set(0);
        self.total.set(self.spawn_table.len() as u32);
        debug!(count = self.enemies.len(), variant = ?self.variant, "Enemies spawned");

        // An empty table only means "nothing to eliminate" once a level has been scanned.
        if self.initialised && self.enemies.is_empty() {
            self.services.level_mut(|level| level.enemies_all_eliminated = true);
        }
    }

    fn wander(&mut self) {
        let services = &self.services;
        services.with_rng(|rng| {
            for enemy in &mut self.enemies {
                let heading = Vec2::new(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0));
                enemy.velocity = heading.normalize_or_zero() * ENEMY_SPEED;
            }
        });
    }

    fn step(&mut self) {
        for enemy in &mut self.enemies {
            let next = enemy.position + enemy.velocity;
            if is_blocked(&self.services, next, ENEMY_SIZE) {
                enemy.velocity = -enemy.velocity;
            } else {
                enemy.position = next;
            }
        }
    }

    /// Tests every alien against the bullets and the ship, removing the destroyed ones.
    fn resolve_hits(&mut self) {
        let services = &self.services;
        let mut destroyed = 0;

        self.enemies.retain_mut(|enemy| {
            if services.bus.publish(Event::BulletsCheck(enemy.bounds())).is_confirmed() {
                enemy.health -= 1;
                if enemy.health <= 0 {
                    services.audio.play(Sound::Explode);
                    services.bus.publish(Event::AppendBlastEffect(enemy.bounds()));
                    destroyed += 1;
                    return false;
                }
            }

            if services.bus.publish(Event::PlayerCollidingEnemy(enemy.bounds())).is_confirmed() {
                services.bus.publish(Event::PlayerHealthChange { delta: -1 });
                let knocked = enemy.position - Vec2::Y * ENEMY_KNOCKBACK;
                if !is_blocked(services, knocked, ENEMY_SIZE) {
                    enemy.position = knocked;
                }
            }
            true
        });

        if destroyed == 0 {
            return;
        }
        self.eliminated.set(self.eliminated.get() + destroyed);
        services.bus.publish(Event::UpdateStatusbar);

        if self.enemies.is_empty() {
            info!(eliminated = self.eliminated.get(), "All enemies eliminated");
            services.level_mut(|level| level.enemies_all_eliminated = true);
            services.bus.publish(Event::CheckLevelComplete);
        }
    }
}

impl Entity for EnemyHandler {
    fn update(&mut self) {
        if self.wander.get() {
            self.wander();
        }
        self.step();
        self.resolve_hits();
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        for enemy in &self.enemies {
            let position = enemy.position.as_ivec2();
            canvas.sprite(position.x, position.y, Sprite::Enemy(self.variant));
        }
    }

    fn on_level_init(&mut self) {
        self.variant = self.services.level(|level| level.enemy);
        self.spawn_table = {
            let mut tilemap = self.services.tilemap.borrow_mut();
            let spawners = tilemap.positions_of(Tile::EnemySpawner);
            for tile in &spawners {
                tilemap.set(tile.x, tile.y, Tile::Blank);
            }
            spawners.into_iter().map(tile_origin).collect()
        };
        self.initialised = true;
        self.spawn_all();
    }

    fn on_level_restart(&mut self) {
        if !self.initialised {
            debug!("Restart before any level init; nothing to respawn");
        }
        self.spawn_all();
    }

    fn statusbar_items(&self) -> Vec<StatusbarItem> {
        let color = self.services.level(|level| level.statusbar_colors.text);
        let (eliminated, total) = (self.eliminated.clone(), self.total.clone());
        vec![StatusbarItem::text(2, color, move || {
            format!("Aliens eliminated: {:>2} / {}", eliminated.get(), total.get())
        })]
    }
}
