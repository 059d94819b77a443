use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use tracing::trace;

use crate::constants::mechanics::{BULLET_HEIGHT, BULLET_SPEED, BULLET_WIDTH};
use crate::entity::Entity;
use crate::events::{Bounds, Event, EventKind};
use crate::game::Services;
use crate::render::{Canvas, Color};
use crate::sprites::is_blocked;

/// The player's projectiles. Spawned on `PlayerShoot`, consumed by whichever target
/// confirms a `BulletsCheck` against them first.
pub struct Bullets {
    services: Rc<Services>,
    bullets: Vec<Vec2>,
    color: Color,
}

fn bounds_of(bullet: Vec2) -> Bounds {
    Bounds::at(bullet, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
}

impl Bullets {
    pub fn new(services: &Rc<Services>) -> Rc<RefCell<Self>> {
        let bullets = Rc::new(RefCell::new(Self {
            services: services.clone(),
            bullets: Vec::new(),
            color: Color::White,
        }));

        let bus = &services.bus;
        bus.subscribe_to(EventKind::PlayerShoot, &bullets, |bullets, event| {
            if let Event::PlayerShoot { x, y } = event {
                bullets.spawn(Vec2::new(*x - BULLET_WIDTH / 2.0, *y - BULLET_HEIGHT));
            }
        });
        bus.subscribe_to(EventKind::BulletsCheck, &bullets, |bullets, event| match event {
            Event::BulletsCheck(bounds) => bullets.consume_hit(bounds),
            _ => false,
        });

        bullets
    }

    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    fn spawn(&mut self, position: Vec2) {
        trace!(x = position.x, y = position.y, "Bullet fired");
        self.bullets.push(position);
    }

    /// Removes the first bullet overlapping `bounds`. Returns whether there was one.
    fn consume_hit(&mut self, bounds: &Bounds) -> bool {
        match self.bullets.iter().position(|bullet| bounds_of(*bullet).overlaps(bounds)) {
            Some(index) => {
                self.bullets.swap_remove(index);
                true
            }
            None => false,
        }
    }
}

impl Entity for Bullets {
    fn update(&mut self) {
        let services = &self.services;
        self.bullets.retain_mut(|bullet| {
            bullet.y -= BULLET_SPEED;
            !is_blocked(services, *bullet, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT).as_ivec2())
        });
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        for bullet in &self.bullets {
            let position = bullet.as_ivec2();
            canvas.rect(position.x, position.y, BULLET_WIDTH as i32, BULLET_HEIGHT as i32, self.color);
        }
    }

    fn on_level_init(&mut self) {
        self.color = self.services.level(|level| level.bullet_color);
        self.bullets.clear();
    }

    fn on_level_restart(&mut self) {
        self.bullets.clear();
    }
}
