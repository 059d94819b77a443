use std::cell::RefCell;
use std::rc::Rc;

use glam::UVec2;
use tracing::debug;

use crate::audio::Sound;
use crate::entity::Entity;
use crate::events::{Event, EventKind};
use crate::game::Services;
use crate::map::{PowerUpKind, Tile};

/// Power-up tiles placed by the level layout.
pub struct PowerUps {
    services: Rc<Services>,
    placed: Vec<(UVec2, PowerUpKind)>,
}

impl PowerUps {
    pub fn new(services: &Rc<Services>) -> Rc<RefCell<Self>> {
        let powerups = Rc::new(RefCell::new(Self {
            services: services.clone(),
            placed: Vec::new(),
        }));

        services
            .bus
            .subscribe_to(EventKind::TilemapProbe, &powerups, |powerups, event| match event {
                Event::TilemapProbe {
                    tile: Tile::PowerUp(kind),
                    x,
                    y,
                } => Some(powerups.pick_up(*kind, UVec2::new(*x, *y))),
                _ => None,
            });

        powerups
    }

    fn pick_up(&self, kind: PowerUpKind, position: UVec2) -> bool {
        let taken = {
            let mut tilemap = self.services.tilemap.borrow_mut();
            tilemap.get(position.x, position.y) == Some(Tile::PowerUp(kind))
                && tilemap.set(position.x, position.y, Tile::Blank)
        };
        if !taken {
            return false;
        }

        debug!(?kind, x = position.x, y = position.y, "Power-up collected");
        self.services.audio.play(Sound::PowerUp);
        self.services.bus.publish(Event::PowerUpCollected(kind));
        if kind == PowerUpKind::Health {
            self.services.bus.publish(Event::PlayerHealthChange { delta: 1 });
        }
        true
    }
}

impl Entity for PowerUps {
    fn on_level_init(&mut self) {
        self.placed = self
            .services
            .tilemap
            .borrow()
            .iter()
            .filter_map(|(position, tile)| match tile {
                Tile::PowerUp(kind) => Some((position, kind)),
                _ => None,
            })
            .collect();
    }

    fn on_level_restart(&mut self) {
        let mut tilemap = self.services.tilemap.borrow_mut();
        for (position, kind) in &self.placed {
            tilemap.set(position.x, position.y, Tile::PowerUp(*kind));
        }
    }
}
