use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::UVec2;
use rand::seq::IndexedRandom;
use tracing::{debug, info, warn};

use crate::audio::Sound;
use crate::constants::mechanics::MINERAL_SURPLUS;
use crate::entity::Entity;
use crate::events::{Event, EventKind};
use crate::game::Services;
use crate::hud::StatusbarItem;
use crate::map::{MineralKind, Tile};
use crate::sprites::SPAWN_ROWS;

/// Scatters the level's mineral over the tilemap and counts what the ship picks up.
pub struct Minerals {
    services: Rc<Services>,
    kind: MineralKind,
    required: Rc<Cell<u32>>,
    collected: Rc<Cell<u32>>,
}

impl Minerals {
    pub fn new(services: &Rc<Services>) -> Rc<RefCell<Self>> {
        let minerals = Rc::new(RefCell::new(Self {
            services: services.clone(),
            kind: MineralKind::Nethonite,
            required: Rc::new(Cell::new(0)),
            collected: Rc::new(Cell::new(0)),
        }));

        services
            .bus
            .subscribe_to(EventKind::TilemapProbe, &minerals, |minerals, event| match event {
                Event::TilemapProbe {
                    tile: Tile::Mineral(kind),
                    x,
                    y,
                } => Some(minerals.collect(*kind, UVec2::new(*x, *y))),
                _ => None,
            });

        minerals
    }

    pub fn collected(&self) -> u32 {
        self.collected.get()
    }

    /// Places `required + MINERAL_SURPLUS` minerals on blank tiles outside the spawn area.
    fn scatter(&self) {
        let count = (self.required.get() + MINERAL_SURPLUS) as usize;
        let mut tilemap = self.services.tilemap.borrow_mut();
        let limit = tilemap.size().y.saturating_sub(SPAWN_ROWS);
        let candidates: Vec<UVec2> = tilemap
            .iter()
            .filter(|(position, tile)| *tile == Tile::Blank && position.y < limit)
            .map(|(position, _)| position)
            .collect();

        let chosen: Vec<UVec2> = self
            .services
            .with_rng(|rng| candidates.choose_multiple(rng, count).copied().collect());
        if chosen.len() < count {
            warn!(placed = chosen.len(), wanted = count, "Not enough room for every mineral");
        }
        for position in &chosen {
            tilemap.set(position.x, position.y, Tile::Mineral(self.kind));
        }
        debug!(count = chosen.len(), kind = self.kind.name(), "Minerals placed");
    }

    fn clear(&self) {
        let mut tilemap = self.services.tilemap.borrow_mut();
        for position in tilemap.positions_of(Tile::Mineral(self.kind)) {
            tilemap.set(position.x, position.y, Tile::Blank);
        }
    }

    fn collect(&mut self, kind: MineralKind, position: UVec2) -> bool {
        let taken = {
            let mut tilemap = self.services.tilemap.borrow_mut();
            kind == self.kind
                && tilemap.get(position.x, position.y) == Some(Tile::Mineral(kind))
                && tilemap.set(position.x, position.y, Tile::Blank)
        };
        if !taken {
            return false;
        }

        self.collected.set(self.collected.get() + 1);
        self.services.audio.play(Sound::Mineral);
        self.services.bus.publish(Event::UpdateStatusbar);

        if self.collected.get() >= self.required.get() {
            let newly = self.services.level_mut(|level| !std::mem::replace(&mut level.minerals_all_collected, true));
            if newly {
                info!(collected = self.collected.get(), "Enough minerals collected");
            }
            self.services.bus.publish(Event::CheckLevelComplete);
        }
        true
    }
}

impl Entity for Minerals {
    fn on_level_init(&mut self) {
        let (kind, required) = self.services.level(|level| (level.mineral, level.minerals_required));
        self.kind = kind;
        self.required.set(required);
        self.collected.set(0);
        self.scatter();
    }

    fn on_level_restart(&mut self) {
        self.clear();
        self.collected.set(0);
        self.scatter();
    }

    fn statusbar_items(&self) -> Vec<StatusbarItem> {
        let color = self.services.level(|level| level.statusbar_colors.text);
        let (collected, required) = (self.collected.clone(), self.required.clone());
        vec![StatusbarItem::text(1, color, move || {
            format!("Minerals collected: {:>2} / {}", collected.get(), required.get())
        })]
    }
}
