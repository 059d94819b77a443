use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::mechanics::{BLAST_STAGES, BLAST_STAGE_PERIOD};
use crate::entity::Entity;
use crate::error::GameResult;
use crate::events::{Bounds, Event, EventKind};
use crate::game::Services;
use crate::render::{Canvas, Sprite};
use crate::timing::TickGate;

struct Blast {
    bounds: Bounds,
    stage: u8,
}

/// Short explosion animations left behind by destroyed enemies.
pub struct Blasts {
    blasts: Vec<Blast>,
    gate: TickGate,
}

impl Blasts {
    pub fn new(services: &Rc<Services>) -> GameResult<Rc<RefCell<Self>>> {
        let blasts = Rc::new(RefCell::new(Self {
            blasts: Vec::new(),
            gate: services.ticks.attach(BLAST_STAGE_PERIOD)?,
        }));

        services
            .bus
            .subscribe_to(EventKind::AppendBlastEffect, &blasts, |blasts, event| {
                if let Event::AppendBlastEffect(bounds) = event {
                    blasts.blasts.push(Blast {
                        bounds: *bounds,
                        stage: 0,
                    });
                }
            });

        Ok(blasts)
    }

    pub fn len(&self) -> usize {
        self.blasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blasts.is_empty()
    }
}

impl Entity for Blasts {
    fn update(&mut self) {
        if !self.gate.get() {
            return;
        }
        self.blasts.retain_mut(|blast| {
            blast.stage += 1;
            blast.stage < BLAST_STAGES
        });
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        for blast in &self.blasts {
            let sprite = Sprite::Blast(blast.stage);
            let center = blast.bounds.center().as_ivec2() - sprite.size() / 2;
            canvas.sprite(center.x, center.y, sprite);
        }
    }

    fn on_level_init(&mut self) {
        self.blasts.clear();
    }

    fn on_level_restart(&mut self) {
        self.blasts.clear();
    }
}
