//! The entity capability trait and the registry that drives entities as a group.

use std::cell::RefCell;
use std::rc::Rc;

use strum_macros::{EnumIter, IntoStaticStr};
use tracing::{debug, warn};

use crate::hud::StatusbarItem;
use crate::input::KeyBinding;
use crate::render::Canvas;

/// Everything an entity may take part in. Every hook defaults to doing nothing.
pub trait Entity {
    /// Per-frame simulation step. Only called for entities in [`Bucket::Handlers`].
    fn update(&mut self) {}

    fn draw(&self, _canvas: &mut dyn Canvas) {}

    /// A brand-new level became current: recompute level-derived state and spawn from scratch.
    fn on_level_init(&mut self) {}

    /// The current level restarts after a defeat: reset counters and positions only.
    fn on_level_restart(&mut self) {}

    fn keybindings(&self) -> Vec<KeyBinding> {
        Vec::new()
    }

    fn statusbar_items(&self) -> Vec<StatusbarItem> {
        Vec::new()
    }
}

pub type SharedEntity = Rc<RefCell<dyn Entity>>;

/// The three groups an entity can be registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum Bucket {
    /// Updated and drawn every frame, with lifecycle hooks.
    Handlers,
    /// Lifecycle hooks only; they react to tilemap probes instead of updating.
    Tilemap,
    /// Drawn only.
    Passive,
}

/// Heterogeneous entity collections with batch dispatch.
///
/// Dispatch methods take `&self` and registration takes `&mut self`, so the buckets cannot
/// change while they are being iterated.
#[derive(Default)]
pub struct EntityRegistry {
    handlers: Vec<(&'static str, SharedEntity)>,
    tilemap: Vec<(&'static str, SharedEntity)>,
    passive: Vec<(&'static str, SharedEntity)>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&self, bucket: Bucket) -> &Vec<(&'static str, SharedEntity)> {
        match bucket {
            Bucket::Handlers => &self.handlers,
            Bucket::Tilemap => &self.tilemap,
            Bucket::Passive => &self.passive,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<(&'static str, SharedEntity)> {
        match bucket {
            Bucket::Handlers => &mut self.handlers,
            Bucket::Tilemap => &mut self.tilemap,
            Bucket::Passive => &mut self.passive,
        }
    }

    /// Adds an entity at the end of `bucket`. Registering a key twice replaces the entity but
    /// keeps its original slot.
    pub fn register(&mut self, bucket: Bucket, key: &'static str, entity: SharedEntity) {
        let entries = self.bucket_mut(bucket);
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => {
                warn!(key, bucket = Into::<&'static str>::into(bucket), "Replacing registered entity");
                slot.1 = entity;
            }
            None => {
                entries.push((key, entity));
                debug!(key, bucket = Into::<&'static str>::into(bucket), "Entity registered");
            }
        }
    }

    pub fn get(&self, bucket: Bucket, key: &str) -> Option<&SharedEntity> {
        self.bucket(bucket)
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, entity)| entity)
    }

    pub fn len(&self, bucket: Bucket) -> usize {
        self.bucket(bucket).len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty() && self.tilemap.is_empty() && self.passive.is_empty()
    }

    /// Updates every handler in registration order.
    pub fn update_all(&self) {
        for (_, entity) in &self.handlers {
            entity.borrow_mut().update();
        }
    }

    /// Draws every handler in registration order, so earlier registrations end up underneath.
    pub fn draw_all(&self, canvas: &mut dyn Canvas) {
        for (_, entity) in &self.handlers {
            entity.borrow().draw(canvas);
        }
    }

    /// Draws the passive entities, in registration order.
    pub fn draw_passive(&self, canvas: &mut dyn Canvas) {
        for (_, entity) in &self.passive {
            entity.borrow().draw(canvas);
        }
    }

    pub fn init_level_all(&self) {
        for (_, entity) in self.handlers.iter().chain(&self.tilemap) {
            entity.borrow_mut().on_level_init();
        }
    }

    pub fn restart_level_all(&self) {
        for (_, entity) in self.handlers.iter().chain(&self.tilemap) {
            entity.borrow_mut().on_level_restart();
        }
    }

    fn all(&self) -> impl Iterator<Item = &SharedEntity> {
        self.handlers
            .iter()
            .chain(&self.tilemap)
            .chain(&self.passive)
            .map(|(_, entity)| entity)
    }

    /// Declared key bindings, by bucket then registration order.
    pub fn collect_keybindings(&self) -> Vec<KeyBinding> {
        self.all().flat_map(|entity| entity.borrow().keybindings()).collect()
    }

    /// Declared statusbar items, by bucket then registration order.
    pub fn collect_statusbar_items(&self) -> Vec<StatusbarItem> {
        self.all().flat_map(|entity| entity.borrow().statusbar_items()).collect()
    }
}
