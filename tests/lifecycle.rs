use std::cell::{Cell, RefCell};
use std::rc::Rc;

use misi_hijau::entity::{Bucket, EntityRegistry};
use misi_hijau::error::{GameError, LevelError};
use misi_hijau::events::{Event, EventKind, Outcome};
use misi_hijau::game::Services;
use misi_hijau::level::lifecycle::{LevelLifecycle, LevelState, Transition};
use misi_hijau::level::{table, LevelHandler, LevelMap};
use misi_hijau::map::{MineralKind, Tile};
use misi_hijau::sprites::{EnemyHandler, Minerals};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

struct Setup {
    services: Rc<Services>,
    lifecycle: Rc<LevelLifecycle>,
    handlers: EntityRegistry,
    tilemap: EntityRegistry,
    enemies: Rc<RefCell<EnemyHandler>>,
}

impl Setup {
    fn new(services: Rc<Services>) -> Self {
        let lifecycle = LevelLifecycle::new(services.clone());
        let enemies = EnemyHandler::new(&services).unwrap();
        let mut handlers = EntityRegistry::new();
        handlers.register(Bucket::Handlers, "enemies", enemies.clone());
        let mut tilemap = EntityRegistry::new();
        tilemap.register(Bucket::Tilemap, "minerals", Minerals::new(&services));

        Self {
            services,
            lifecycle,
            handlers,
            tilemap,
            enemies,
        }
    }

    fn registries(&self) -> [&EntityRegistry; 2] {
        [&self.handlers, &self.tilemap]
    }

    fn start(&self) {
        assert_eq!(self.services.bus.publish(Event::StartGame), Outcome::Confirmed);
        assert_eq!(self.lifecycle.take_pending(), Some(Transition::Start));
        self.lifecycle.apply_start(&self.registries()).unwrap();
    }

    fn count(&self, kind: EventKind) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        self.services.bus.subscribe(kind, move |_| counter.set(counter.get() + 1));
        count
    }

    /// Probes every mineral tile on the map, in row order.
    fn collect_minerals(&self, limit: usize) {
        let kind = self.services.level(|level| level.mineral);
        let positions = self.services.tilemap.borrow().positions_of(Tile::Mineral(kind));
        for position in positions.into_iter().take(limit) {
            self.services.bus.publish(Event::TilemapProbe {
                tile: Tile::Mineral(kind),
                x: position.x,
                y: position.y,
            });
        }
    }

    fn destroy_all_enemies(&self) {
        self.services.bus.subscribe(EventKind::BulletsCheck, |_| true);
        while self.enemies.borrow().enemy_count() > 0 {
            self.handlers.update_all();
        }
    }
}

#[test]
fn test_start_sets_up_first_level() {
    let (services, _clock, _sounds) = common::services();
    let setup = Setup::new(services.clone());
    let activated = setup.count(EventKind::ActivateLevel);
    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::AwaitingStart);

    setup.start();

    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::Playing(0));
    assert_that(&services.level(|level| level.idx)).is_equal_to(1);
    // Nobody introduces the level, so it activates immediately.
    assert_that(&activated.get()).is_equal_to(1);

    let spawners = table::levels()[0]
        .map
        .load()
        .unwrap()
        .count(|tile| tile == Tile::EnemySpawner);
    assert_eq!(
        services.statusbar.borrow().lines(),
        vec![
            "Minerals collected:  0 / 14".to_string(),
            format!("Aliens eliminated:  0 / {spawners}"),
        ]
    );
    assert_that(&services.tilemap.borrow().count(|tile| tile == Tile::Mineral(MineralKind::Nethonite)))
        .is_equal_to(18);
}

#[test]
fn test_level_dialog_holds_activation() {
    let (services, _clock, _sounds) = common::services();
    let setup = Setup::new(services.clone());
    let activated = setup.count(EventKind::ActivateLevel);
    let announced = Rc::new(Cell::new(None));
    let sink = announced.clone();
    services.bus.subscribe(EventKind::ShowLevelDialog, move |event| {
        if let Event::ShowLevelDialog { level } = event {
            sink.set(Some(*level));
        }
    });

    setup.start();
    assert_that(&announced.get()).is_equal_to(Some(1));
    assert_that(&activated.get()).is_equal_to(0);
}

#[test]
fn test_start_is_accepted_once() {
    let (services, _clock, _sounds) = common::services();
    let setup = Setup::new(services.clone());
    setup.start();

    assert_eq!(services.bus.publish(Event::StartGame), Outcome::Denied);
    assert_that(&setup.lifecycle.pending()).is_none();
    assert!(matches!(
        setup.lifecycle.apply_start(&setup.registries()),
        Err(GameError::InvalidState(_))
    ));
}

#[test]
fn test_completion_advances_exactly_once() {
    let (services, _clock, _sounds) = common::services();
    let setup = Setup::new(services.clone());
    setup.start();
    let advances = setup.count(EventKind::AdvanceLevel);

    setup.destroy_all_enemies();
    assert_that(&services.level(|level| level.enemies_all_eliminated)).is_true();
    assert_that(&advances.get()).is_equal_to(0);
    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::Playing(0));

    setup.collect_minerals(13);
    assert_that(&advances.get()).is_equal_to(0);

    // Every remaining mineral, including the surplus, re-checks completion.
    setup.collect_minerals(usize::MAX);
    assert_that(&advances.get()).is_equal_to(1);
    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::LevelComplete(0));
    assert_that(&setup.lifecycle.take_pending()).is_equal_to(Some(Transition::Advance));

    assert_eq!(services.bus.publish(Event::CheckLevelComplete), Outcome::Denied);
    assert_that(&advances.get()).is_equal_to(1);
}

#[test]
fn test_minerals_first_then_last_alien_advances_once() {
    let (services, _clock, _sounds) = common::services();
    let setup = Setup::new(services.clone());
    setup.start();
    let advances = setup.count(EventKind::AdvanceLevel);

    setup.collect_minerals(14);
    assert_that(&services.level(|level| level.minerals_all_collected)).is_true();
    assert_that(&advances.get()).is_equal_to(0);
    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::Playing(0));

    setup.destroy_all_enemies();
    assert_that(&advances.get()).is_equal_to(1);
    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::LevelComplete(0));
    assert_that(&setup.lifecycle.take_pending()).is_equal_to(Some(Transition::Advance));
}

static BROKEN_LAYOUT: [&str; 1] = ["#.#"];

#[test]
fn test_failed_advance_keeps_current_level() {
    let mut levels = table::levels();
    levels[1].map = LevelMap::new(&BROKEN_LAYOUT);
    let (services, _clock, _sounds) = common::services_with_levels(levels);
    let setup = Setup::new(services.clone());
    setup.start();
    setup.destroy_all_enemies();
    setup.collect_minerals(usize::MAX);
    setup.lifecycle.take_pending();
    let grid = services.tilemap.borrow().clone();

    let result = setup.lifecycle.apply_advance(&setup.registries());

    assert!(matches!(result, Err(GameError::Map(_))), "unexpected result {result:?}");
    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::Playing(0));
    assert_that(&services.levels.borrow().current_index()).is_equal_to(0);
    assert_that(&services.level(|level| level.idx)).is_equal_to(1);
    assert_eq!(*services.tilemap.borrow(), grid);
}

#[test]
fn test_advance_moves_to_next_level_with_fresh_flags() {
    let (services, _clock, _sounds) = common::services();
    let setup = Setup::new(services.clone());
    setup.start();
    setup.destroy_all_enemies();
    setup.collect_minerals(usize::MAX);
    setup.lifecycle.take_pending();

    setup.lifecycle.apply_advance(&setup.registries()).unwrap();

    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::Playing(1));
    assert_that(&services.level(|level| level.idx)).is_equal_to(2);
    assert_that(&services.level(|level| level.is_complete())).is_false();
    assert_that(&services.statusbar.borrow().lines()[0]).is_equal_to("Minerals collected:  0 / 16".to_string());
    assert_that(&services.tilemap.borrow().count(|tile| tile == Tile::Mineral(MineralKind::Photosium)))
        .is_equal_to(20);
}

#[test]
fn test_apply_advance_requires_completed_level() {
    let (services, _clock, _sounds) = common::services();
    let setup = Setup::new(services);
    setup.start();

    assert!(matches!(
        setup.lifecycle.apply_advance(&setup.registries()),
        Err(GameError::InvalidState(_))
    ));
    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::Playing(0));
}

#[test]
fn test_restart_resets_current_level_in_place() {
    let (services, _clock, _sounds) = common::services();
    let setup = Setup::new(services.clone());
    setup.start();
    setup.collect_minerals(5);
    assert_that(&services.statusbar.borrow().lines()[0]).is_equal_to("Minerals collected:  5 / 14".to_string());
    let spawn_table = setup.enemies.borrow().spawn_table().to_vec();

    assert_eq!(services.bus.publish(Event::LevelRestart), Outcome::Confirmed);
    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::PlayerDefeated(0));
    // A second defeat in the same frame is ignored.
    assert_eq!(services.bus.publish(Event::LevelRestart), Outcome::Denied);
    assert_that(&setup.lifecycle.take_pending()).is_equal_to(Some(Transition::Restart));

    setup.lifecycle.apply_restart(&setup.registries()).unwrap();

    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::Playing(0));
    assert_that(&services.level(|level| level.idx)).is_equal_to(1);
    assert_that(&services.statusbar.borrow().lines()[0]).is_equal_to("Minerals collected:  0 / 14".to_string());
    assert_that(&services.tilemap.borrow().count(|tile| tile == Tile::Mineral(MineralKind::Nethonite)))
        .is_equal_to(18);
    assert_eq!(setup.enemies.borrow().spawn_table(), spawn_table.as_slice());
    assert_that(&setup.enemies.borrow().enemy_count()).is_equal_to(spawn_table.len());
}

#[test]
fn test_restart_is_ignored_outside_gameplay() {
    let (services, _clock, _sounds) = common::services();
    let setup = Setup::new(services.clone());

    assert_eq!(services.bus.publish(Event::LevelRestart), Outcome::Denied);
    assert!(matches!(
        setup.lifecycle.apply_restart(&setup.registries()),
        Err(GameError::InvalidState(_))
    ));
}

#[test]
fn test_last_level_finishes_the_game() {
    let levels = table::levels().into_iter().take(1).collect();
    let (services, _clock, _sounds) = common::services_with_levels(levels);
    let setup = Setup::new(services.clone());
    setup.start();
    let finished = setup.count(EventKind::FinishGame);
    let listeners = services.bus.subscriber_count(EventKind::AdvanceLevel);

    assert_eq!(services.bus.publish(Event::AdvanceLevel), Outcome::Confirmed);
    assert_that(&setup.lifecycle.state()).is_equal_to(LevelState::AllLevelsComplete);
    assert_that(&finished.get()).is_equal_to(1);
    assert_that(&setup.lifecycle.pending()).is_none();
    // The lifecycle stops listening for advances once the campaign is over.
    assert_that(&services.bus.subscriber_count(EventKind::AdvanceLevel)).is_equal_to(listeners - 1);

    services.bus.publish(Event::AdvanceLevel);
    assert_that(&finished.get()).is_equal_to(1);
}

#[test]
fn test_level_handler_bounds() {
    assert!(matches!(LevelHandler::new(Vec::new()), Err(LevelError::EmptyTable)));

    let mut levels = LevelHandler::new(table::levels()).unwrap();
    assert_that(&levels.len()).is_equal_to(3);
    assert!(matches!(levels.advance_to(3), Err(LevelError::NoSuchLevel(3))));
    assert_that(&levels.current_index()).is_equal_to(0);

    assert_eq!(levels.advance_to(2).map(|level| level.idx), Ok(3));
    assert_that(&levels.is_last()).is_true();
}
