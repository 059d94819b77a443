use std::cell::Cell;
use std::rc::Rc;

use glam::IVec2;
use misi_hijau::constants::statusbar::{DEFAULT_GAP, ORIGIN};
use misi_hijau::constants::FONT_HEIGHT;
use misi_hijau::error::StatusbarError;
use misi_hijau::events::Event;
use misi_hijau::hud::{Statusbar, StatusbarItem};
use misi_hijau::level::StatusbarColors;
use misi_hijau::render::{Color, DrawCommand, RecordingCanvas, Sprite};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

const COLORS: StatusbarColors = StatusbarColors {
    text: Color::White,
    bar: Color::Green,
    border: Color::Gray,
};

fn label(order: i32, text: &'static str) -> StatusbarItem {
    StatusbarItem::text(order, Color::White, move || text.to_string())
}

#[test]
fn test_items_are_ordered_by_key() {
    let mut statusbar = Statusbar::new();
    statusbar
        .add_many([label(2, "third"), label(-1, "first"), label(0, "second")])
        .unwrap();
    statusbar.refresh_values();

    assert_eq!(statusbar.lines(), vec!["first", "second", "third"]);
    let keys: Vec<i32> = statusbar.items().iter().map(StatusbarItem::order_key).collect();
    assert_eq!(keys, vec![-1, 0, 2]);
}

#[test]
fn test_layout_stacks_items_downwards() {
    let mut statusbar = Statusbar::new();
    statusbar
        .add_many([label(0, "a"), label(1, "b").with_gap(5), label(2, "pinned").at(IVec2::new(100, 3))])
        .unwrap();

    let positions: Vec<IVec2> = statusbar.items().iter().map(StatusbarItem::position).collect();
    let first_y = ORIGIN.y + DEFAULT_GAP;
    assert_eq!(
        positions,
        vec![
            IVec2::new(ORIGIN.x, first_y),
            IVec2::new(ORIGIN.x, first_y + FONT_HEIGHT + 5),
            IVec2::new(100, 3),
        ]
    );
}

#[test]
fn test_empty_layout_is_an_error() {
    let mut statusbar = Statusbar::new();
    assert_eq!(statusbar.relayout(), Err(StatusbarError::EmptyLayout));
    assert_eq!(statusbar.add_many(Vec::new()), Err(StatusbarError::EmptyLayout));

    statusbar.add(label(0, "only"));
    assert_that(&statusbar.relayout()).is_ok();
    statusbar.clear();
    assert_that(&statusbar.is_empty()).is_true();
}

#[test]
fn test_values_change_only_on_refresh() {
    let value = Rc::new(Cell::new(1));
    let source = value.clone();
    let mut statusbar = Statusbar::new();
    statusbar.add(StatusbarItem::progress(0, 5, COLORS, move || source.get()));

    assert_eq!(statusbar.lines(), vec!["0/5"]);
    statusbar.refresh_values();
    assert_eq!(statusbar.lines(), vec!["1/5"]);

    value.set(4);
    assert_eq!(statusbar.lines(), vec!["1/5"]);
    statusbar.refresh_values();
    assert_eq!(statusbar.lines(), vec!["4/5"]);
}

#[test]
fn test_update_statusbar_event_refreshes() {
    let (services, _clock, _sounds) = common::services();
    let value = Rc::new(Cell::new(0));
    let source = value.clone();
    services
        .statusbar
        .borrow_mut()
        .add(StatusbarItem::text(0, Color::White, move || format!("count {}", source.get())));

    value.set(7);
    services.bus.publish(Event::UpdateStatusbar);
    assert_eq!(services.statusbar.borrow().lines(), vec!["count 7"]);
}

#[test]
fn test_progress_drawing() {
    let mut statusbar = Statusbar::new();
    statusbar.add(
        StatusbarItem::progress(0, 4, COLORS, || 2)
            .with_icon(Sprite::Heart)
            .with_value_text(),
    );
    statusbar.refresh_values();

    let mut canvas = RecordingCanvas::new();
    statusbar.draw(&mut canvas);

    assert_that(&canvas.sprites().iter().any(|(_, sprite)| *sprite == Sprite::Heart)).is_true();
    assert_that(&canvas.contains_text("2/4")).is_true();
    let filled = canvas
        .commands()
        .iter()
        .any(|command| matches!(command, DrawCommand::Rect { color: Color::Green, filled: true, .. }));
    assert_that(&filled).is_true();
}

#[test]
fn test_empty_progress_draws_no_fill() {
    let mut statusbar = Statusbar::new();
    statusbar.add(StatusbarItem::progress(0, 4, COLORS, || 0));
    statusbar.refresh_values();

    let mut canvas = RecordingCanvas::new();
    statusbar.draw(&mut canvas);
    let filled = canvas
        .commands()
        .iter()
        .any(|command| matches!(command, DrawCommand::Rect { filled: true, .. }));
    assert_that(&filled).is_false();
}
