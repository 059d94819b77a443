use misi_hijau::game::{LoopContext, LoopController};
use misi_hijau::render::{Canvas, Color, DrawCommand, RecordingCanvas};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

#[derive(Default)]
struct Context {
    log: Vec<&'static str>,
}

impl LoopContext for Context {
    fn advance_services(&mut self) {
        self.log.push("services");
    }
}

fn update_a(ctx: &mut Context) {
    ctx.log.push("a");
}

fn update_b(ctx: &mut Context) {
    ctx.log.push("b");
}

fn draw_a(_: &Context, canvas: &mut dyn Canvas) {
    canvas.text(0, 0, "a", Color::White);
}

#[test]
fn test_nothing_installed() {
    let mut controller = LoopController::<Context>::new();
    let mut ctx = Context::default();

    controller.tick(&mut ctx);
    assert_eq!(ctx.log, vec!["services"]);

    let mut canvas = RecordingCanvas::new();
    controller.render(&ctx, &mut canvas);
    assert_eq!(canvas.commands(), &[DrawCommand::Clear(Color::Black)]);
}

#[test]
fn test_install_applies_on_next_tick() {
    let mut controller = LoopController::<Context>::new();
    let mut ctx = Context::default();

    controller.install(Some(update_a), Some(draw_a));
    assert_that(&controller.has_staged()).is_true();
    assert_that(&controller.has_update()).is_false();

    controller.tick(&mut ctx);
    assert_that(&controller.has_staged()).is_false();
    assert_that(&controller.has_draw()).is_true();

    // Installed mid-frame: the current pair keeps running until the next tick.
    controller.install(Some(update_b), None);
    let mut canvas = RecordingCanvas::new();
    controller.render(&ctx, &mut canvas);
    assert_that(&canvas.contains_text("a")).is_true();

    controller.tick(&mut ctx);
    assert_eq!(ctx.log, vec!["services", "a", "services", "b"]);
    assert_that(&controller.has_draw()).is_false();
}

#[test]
fn test_last_install_before_tick_wins() {
    let mut controller = LoopController::<Context>::new();
    let mut ctx = Context::default();

    controller.install(Some(update_a), None);
    controller.install(Some(update_b), None);
    controller.tick(&mut ctx);

    assert_eq!(ctx.log, vec!["services", "b"]);
}

#[test]
fn test_clearing_the_update_function() {
    let mut controller = LoopController::<Context>::new();
    let mut ctx = Context::default();

    controller.install(Some(update_a), None);
    controller.tick(&mut ctx);
    controller.install(None, None);
    controller.tick(&mut ctx);

    assert_eq!(ctx.log, vec!["services", "a", "services"]);
    assert_that(&controller.has_update()).is_false();
}
