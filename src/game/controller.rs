use tracing::trace;

use crate::render::{Canvas, Color};

pub type UpdateFn<C> = fn(&mut C);
pub type DrawFn<C> = fn(&C, &mut dyn Canvas);

/// The state a [`LoopController`] drives.
pub trait LoopContext {
    /// Advances everything derived from the frame clock: tick gates, deferred timers and input.
    fn advance_services(&mut self);
}

/// Holds the update and draw functions of the active phase.
///
/// Installing a new pair only stages it; the swap happens at the start of the next
/// [`tick`](Self::tick), so a frame never mixes two phases.
pub struct LoopController<C> {
    update: Option<UpdateFn<C>>,
    draw: Option<DrawFn<C>>,
    staged: Option<(Option<UpdateFn<C>>, Option<DrawFn<C>>)>,
}

impl<C> Default for LoopController<C> {
    fn default() -> Self {
        Self {
            update: None,
            draw: None,
            staged: None,
        }
    }
}

impl<C: LoopContext> LoopController<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a new function pair. A later call before the next tick replaces it.
    pub fn install(&mut self, update: Option<UpdateFn<C>>, draw: Option<DrawFn<C>>) {
        self.staged = Some((update, draw));
    }

    pub fn has_staged(&self) -> bool {
        self.staged.is_some()
    }

    pub fn has_update(&self) -> bool {
        self.update.is_some()
    }

    pub fn has_draw(&self) -> bool {
        self.draw.is_some()
    }

    /// Applies any staged swap, advances the services, then runs the update function if any.
    pub fn tick(&mut self, ctx: &mut C) {
        if let Some((update, draw)) = self.staged.take() {
            trace!(update = update.is_some(), draw = draw.is_some(), "Loop functions swapped");
            self.update = update;
            self.draw = draw;
        }

        ctx.advance_services();
        if let Some(update) = self.update {
            update(ctx);
        }
    }

    /// Runs the draw function, or clears the frame when there is none.
    pub fn render(&self, ctx: &C, canvas: &mut dyn Canvas) {
        match self.draw {
            Some(draw) => draw(ctx, canvas),
            None => canvas.cls(Color::Black),
        }
    }
}
