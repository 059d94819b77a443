use glam::IVec2;
use tracing::{debug, trace};

use crate::constants::statusbar::{BAR_HEIGHT, BAR_WIDTH, DEFAULT_GAP, ICON_GAP, ORIGIN};
use crate::constants::{FONT_HEIGHT, FONT_WIDTH};
use crate::error::StatusbarError;
use crate::level::StatusbarColors;
use crate::render::{Canvas, Color, Sprite};

enum Content {
    Text {
        compute: Box<dyn Fn() -> String>,
        color: Color,
        cached: String,
    },
    Progress {
        max: i32,
        compute: Box<dyn Fn() -> i32>,
        colors: StatusbarColors,
        bar: IVec2,
        icon: Option<Sprite>,
        show_value: bool,
        cached: i32,
    },
}

/// One line of the statusbar: a computed string, or a progress bar with an optional icon.
///
/// The displayed value is only recomputed by [`Statusbar::refresh_values`].
pub struct StatusbarItem {
    order_key: i32,
    gap: i32,
    custom_position: Option<IVec2>,
    position: IVec2,
    content: Content,
}

impl StatusbarItem {
    pub fn text(order_key: i32, color: Color, compute: impl Fn() -> String + 'static) -> Self {
        Self::with_content(
            order_key,
            Content::Text {
                compute: Box::new(compute),
                color,
                cached: String::new(),
            },
        )
    }

    pub fn progress(order_key: i32, max: i32, colors: StatusbarColors, compute: impl Fn() -> i32 + 'static) -> Self {
        Self::with_content(
            order_key,
            Content::Progress {
                max,
                compute: Box::new(compute),
                colors,
                bar: IVec2::new(BAR_WIDTH, BAR_HEIGHT),
                icon: None,
                show_value: false,
                cached: 0,
            },
        )
    }

    fn with_content(order_key: i32, content: Content) -> Self {
        Self {
            order_key,
            gap: DEFAULT_GAP,
            custom_position: None,
            position: ORIGIN,
            content,
        }
    }

    /// Space left above this item by the automatic layout.
    pub fn with_gap(mut self, gap: i32) -> Self {
        self.gap = gap;
        self
    }

    /// Pins the item to a fixed position, outside the automatic layout.
    pub fn at(mut self, position: IVec2) -> Self {
        self.custom_position = Some(position);
        self.position = position;
        self
    }

    /// Draws `icon` left of a progress bar. No effect on text items.
    pub fn with_icon(mut self, sprite: Sprite) -> Self {
        if let Content::Progress { icon, .. } = &mut self.content {
            *icon = Some(sprite);
        }
        self
    }

    /// Prints `value/max` over a progress bar. No effect on text items.
    pub fn with_value_text(mut self) -> Self {
        if let Content::Progress { show_value, .. } = &mut self.content {
            *show_value = true;
        }
        self
    }

    pub fn with_bar_size(mut self, size: IVec2) -> Self {
        if let Content::Progress { bar, .. } = &mut self.content {
            *bar = size;
        }
        self
    }

    pub fn order_key(&self) -> i32 {
        self.order_key
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    /// The last computed value, as text.
    pub fn display(&self) -> String {
        match &self.content {
            Content::Text { cached, .. } => cached.clone(),
            Content::Progress { cached, max, .. } => format!("{cached}/{max}"),
        }
    }

    fn height(&self) -> i32 {
        match &self.content {
            Content::Text { .. } => FONT_HEIGHT,
            Content::Progress { bar, icon, .. } => icon.map_or(bar.y, |icon| icon.size().y.max(bar.y)),
        }
    }

    fn refresh(&mut self) {
        match &mut self.content {
            Content::Text { compute, cached, .. } => *cached = compute(),
            Content::Progress { compute, cached, .. } => *cached = compute(),
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let IVec2 { x, y } = self.position;
        match &self.content {
            Content::Text { cached, color, .. } => canvas.text(x, y, cached, *color),
            Content::Progress {
                max,
                colors,
                bar,
                icon,
                show_value,
                cached,
                ..
            } => {
                let row_height = self.height();
                let mut bar_x = x;
                if let Some(icon) = icon {
                    canvas.sprite(x, y + (row_height - icon.size().y) / 2, *icon);
                    bar_x += icon.size().x + ICON_GAP;
                }
                let bar_y = y + (row_height - bar.y) / 2;

                let pixels_per_value = if *max == 0 {
                    bar.x as f32
                } else {
                    (bar.x - 2) as f32 / *max as f32
                };
                let fill = ((*cached).clamp(0, (*max).max(0)) as f32 * pixels_per_value) as i32;

                canvas.rectb(bar_x, bar_y, bar.x, bar.y, colors.border);
                if fill > 0 {
                    canvas.rect(bar_x + 1, bar_y + 1, fill, bar.y - 2, colors.bar);
                }
                if *show_value {
                    let label = format!("{cached}/{max}");
                    let label_x = bar_x + (bar.x - label.len() as i32 * FONT_WIDTH) / 2;
                    canvas.text(label_x, bar_y + (bar.y - FONT_HEIGHT) / 2 + 1, &label, colors.text);
                }
            }
        }
    }
}

/// Ordered status lines drawn over the playfield.
///
/// Items are kept sorted by order key and positioned top to bottom whenever the item set
/// changes. Displayed values only change on [`refresh_values`](Self::refresh_values).
#[derive(Default)]
pub struct Statusbar {
    items: Vec<StatusbarItem>,
}

impl Statusbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: StatusbarItem) {
        self.items.push(item);
        self.layout();
    }

    /// # Errors
    ///
    /// Returns `StatusbarError::EmptyLayout` if the statusbar is still empty afterwards.
    pub fn add_many(&mut self, items: impl IntoIterator<Item = StatusbarItem>) -> Result<(), StatusbarError> {
        self.items.extend(items);
        self.relayout()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sorts the items and recomputes their positions.
    ///
    /// # Errors
    ///
    /// Returns `StatusbarError::EmptyLayout` if there is nothing to lay out.
    pub fn relayout(&mut self) -> Result<(), StatusbarError> {
        if self.items.is_empty() {
            return Err(StatusbarError::EmptyLayout);
        }
        self.layout();
        Ok(())
    }

    fn layout(&mut self) {
        self.items.sort_by_key(|item| item.order_key);

        let mut next_y = ORIGIN.y;
        for item in &mut self.items {
            if let Some(position) = item.custom_position {
                item.position = position;
                continue;
            }
            let y = next_y + item.gap;
            item.position = IVec2::new(ORIGIN.x, y);
            next_y = y + item.height();
        }
        debug!(items = self.items.len(), "Statusbar laid out");
    }

    /// Recomputes every item's displayed value.
    pub fn refresh_values(&mut self) {
        for item in &mut self.items {
            item.refresh();
        }
        trace!(items = self.items.len(), "Statusbar refreshed");
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for item in &self.items {
            item.draw(canvas);
        }
    }

    pub fn items(&self) -> &[StatusbarItem] {
        &self.items
    }

    /// The displayed value of every item, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        self.items.iter().map(StatusbarItem::display).collect()
    }
}
