//! Levels, the level table, and the lifecycle that moves between them.

use glam::UVec2;
use tracing::{info, warn};

use crate::constants::MAP_SIZE;
use crate::error::{LevelError, MapError};
use crate::map::parser::LayoutParser;
use crate::map::{MineralKind, TileGrid};
use crate::render::Color;

pub mod lifecycle;
pub mod table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipVariant {
    Scout,
    Hauler,
    Cruiser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyVariant {
    Grug,
    Phong,
    Squidge,
}

impl EnemyVariant {
    /// Hits needed to destroy one of these.
    pub fn health(self) -> i32 {
        match self {
            EnemyVariant::Grug => 2,
            EnemyVariant::Phong => 4,
            EnemyVariant::Squidge => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusbarColors {
    pub text: Color,
    pub bar: Color,
    pub border: Color,
}

/// A level's tile layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelMap {
    layout: &'static [&'static str],
}

impl LevelMap {
    pub const fn new(layout: &'static [&'static str]) -> Self {
        Self { layout }
    }

    pub fn size(&self) -> UVec2 {
        MAP_SIZE
    }

    /// Parses the layout into a fresh tile grid.
    pub fn load(&self) -> Result<TileGrid, MapError> {
        LayoutParser::parse(self.layout, self.size())
    }
}

/// One stage of the campaign: its content plus the two completion flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// 1-based level number.
    pub idx: usize,
    pub map: LevelMap,
    pub ship: ShipVariant,
    pub enemy: EnemyVariant,
    pub mineral: MineralKind,
    pub bullet_color: Color,
    pub statusbar_colors: StatusbarColors,
    pub minerals_required: u32,
    pub max_health: i32,
    pub minerals_all_collected: bool,
    pub enemies_all_eliminated: bool,
}

impl Level {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        idx: usize,
        map: LevelMap,
        ship: ShipVariant,
        enemy: EnemyVariant,
        mineral: MineralKind,
        bullet_color: Color,
        statusbar_colors: StatusbarColors,
        minerals_required: u32,
        max_health: i32,
    ) -> Self {
        Self {
            idx,
            map,
            ship,
            enemy,
            mineral,
            bullet_color,
            statusbar_colors,
            minerals_required,
            max_health,
            minerals_all_collected: false,
            enemies_all_eliminated: false,
        }
    }

    /// Both completion flags are set.
    pub fn is_complete(&self) -> bool {
        self.enemies_all_eliminated && self.minerals_all_collected
    }

    pub fn reset_flags(&mut self) {
        self.minerals_all_collected = false;
        self.enemies_all_eliminated = false;
    }
}

/// Owns the level table and tracks which level is current.
#[derive(Debug, Clone)]
pub struct LevelHandler {
    levels: Vec<Level>,
    current: usize,
}

impl LevelHandler {
    /// # Errors
    ///
    /// Returns `LevelError::EmptyTable` if `levels` is empty.
    pub fn new(levels: Vec<Level>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::EmptyTable);
        }
        Ok(Self { levels, current: 0 })
    }

    pub fn current(&self) -> &Level {
        &self.levels[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Level {
        &mut self.levels[self.current]
    }

    /// Zero-based position of the current level in the table.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.levels.len()
    }

    /// The level at `index`, without making it current.
    pub fn get(&self, index: usize) -> Result<&Level, LevelError> {
        self.levels.get(index).ok_or(LevelError::NoSuchLevel(index))
    }

    /// Makes the level at `index` current.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::NoSuchLevel` and stays on the current level if `index` is out of range.
    pub fn advance_to(&mut self, index: usize) -> Result<&Level, LevelError> {
        if index >= self.levels.len() {
            warn!(index, current = self.current, "Refusing to advance to a level that does not exist");
            return Err(LevelError::NoSuchLevel(index));
        }

        self.current = index;
        let level = &self.levels[index];
        info!(level = level.idx, "Current level changed");
        Ok(level)
    }
}
