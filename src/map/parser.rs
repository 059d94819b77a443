//! Converts the ASCII level layouts into tile grids.

use glam::UVec2;

use crate::error::MapError;
use crate::map::{PowerUpKind, Tile, TileGrid};

/// Parser for converting raw level layouts into tile grids.
pub struct LayoutParser;

impl LayoutParser {
    /// Converts one layout character into a tile.
    ///
    /// `#` is rock, `E` an enemy spawner, `H`/`S`/`B` the health, shield and boost power-ups,
    /// and `.` or a space is open space. Minerals are never part of a layout; they are scattered
    /// at runtime.
    ///
    /// # Errors
    ///
    /// Returns `MapError::UnknownTile` for any other character.
    pub fn parse_character(c: char) -> Result<Tile, MapError> {
        match c {
            '.' | ' ' => Ok(Tile::Blank),
            '#' => Ok(Tile::Rock),
            'E' => Ok(Tile::EnemySpawner),
            'H' => Ok(Tile::PowerUp(PowerUpKind::Health)),
            'S' => Ok(Tile::PowerUp(PowerUpKind::Shield)),
            'B' => Ok(Tile::PowerUp(PowerUpKind::Speed)),
            _ => Err(MapError::UnknownTile(c)),
        }
    }

    /// Parses a layout of exactly `size.y` rows, each `size.x` characters wide.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout has the wrong height, a row has the wrong width, or a
    /// character is not part of the layout vocabulary.
    pub fn parse(layout: &[&str], size: UVec2) -> Result<TileGrid, MapError> {
        if layout.len() != size.y as usize {
            return Err(MapError::WrongHeight {
                expected: size.y as usize,
                found: layout.len(),
            });
        }

        let mut grid = TileGrid::new(size);
        for (y, row) in layout.iter().enumerate() {
            let width = row.chars().count();
            if width != size.x as usize {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: size.x as usize,
                    found: width,
                });
            }

            for (x, c) in row.chars().enumerate() {
                grid.set(x as u32, y as u32, Self::parse_character(c)?);
            }
        }

        Ok(grid)
    }
}
