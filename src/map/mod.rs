//! Tile identities and the tile grid gameplay entities probe and rewrite.

use glam::UVec2;

pub mod parser;

/// The three minerals, one per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MineralKind {
    Nethonite,
    Photosium,
    Electricium,
}

impl MineralKind {
    pub fn name(self) -> &'static str {
        match self {
            MineralKind::Nethonite => "Nethonite",
            MineralKind::Photosium => "Photosium",
            MineralKind::Electricium => "Electricium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumIter)]
pub enum PowerUpKind {
    Health,
    Shield,
    Speed,
}

/// What a tile is, as far as collision and pickups are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Blank,
    Rock,
    EnemySpawner,
    Mineral(MineralKind),
    PowerUp(PowerUpKind),
}

impl Tile {
    /// Tiles the ship cannot fly through.
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Rock)
    }
}

/// A fixed-size grid of tiles addressed in tile coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    size: UVec2,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// A grid filled with blank tiles.
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            tiles: vec![Tile::Blank; (size.x * size.y) as usize],
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size.x && y < self.size.y).then(|| (y * self.size.x + x) as usize)
    }

    /// The tile at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<Tile> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    /// Overwrites a tile. Returns false, changing nothing, outside the grid.
    pub fn set(&mut self, x: u32, y: u32, tile: Tile) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Positions of every tile equal to `tile`, row by row.
    pub fn positions_of(&self, tile: Tile) -> Vec<UVec2> {
        self.iter().filter(|(_, t)| *t == tile).map(|(pos, _)| pos).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UVec2, Tile)> + '_ {
        let width = self.size.x;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (UVec2::new(i as u32 % width, i as u32 / width), *tile))
    }

    pub fn count(&self, predicate: impl Fn(Tile) -> bool) -> usize {
        self.tiles.iter().filter(|tile| predicate(**tile)).count()
    }
}
