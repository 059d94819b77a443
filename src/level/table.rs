//! The static level table.

use crate::constants::MAP_SIZE;
use crate::level::{EnemyVariant, Level, LevelMap, ShipVariant, StatusbarColors};
use crate::map::MineralKind;
use crate::render::Color;

/// Builds the three levels of the campaign, first to last.
pub fn levels() -> Vec<Level> {
    vec![
        Level::new(
            1,
            LevelMap::new(&LEVEL_1),
            ShipVariant::Scout,
            EnemyVariant::Grug,
            MineralKind::Nethonite,
            Color::Cyan,
            StatusbarColors {
                text: Color::White,
                bar: Color::Red,
                border: Color::Gray,
            },
            14,
            3,
        ),
        Level::new(
            2,
            LevelMap::new(&LEVEL_2),
            ShipVariant::Hauler,
            EnemyVariant::Phong,
            MineralKind::Photosium,
            Color::Lime,
            StatusbarColors {
                text: Color::Peach,
                bar: Color::Orange,
                border: Color::Gray,
            },
            16,
            4,
        ),
        Level::new(
            3,
            LevelMap::new(&LEVEL_3),
            ShipVariant::Cruiser,
            EnemyVariant::Squidge,
            MineralKind::Electricium,
            Color::Yellow,
            StatusbarColors {
                text: Color::LightBlue,
                bar: Color::Pink,
                border: Color::White,
            },
            18,
            5,
        ),
    ]
}

const LEVEL_1: [&str; MAP_SIZE.y as usize] = [
    "................................",
    "................................",
    "................................",
    ".....E..........................",
    "................E...............",
    "................................",
    "..........................E.....",
    "................................",
    "..###...........................",
    "..###...........................",
    "........................####....",
    "........................####....",
    ".........E......................",
    "................................",
    "................................",
    "......................E.........",
    "................................",
    "............##..................",
    "...S........##..................",
    "............##..................",
    ".............................H..",
    "................................",
    "..............E.................",
    "................................",
    "...........................##...",
    "...........................##...",
    "....###....................##...",
    "....###.........................",
    "................................",
    "................................",
    "..................####..........",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
];

const LEVEL_2: [&str; MAP_SIZE.y as usize] = [
    "................................",
    "................................",
    "....E...............E...........",
    "............E...................",
    "................................",
    "............................E...",
    ".##.............................",
    ".##...........####..............",
    ".##.............................",
    ".##.......................###...",
    ".......E..................###...",
    ".................E........###...",
    ".....S..........................",
    "................................",
    ".........................E......",
    "......#####.....................",
    "................H...............",
    "................................",
    "................................",
    "....................##..........",
    "...........E........##..........",
    "....................##..........",
    "....................##.......B..",
    "................................",
    "..####..........................",
    "..####..........................",
    "................................",
    ".........................###....",
    ".........................###....",
    "................................",
    "................................",
    "..........###...................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
];

const LEVEL_3: [&str; MAP_SIZE.y as usize] = [
    "................................",
    "................................",
    "...E......E.............E.......",
    ".................E..............",
    "................................",
    ".###............................",
    "............##...............E..",
    "............##..................",
    "............##...........####...",
    "......E.........................",
    "..............E.................",
    "......................E.........",
    "..............................H.",
    "....##..........................",
    "....##..........#####...........",
    "....##..........................",
    "....##.....................###..",
    ".........E.................###..",
    "...........................###..",
    "................................",
    "......S............E............",
    "................................",
    "................................",
    "........####....................",
    "................................",
    "...........H.........##.........",
    ".....................##.........",
    ".....................##.........",
    "..............#.................",
    "..###.........#.................",
    "..###.........#...........B.....",
    "..............#.................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
];
