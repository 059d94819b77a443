//! Gameplay entities. They only talk to each other through the event bus and the shared tilemap.

use glam::{IVec2, UVec2, Vec2};

use crate::constants::{MAP_PIXEL_SIZE, TILE_SIZE};
use crate::game::Services;

pub mod blasts;
pub mod bullets;
pub mod enemies;
pub mod minerals;
pub mod player;
pub mod powerups;
pub mod stars;

pub use blasts::Blasts;
pub use bullets::Bullets;
pub use enemies::EnemyHandler;
pub use minerals::Minerals;
pub use player::{Player, ShipVitals};
pub use powerups::PowerUps;
pub use stars::Stars;

/// Rows at the bottom of every map kept clear for the ship's spawn.
pub const SPAWN_ROWS: u32 = 8;

/// The tile containing a map pixel position.
pub fn tile_at(position: Vec2) -> UVec2 {
    (position / TILE_SIZE as f32).floor().max(Vec2::ZERO).as_uvec2()
}

pub fn tile_origin(tile: UVec2) -> Vec2 {
    (tile.as_ivec2() * TILE_SIZE).as_vec2()
}

/// Whether a box of `size` at `position` leaves the map or touches a solid tile.
pub fn is_blocked(services: &Services, position: Vec2, size: IVec2) -> bool {
    let far = position + size.as_vec2() - Vec2::splat(0.01);
    if position.x < 0.0 || position.y < 0.0 || far.x >= MAP_PIXEL_SIZE.x as f32 || far.y >= MAP_PIXEL_SIZE.y as f32 {
        return true;
    }

    let tilemap = services.tilemap.borrow();
    [position, Vec2::new(far.x, position.y), Vec2::new(position.x, far.y), far]
        .into_iter()
        .map(tile_at)
        .any(|tile| tilemap.get(tile.x, tile.y).is_some_and(|tile| tile.is_solid()))
}
