use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use rand::Rng;

use crate::constants::mechanics::STAR_COUNT;
use crate::constants::CANVAS_SIZE;
use crate::entity::Entity;
use crate::game::Services;
use crate::render::{Canvas, Color};

struct Star {
    position: Vec2,
    /// Fraction of the camera movement the star follows. Farther stars move less.
    depth: f32,
}

/// Parallax starfield behind the map.
pub struct Stars {
    services: Rc<Services>,
    stars: Vec<Star>,
}

impl Stars {
    pub fn new(services: &Rc<Services>) -> Rc<RefCell<Self>> {
        let size = CANVAS_SIZE.as_vec2();
        let stars = services.with_rng(|rng| {
            (0..STAR_COUNT)
                .map(|_| Star {
                    position: Vec2::new(rng.random_range(0.0..size.x), rng.random_range(0.0..size.y)),
                    depth: rng.random_range(0.05..0.4),
                })
                .collect()
        });

        Rc::new(RefCell::new(Self {
            services: services.clone(),
            stars,
        }))
    }
}

impl Entity for Stars {
    fn draw(&self, canvas: &mut dyn Canvas) {
        let height = CANVAS_SIZE.y as f32;
        let scroll = self.services.camera.get().y as f32;
        for star in &self.stars {
            let y = (star.position.y - scroll * star.depth).rem_euclid(height);
            let color = if star.depth > 0.25 { Color::White } else { Color::Gray };
            canvas.pixel(star.position.x as i32, y as i32, color);
        }
    }
}
