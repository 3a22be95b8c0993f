//! Play-field entities
//! - the shared Body data every drawn-and-collided thing carries
//! - one file per entity kind, each owning its own hitbox table
//!
//! The overlap test here is the only collision algorithm in the game :
//! axis-aligned boxes, checked pairwise against the player only. With a
//! handful of entities on screen there is nothing to gain from a broad
//! phase.

pub mod enemy;
pub mod gem;
pub mod hud;
pub mod player;
pub mod selector;

pub use enemy::Enemy;
pub use gem::Gem;
pub use hud::{Hud, Verdict};
pub use player::Player;
pub use selector::Selector;

use crate::engine::{Assets, Point, Rect, Renderer, Size};
#[cfg(debug_assertions)]
use crate::engine::DebugDraw;

// flip on to outline every live hitbox (debug builds only)
#[cfg(debug_assertions)]
const DRAW_HITBOXES: bool = false;

/// Fixed offsets from an entity's position to its collision rectangle.
/// Hand-tuned per sprite (the art has generous transparent margins) and
/// immutable after construction.
#[derive(Debug, Clone, Copy)]
pub struct Hitbox {
    pub dx: f32,
    pub dy: f32,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub const fn new(dx: f32, dy: f32, width: f32, height: f32) -> Self {
        Self {
            dx,
            dy,
            width,
            height,
        }
    }

    /// World-space collision rectangle for an entity standing at `position`
    pub fn at(&self, position: &Point) -> Rect {
        Rect::new(
            Point {
                x: position.x + self.dx,
                y: position.y + self.dy,
            },
            Size {
                width: self.width,
                height: self.height,
            },
        )
    }
}

/// What every world entity has in common : a position, the sprite it draws,
/// the hitbox it collides with, and a flag that benches it from collision
/// checks entirely (a collected gem, a knocked-down player).
#[derive(Debug, Clone)]
pub struct Body {
    pub position: Point,
    pub sprite: &'static str,
    pub hitbox: Hitbox,
    pub collisions: bool,
}

impl Body {
    pub fn new(position: Point, sprite: &'static str, hitbox: Hitbox) -> Self {
        Self {
            position,
            sprite,
            hitbox,
            collisions: true,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.hitbox.at(&self.position)
    }

    pub fn draw(&self, renderer: &Renderer, assets: &Assets) {
        renderer.draw_image(
            assets
                .get(self.sprite)
                .expect("Sprite was not pre-loaded! Unrecoverable error"),
            &self.position,
        );

        #[cfg(debug_assertions)]
        {
            if DRAW_HITBOXES {
                self.bounds().draw_debug(renderer);
            }
        }
    }
}

/// True iff both bodies take part in collisions and their hitbox rectangles
/// strictly overlap. Edge-touching is a miss.
pub fn overlaps(a: &Body, b: &Body) -> bool {
    if !a.collisions || !b.collisions {
        return false;
    }

    a.bounds().intersects(&b.bounds())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f32, y: f32) -> Body {
        // 10x10 box flush with the position
        Body::new(Point { x, y }, "test.png", Hitbox::new(0.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn strictly_overlapping_bodies_collide() {
        let a = body_at(0.0, 0.0);
        let b = body_at(5.0, 5.0);

        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn edge_touching_bodies_do_not_collide() {
        let a = body_at(0.0, 0.0);
        let b = body_at(10.0, 0.0);

        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn disabled_collisions_suppress_geometric_overlap() {
        let mut a = body_at(0.0, 0.0);
        let mut b = body_at(5.0, 5.0);

        b.collisions = false;
        assert!(!overlaps(&a, &b));

        // same the other way round
        b.collisions = true;
        a.collisions = false;
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn hitbox_offsets_shift_the_collision_rectangle() {
        // positions 20 apart but offset boxes meet in the middle
        let mut a = body_at(0.0, 0.0);
        let mut b = body_at(20.0, 0.0);
        a.hitbox = Hitbox::new(12.0, 0.0, 10.0, 10.0);
        b.hitbox = Hitbox::new(-3.0, 0.0, 10.0, 10.0);

        assert!(overlaps(&a, &b));
    }
}
