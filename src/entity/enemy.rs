use super::{Body, Hitbox};
use crate::engine::{Assets, Point, Renderer};
use crate::game::consts;

// the bug art carries a lot of empty pixels above the shell
const HITBOX: Hitbox = Hitbox::new(10.0, 80.0, 70.0, 60.0);

/// A bug marching left to right across one stone row. Enemies are pooled :
/// once spawned they are reset to the off-screen column when they leave the
/// field, never destroyed.
#[derive(Debug, Clone)]
pub struct Enemy {
    body: Body,
    /// pixels per second
    speed: f32,
}

impl Enemy {
    pub fn new(position: Point, speed: f32) -> Self {
        Self {
            body: Body::new(position, consts::sprites::ENEMY_BUG, HITBOX),
            speed,
        }
    }

    /// Advance along the row
    /// - movement is scaled by dt so speed stays in pixels per second on
    /// every machine
    pub fn update(&mut self, dt: f32) {
        self.body.position.x += self.speed * dt;
    }

    /// Back to the spawn column for another pass, same row, same speed
    pub fn reset(&mut self) {
        self.body.position.x = consts::ENEMY_RESET_X;
    }

    pub fn past_right_edge(&self) -> bool {
        self.body.position.x > consts::FIELD_WIDTH
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn draw(&self, renderer: &Renderer, assets: &Assets) {
        self.body.draw(renderer, assets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn enemy(x: f32, speed: f32) -> Enemy {
        Enemy::new(Point { x, y: 63.0 }, speed)
    }

    #[test]
    fn motion_is_scaled_by_dt() {
        let mut bug = enemy(0.0, 100.0);

        bug.update(1.0 / 60.0);
        assert_abs_diff_eq!(bug.body().position.x, 100.0 / 60.0, epsilon = 1e-4);

        // a longer step covers proportionally more ground
        let mut slow_frames = enemy(0.0, 100.0);
        slow_frames.update(1.0 / 30.0);
        assert_abs_diff_eq!(slow_frames.body().position.x, 100.0 / 30.0, epsilon = 1e-4);
    }

    #[test]
    fn reset_returns_to_the_spawn_column() {
        let mut bug = enemy(500.0, 150.0);
        let row = bug.body().position.y;

        assert!(!bug.past_right_edge());
        bug.update(1.0); // well past the right edge now
        assert!(bug.past_right_edge());

        bug.reset();
        assert_abs_diff_eq!(bug.body().position.x, consts::ENEMY_RESET_X);
        // reset touches x only
        assert_abs_diff_eq!(bug.body().position.y, row);
    }
}
