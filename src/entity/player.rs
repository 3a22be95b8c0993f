use super::{Body, Hitbox};
use crate::engine::input::Command;
use crate::engine::{Assets, Point, Renderer, Size};
use crate::game::consts;

const HITBOX: Hitbox = Hitbox::new(27.0, 65.0, 50.0, 70.0);
// knocked-down pose : tipped over by ~57 degrees
const HIT_POSE_RADIANS: f64 = 1.0;

/// The playable character. Moves one tile per command, clamped to the
/// field, and spends a short benched window at the spawn point after a bug
/// hits it.
#[derive(Debug, Clone)]
pub struct Player {
    body: Body,
    /// one command moves exactly one tile on the pressed axis
    step: Size,
    is_hit: bool,
}

impl Player {
    pub fn new(sprite: &'static str) -> Self {
        Self {
            body: Body::new(consts::PLAYER_SPAWN, sprite, HITBOX),
            step: Size {
                width: consts::TILE_WIDTH,
                height: consts::TILE_HEIGHT,
            },
            is_hit: false,
        }
    }

    /// One discrete movement command. Position is clamped to the playable
    /// bounds on every edge; a command with no movement meaning is logged
    /// and otherwise ignored.
    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::Left => {
                self.body.position.x -= self.step.width;
                if self.body.position.x < 0.0 {
                    self.body.position.x = 0.0;
                }
            }

            Command::Up => {
                self.body.position.y -= self.step.height;
                if self.body.position.y < consts::PLAYER_MIN_Y {
                    self.body.position.y = consts::PLAYER_MIN_Y;
                }
            }

            Command::Right => {
                self.body.position.x += self.step.width;
                if self.body.position.x > consts::PLAYER_MAX_X {
                    self.body.position.x = consts::PLAYER_MAX_X;
                }
            }

            Command::Down => {
                self.body.position.y += self.step.height;
                if self.body.position.y > consts::PLAYER_MAX_Y {
                    self.body.position.y = consts::PLAYER_MAX_Y;
                }
            }

            other => {
                warn!("Player received invalid input : {:?}", other);
            }
        }
    }

    /// A bug got us. Bench the hitbox so overlapping frames cannot double
    /// up the damage; the world schedules the matching respawn.
    pub fn take_damage(&mut self) {
        self.is_hit = true;
        self.body.collisions = false;
    }

    /// Back on our feet at the spawn point
    pub fn respawn(&mut self) {
        self.body.position = consts::PLAYER_SPAWN;
        self.is_hit = false;
        self.body.collisions = true;
    }

    pub fn is_hit(&self) -> bool {
        self.is_hit
    }

    pub fn position(&self) -> &Point {
        &self.body.position
    }

    pub fn sprite(&self) -> &'static str {
        self.body.sprite
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn draw(&self, renderer: &Renderer, assets: &Assets) {
        if self.is_hit {
            let image = assets
                .get(self.body.sprite)
                .expect("Sprite was not pre-loaded! Unrecoverable error");
            renderer.draw_image_rotated(
                image,
                &Point {
                    x: self.body.position.x + consts::TILE_WIDTH + 20.0,
                    y: self.body.position.y + 10.0,
                },
                HIT_POSE_RADIANS,
            );
        } else {
            self.body.draw(renderer, assets);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn player() -> Player {
        Player::new(consts::PLAYER_ROSTER[0])
    }

    #[test]
    fn spawns_at_the_spawn_point() {
        let hero = player();

        assert_abs_diff_eq!(hero.position().x, 202.0);
        assert_abs_diff_eq!(hero.position().y, 405.0);
        assert!(!hero.is_hit());
    }

    #[test]
    fn moves_one_tile_per_command() {
        let mut hero = player();

        hero.handle_command(Command::Left);
        assert_abs_diff_eq!(hero.position().x, 202.0 - consts::TILE_WIDTH);

        hero.handle_command(Command::Up);
        assert_abs_diff_eq!(hero.position().y, 405.0 - consts::TILE_HEIGHT);
    }

    #[test]
    fn left_edge_clamps_at_zero() {
        let mut hero = player();

        for _ in 0..10 {
            hero.handle_command(Command::Left);
        }
        assert_abs_diff_eq!(hero.position().x, 0.0);
    }

    #[test]
    fn right_edge_clamps_one_tile_inside_the_field() {
        let mut hero = player();

        for _ in 0..10 {
            hero.handle_command(Command::Right);
        }
        assert_abs_diff_eq!(hero.position().x, consts::PLAYER_MAX_X);
    }

    #[test]
    fn vertical_clamps_hold_on_both_edges() {
        let mut hero = player();

        for _ in 0..10 {
            hero.handle_command(Command::Up);
        }
        assert_abs_diff_eq!(hero.position().y, consts::PLAYER_MIN_Y);

        for _ in 0..20 {
            hero.handle_command(Command::Down);
        }
        assert_abs_diff_eq!(hero.position().y, consts::PLAYER_MAX_Y);
    }

    #[test]
    fn any_command_storm_stays_inside_the_field() {
        let mut hero = player();
        let storm = [
            Command::Left,
            Command::Up,
            Command::Up,
            Command::Left,
            Command::Down,
            Command::Right,
            Command::Up,
            Command::Right,
            Command::Right,
            Command::Down,
            Command::Down,
            Command::Down,
        ];

        for _ in 0..7 {
            for command in storm {
                hero.handle_command(command);
                assert!(hero.position().x >= 0.0);
                assert!(hero.position().x <= consts::PLAYER_MAX_X);
                assert!(hero.position().y >= consts::PLAYER_MIN_Y);
                assert!(hero.position().y <= consts::PLAYER_MAX_Y);
            }
        }
    }

    #[test]
    fn enter_is_ignored_without_moving() {
        let mut hero = player();
        let before = *hero.position();

        hero.handle_command(Command::Enter);
        assert_eq!(*hero.position(), before);
    }

    #[test]
    fn damage_benches_collisions_until_respawn() {
        let mut hero = player();
        hero.handle_command(Command::Up);

        hero.take_damage();
        assert!(hero.is_hit());
        assert!(!hero.body().collisions);

        hero.respawn();
        assert!(!hero.is_hit());
        assert!(hero.body().collisions);
        assert_eq!(*hero.position(), consts::PLAYER_SPAWN);
    }
}
