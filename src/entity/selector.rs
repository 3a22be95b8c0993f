use crate::engine::input::Command;
use crate::engine::{Assets, Point, Renderer};
use crate::game::consts;

/// Pre-game character picker. Left/Right slide a highlight across the
/// roster row, Enter locks the choice in. No hitbox : nothing in the world
/// can collide with a menu.
#[derive(Debug, Clone)]
pub struct Selector {
    position: Point,
    chosen: usize,
}

impl Selector {
    pub fn new() -> Self {
        Self {
            // highlight starts over the middle character
            position: Point { x: 202.0, y: 120.0 },
            chosen: 2,
        }
    }

    /// Move the highlight or commit. Returns the chosen sprite on Enter;
    /// the caller starts the round with it.
    pub fn handle_command(&mut self, command: Command) -> Option<&'static str> {
        match command {
            Command::Left => {
                if self.chosen == 0 {
                    self.position.x = 0.0;
                } else {
                    self.chosen -= 1;
                    self.position.x -= consts::TILE_WIDTH;
                }
            }

            Command::Right => {
                if self.chosen + 1 >= consts::PLAYER_ROSTER.len() {
                    self.chosen = consts::PLAYER_ROSTER.len() - 1;
                    self.position.x = consts::FIELD_WIDTH - consts::TILE_WIDTH;
                } else {
                    self.chosen += 1;
                    self.position.x += consts::TILE_WIDTH;
                }
            }

            Command::Enter => {
                return Some(consts::PLAYER_ROSTER[self.chosen]);
            }

            other => {
                warn!("Selector received invalid input : {:?}", other);
            }
        }

        None
    }

    pub fn chosen(&self) -> usize {
        self.chosen
    }

    pub fn draw(&self, renderer: &Renderer, assets: &Assets) {
        renderer.set_text_align("center");
        renderer.fill_text(
            "Choose your character",
            &Point {
                x: consts::FIELD_WIDTH / 2.0,
                y: 100.0,
            },
            "28pt sans-serif",
            "black",
        );
        renderer.set_text_align("start");

        renderer.draw_image(
            assets
                .get(consts::sprites::SELECTOR)
                .expect("Sprite was not pre-loaded! Unrecoverable error"),
            &self.position,
        );

        // roster row on top of the highlight
        for (i, sprite) in consts::PLAYER_ROSTER.iter().enumerate() {
            renderer.draw_image(
                assets
                    .get(sprite)
                    .expect("Sprite was not pre-loaded! Unrecoverable error"),
                &Point {
                    x: i as f32 * consts::TILE_WIDTH,
                    y: 120.0,
                },
            );
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn starts_over_the_middle_character() {
        let selector = Selector::new();

        assert_eq!(selector.chosen(), 2);
    }

    #[test]
    fn left_clamps_at_the_first_character() {
        let mut selector = Selector::new();

        for _ in 0..10 {
            selector.handle_command(Command::Left);
        }
        assert_eq!(selector.chosen(), 0);
        assert_abs_diff_eq!(selector.position.x, 0.0);
    }

    #[test]
    fn right_clamps_at_the_last_character() {
        let mut selector = Selector::new();

        for _ in 0..10 {
            selector.handle_command(Command::Right);
        }
        assert_eq!(selector.chosen(), consts::PLAYER_ROSTER.len() - 1);
        assert_abs_diff_eq!(
            selector.position.x,
            consts::FIELD_WIDTH - consts::TILE_WIDTH
        );
    }

    #[test]
    fn enter_commits_the_highlighted_character() {
        let mut selector = Selector::new();

        selector.handle_command(Command::Left);
        let sprite = selector.handle_command(Command::Enter);
        assert_eq!(sprite, Some(consts::PLAYER_ROSTER[1]));
    }

    #[test]
    fn directional_input_never_commits() {
        let mut selector = Selector::new();

        assert_eq!(selector.handle_command(Command::Left), None);
        assert_eq!(selector.handle_command(Command::Right), None);
        assert_eq!(selector.handle_command(Command::Up), None);
        assert_eq!(selector.handle_command(Command::Down), None);
    }

    #[test]
    fn highlight_tracks_the_chosen_tile() {
        let mut selector = Selector::new();

        selector.handle_command(Command::Right);
        assert_eq!(selector.chosen(), 3);
        assert_abs_diff_eq!(selector.position.x, 202.0 + consts::TILE_WIDTH);
    }
}
