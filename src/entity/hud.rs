use crate::engine::{Assets, Point, Rect, Renderer, Size};
use crate::game::consts;

/// What the health check concluded this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Alive,
    GameOver,
}

/// Score and health for one round. Not a world entity : no position, no
/// hitbox, it only accumulates numbers and paints the overlay.
#[derive(Debug, Clone)]
pub struct Hud {
    score: u32,
    health: i32,
}

impl Hud {
    pub fn new() -> Self {
        Self {
            score: 0,
            health: consts::MAX_HEALTH,
        }
    }

    /// Score only ever grows
    pub fn change_score(&mut self, value: u32) {
        self.score = self.score.saturating_add(value);
    }

    /// Health moves by signed deltas but can never leave [0, MAX_HEALTH]
    pub fn change_health(&mut self, delta: i32) {
        self.health = (self.health + delta).clamp(0, consts::MAX_HEALTH);
    }

    /// The round ends the tick health bottoms out. The world latches the
    /// transition; this check stays a pure read.
    pub fn update(&self) -> Verdict {
        if self.health == 0 {
            Verdict::GameOver
        } else {
            Verdict::Alive
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn draw(&self, renderer: &Renderer, assets: &Assets, game_over: bool) {
        renderer.fill_text(
            &format!("{:06}", self.score),
            &Point { x: 2.0, y: 40.0 },
            "20pt sans-serif",
            "black",
        );

        let heart = assets
            .get(consts::sprites::HEART)
            .expect("Sprite was not pre-loaded! Unrecoverable error");
        for i in 0..self.health {
            renderer.draw_image(
                heart,
                &Point {
                    x: 410.0 + 30.0 * i as f32,
                    y: 18.0,
                },
            );
        }

        if game_over {
            self.draw_game_over_banner(renderer);
        }
    }

    fn draw_game_over_banner(&self, renderer: &Renderer) {
        renderer.fill_rect_with_alpha(
            &Rect::new(
                Point { x: 30.0, y: 180.0 },
                Size {
                    width: consts::FIELD_WIDTH - 60.0,
                    height: 140.0,
                },
            ),
            "black",
            0.7,
        );

        renderer.set_text_align("center");
        renderer.fill_text(
            "GAME OVER",
            &Point {
                x: consts::FIELD_WIDTH / 2.0,
                y: 250.0,
            },
            "50pt sans-serif",
            "white",
        );
        renderer.fill_text(
            "Press any key to try again",
            &Point {
                x: consts::FIELD_WIDTH / 2.0,
                y: 290.0,
            },
            "14pt sans-serif",
            "white",
        );
        renderer.set_text_align("start");
    }
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_hud_has_no_score_and_full_health() {
        let hud = Hud::new();

        assert_eq!(hud.score(), 0);
        assert_eq!(hud.health(), consts::MAX_HEALTH);
        assert_eq!(hud.update(), Verdict::Alive);
    }

    #[test]
    fn score_accumulates() {
        let mut hud = Hud::new();

        hud.change_score(10);
        hud.change_score(100);
        assert_eq!(hud.score(), 110);
    }

    #[test]
    fn score_saturates_instead_of_wrapping() {
        let mut hud = Hud::new();

        hud.change_score(u32::MAX);
        hud.change_score(50);
        assert_eq!(hud.score(), u32::MAX);
    }

    #[test]
    fn health_never_goes_negative() {
        let mut hud = Hud::new();

        for _ in 0..10 {
            hud.change_health(-1);
        }
        assert_eq!(hud.health(), 0);
    }

    #[test]
    fn health_caps_at_the_maximum() {
        let mut hud = Hud::new();

        hud.change_health(5);
        assert_eq!(hud.health(), consts::MAX_HEALTH);
    }

    #[test]
    fn verdict_flips_exactly_at_zero_health() {
        let mut hud = Hud::new();

        hud.change_health(-(consts::MAX_HEALTH - 1));
        assert_eq!(hud.update(), Verdict::Alive);

        hud.change_health(-1);
        assert_eq!(hud.update(), Verdict::GameOver);
    }
}
