use super::{overlaps, Body, Hitbox, Player};
use crate::engine::{Assets, Point, Renderer};
use crate::game::consts;

const HITBOX: Hitbox = Hitbox::new(18.0, 52.0, 66.0, 75.0);

/// The three gem colors and what they pay out
#[derive(Debug, Clone, Copy)]
pub struct GemKind {
    pub sprite: &'static str,
    pub value: u32,
}

pub const KINDS: [GemKind; 3] = [
    GemKind {
        sprite: consts::sprites::GEM_GREEN,
        value: 10,
    },
    GemKind {
        sprite: consts::sprites::GEM_BLUE,
        value: 50,
    },
    GemKind {
        sprite: consts::sprites::GEM_ORANGE,
        value: 100,
    },
];

/// A collectible. One live gem at a time : picking it up benches its hitbox
/// immediately (so the payout can never double) and starts an upward exit
/// animation while the world schedules the replacement. The collected
/// instance simply floats away until the new one lands in its slot.
#[derive(Debug, Clone)]
pub struct Gem {
    body: Body,
    value: u32,
    collected: bool,
}

impl Gem {
    pub fn new(position: Point, kind: &GemKind) -> Self {
        Self {
            body: Body::new(position, kind.sprite, HITBOX),
            value: kind.value,
            collected: false,
        }
    }

    /// Per-frame behavior : float away once collected, otherwise see if the
    /// player is on us. Returns the score to award, exactly once per gem.
    pub fn update(&mut self, dt: f32, player: &Player) -> Option<u32> {
        self.animate(dt);
        self.try_collect(player)
    }

    /// Exit animation only, no collection. This is all that keeps running
    /// once the round is over.
    pub fn animate(&mut self, dt: f32) {
        if self.collected {
            self.body.position.y -= consts::GEM_RISE_SPEED * dt;
        }
    }

    fn try_collect(&mut self, player: &Player) -> Option<u32> {
        if overlaps(&self.body, player.body()) {
            self.body.collisions = false;
            self.collected = true;
            return Some(self.value);
        }

        None
    }

    pub fn collected(&self) -> bool {
        self.collected
    }

    pub fn position(&self) -> &Point {
        &self.body.position
    }

    pub fn draw(&self, renderer: &Renderer, assets: &Assets) {
        self.body.draw(renderer, assets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::Command;
    use approx::assert_abs_diff_eq;

    const DT: f32 = 1.0 / 60.0;

    fn gem_on_spawn_tile() -> Gem {
        // column 2, row 4 puts the gem's box square on the player spawn
        Gem::new(Point { x: 202.0, y: 405.0 }, &KINDS[1])
    }

    #[test]
    fn collection_pays_out_exactly_once() {
        let player = Player::new(consts::PLAYER_ROSTER[0]);
        let mut gem = gem_on_spawn_tile();

        assert_eq!(gem.update(DT, &player), Some(50));
        assert!(gem.collected());

        // the player is still standing on it next frame
        assert_eq!(gem.update(DT, &player), None);
        assert_eq!(gem.update(DT, &player), None);
    }

    #[test]
    fn no_payout_without_overlap() {
        let mut player = Player::new(consts::PLAYER_ROSTER[0]);
        player.handle_command(Command::Up);
        player.handle_command(Command::Up);

        let mut gem = gem_on_spawn_tile();
        assert_eq!(gem.update(DT, &player), None);
        assert!(!gem.collected());
    }

    #[test]
    fn benched_player_cannot_collect() {
        let mut player = Player::new(consts::PLAYER_ROSTER[0]);
        player.take_damage();

        let mut gem = gem_on_spawn_tile();
        assert_eq!(gem.update(DT, &player), None);
        assert!(!gem.collected());
    }

    #[test]
    fn collected_gem_floats_upward() {
        let player = Player::new(consts::PLAYER_ROSTER[0]);
        let mut gem = gem_on_spawn_tile();
        gem.update(DT, &player);

        let before = gem.position().y;
        gem.animate(DT);
        assert_abs_diff_eq!(
            gem.position().y,
            before - consts::GEM_RISE_SPEED * DT,
            epsilon = 1e-4
        );
    }

    #[test]
    fn uncollected_gem_holds_still() {
        let mut gem = gem_on_spawn_tile();
        let before = gem.position().y;

        gem.animate(DT);
        assert_abs_diff_eq!(gem.position().y, before);
    }
}
