use crate::browser;
use crate::engine::input::Command;
use crate::engine::{Assets, Game, Point, Rect, Renderer, Size};
use crate::entity::{gem, overlaps, Enemy, Gem, Hud, Player, Selector, Verdict};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::mem;

/// Game tuning constants, in canvas pixel space. The play field is a
/// 5 x 6 grid of 101 x 83 tiles on a 505 x 605 canvas.
pub mod consts {
    use crate::engine::Point;

    pub const FIELD_WIDTH: f32 = 505.0;
    pub const FIELD_HEIGHT: f32 = 605.0;
    pub const TILE_WIDTH: f32 = 101.0;
    pub const TILE_HEIGHT: f32 = 83.0;
    pub const NUM_COLS: usize = 5;
    pub const NUM_ROWS: usize = 6;

    pub const MAX_ENEMIES: usize = 5;
    pub const MAX_HEALTH: i32 = 3;

    pub const PLAYER_SPAWN: Point = Point { x: 202.0, y: 405.0 };
    pub const PLAYER_MIN_Y: f32 = -10.0;
    // the bottom clamp keeps the feet art out of the score strip
    pub const PLAYER_MAX_Y: f32 = FIELD_HEIGHT - 200.0;
    pub const PLAYER_MAX_X: f32 = FIELD_WIDTH - TILE_WIDTH;

    pub const ENEMY_SPAWN_X: f32 = -TILE_WIDTH;
    pub const ENEMY_RESET_X: f32 = -100.0;
    /// seconds between spawner firings
    pub const ENEMY_SPAWN_INTERVAL: f32 = 1.4;

    pub const PLAYER_RESPAWN_DELAY: f32 = 1.0;
    pub const GEM_RESPAWN_DELAY: f32 = 0.1;
    /// pixels per second while a collected gem floats off
    pub const GEM_RISE_SPEED: f32 = 300.0;

    pub mod sprites {
        pub const BLOCK_STONE: &str = "images/stone-block.png";
        pub const BLOCK_WATER: &str = "images/water-block.png";
        pub const BLOCK_GRASS: &str = "images/grass-block.png";
        pub const GEM_GREEN: &str = "images/gem-green.png";
        pub const GEM_BLUE: &str = "images/gem-blue.png";
        pub const GEM_ORANGE: &str = "images/gem-orange.png";
        pub const ENEMY_BUG: &str = "images/enemy-bug.png";
        pub const CHAR_BOY: &str = "images/char-boy.png";
        pub const CHAR_PRINCESS: &str = "images/char-princess-girl.png";
        pub const CHAR_CAT_GIRL: &str = "images/char-cat-girl.png";
        pub const CHAR_HORN_GIRL: &str = "images/char-horn-girl.png";
        pub const CHAR_PINK_GIRL: &str = "images/char-pink-girl.png";
        pub const SELECTOR: &str = "images/Selector.png";
        pub const HEART: &str = "images/heart-filled.png";
    }

    pub const PLAYER_ROSTER: [&str; 5] = [
        sprites::CHAR_BOY,
        sprites::CHAR_PRINCESS,
        sprites::CHAR_CAT_GIRL,
        sprites::CHAR_HORN_GIRL,
        sprites::CHAR_PINK_GIRL,
    ];
}

const MANIFEST_PATH: &str = "assets.json";

// background rows, top to bottom : one water row, the three bug rows, two
// grass rows where the player is safe
const FIELD_ROWS: [&str; consts::NUM_ROWS] = [
    consts::sprites::BLOCK_WATER,
    consts::sprites::BLOCK_STONE,
    consts::sprites::BLOCK_STONE,
    consts::sprites::BLOCK_STONE,
    consts::sprites::BLOCK_GRASS,
    consts::sprites::BLOCK_GRASS,
];

/// Everything the page must fetch before the first frame
#[derive(Debug, Deserialize, Serialize, Clone)]
struct Manifest {
    sprites: Vec<String>,
}

/// TABLE
/// ┌────────────────────── Game Architecture Overview ───────────────────────┐
/// │                                                                         │
/// │   ┌─────────────┐  commands   ┌─────────────┐   routes   ┌───────────┐  │
/// │   │  engine.rs  ├────────────►│   game.rs   ├───────────►│  entity/  │  │
/// │   │  GameLoop   │  update(dt) │    World    │ update(dt) │  Player   │  │
/// │   │  draw()     ├────────────►│    Mode     ├───────────►│  Enemy .. │  │
/// │   └─────────────┘             └─────────────┘            └───────────┘  │
/// │                                                                         │
/// ├─────────────────────────── Mode Flow ───────────────────────────────────┤
/// │                                                                         │
/// │   Choosing ──Enter──► Playing ──health 0──► GameOver ──any key──┐       │
/// │      ▲                                                          │       │
/// │      └──────────────────────────────────────────────────────────┘       │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
pub enum GemCrossing {
    /// Initialize state while resources are being loaded
    /// Transition to `Loaded` once initialization is complete
    Loading,

    /// Active game with every sprite pre-loaded
    Loaded { world: World, assets: Assets },
}

impl GemCrossing {
    pub fn new() -> Self {
        GemCrossing::Loading
    }

    async fn load_manifest() -> Result<Manifest> {
        browser::fetch_json::<Manifest>(MANIFEST_PATH)
            .await
            .with_context(|| format!("Failed to load asset manifest from : {}", MANIFEST_PATH))
    }
}

impl Default for GemCrossing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Game for GemCrossing {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            GemCrossing::Loading => {
                let manifest = Self::load_manifest().await?;
                let assets = Assets::load(&manifest.sprites).await?;
                log!(
                    "Gem Crossing ready : {} sprites pre-loaded",
                    manifest.sprites.len()
                );

                // the page-load clock is as good a seed as any for gem and
                // bug placement
                let world = World::new(browser::now()? as u64);
                Ok(Box::new(GemCrossing::Loaded { world, assets }))
            }
            GemCrossing::Loaded { .. } => Err(anyhow!("Game is already initialized")),
        }
    }

    fn handle_command(&mut self, command: Command) {
        if let GemCrossing::Loaded { world, .. } = self {
            world.handle_command(command);
        }
    }

    fn update(&mut self, dt: f32) {
        if let GemCrossing::Loaded { world, .. } = self {
            world.update(dt);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let GemCrossing::Loaded { world, assets } = self {
            world.draw(renderer, assets);
        }
    }
}

/// Which screen owns the input right now. Exactly one mode is ever live and
/// each mode owns the entities it needs, so a stale reference into a
/// finished round cannot exist.
enum Mode {
    Choosing(Selector),
    Playing(Session),
    GameOver(Session),
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Choosing(Selector::new())
    }
}

/// One round of play. Built fresh on every Enter from the character screen
/// and carried into GameOver so the final field stays on screen behind the
/// banner.
struct Session {
    player: Player,
    enemies: Vec<Enemy>,
    gem: Gem,
    hud: Hud,
    /// countdown to the next enemy spawn; None once the population cap is
    /// reached, and it never rearms because enemies are pooled
    spawner: Option<f32>,
}

impl Session {
    /// The parts of a tick that keep running even after the round ends :
    /// bugs march (and wrap) and the spawner fills the pool.
    fn advance_hazards(&mut self, dt: f32, rng: &mut Pcg32) {
        if let Some(remaining) = &mut self.spawner {
            *remaining -= dt;
            if *remaining <= 0.0 {
                if self.enemies.len() < consts::MAX_ENEMIES {
                    self.enemies.push(spawn_enemy(rng));
                    *remaining += consts::ENEMY_SPAWN_INTERVAL;
                } else {
                    self.spawner = None;
                }
            }
        }

        for enemy in &mut self.enemies {
            enemy.update(dt);
            if enemy.past_right_edge() {
                enemy.reset();
            }
        }
    }

    /// A full Playing tick. Returns the HUD's verdict so the world can
    /// latch the game-over transition.
    fn tick(
        &mut self,
        dt: f32,
        rng: &mut Pcg32,
        schedule: &mut schedule::Queue,
        generation: u64,
    ) -> Verdict {
        self.advance_hazards(dt, rng);

        // bug contact : bench the player and queue the comeback. The first
        // hit turns the player's collisions off, so a second bug on the
        // same frame cannot double the damage.
        for enemy in &self.enemies {
            if overlaps(enemy.body(), self.player.body()) {
                self.player.take_damage();
                self.hud.change_health(-1);
                schedule.push(
                    consts::PLAYER_RESPAWN_DELAY,
                    generation,
                    schedule::Action::RespawnPlayer,
                );
            }
        }

        if let Some(value) = self.gem.update(dt, &self.player) {
            self.hud.change_score(value);
            schedule.push(
                consts::GEM_RESPAWN_DELAY,
                generation,
                schedule::Action::SpawnGem,
            );
        }

        self.hud.update()
    }

    /// GameOver tick : the world stays animated behind the banner but no
    /// input, damage, or scoring happens.
    fn tick_ambient(&mut self, dt: f32, rng: &mut Pcg32) {
        self.advance_hazards(dt, rng);
        self.gem.animate(dt);
    }

    fn draw(&self, renderer: &Renderer, assets: &Assets, game_over: bool) {
        draw_field(renderer, assets);
        self.gem.draw(renderer, assets);
        for enemy in &self.enemies {
            enemy.draw(renderer, assets);
        }
        self.player.draw(renderer, assets);
        self.hud.draw(renderer, assets, game_over);
    }
}

/// The whole mutable game : current mode, the timed-event queue, and the
/// placement RNG. Owned by the frame driver through GemCrossing; nothing
/// here lives in a global.
pub struct World {
    mode: Mode,
    schedule: schedule::Queue,
    /// bumped for every new Session; scheduled events carry the value they
    /// were queued under so leftovers from a replaced round no-op
    generation: u64,
    rng: Pcg32,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self {
            mode: Mode::default(),
            schedule: schedule::Queue::new(),
            generation: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Route one input command to whoever owns the current mode. The match
    /// is exhaustive over Mode, so an unknown-state branch cannot exist to
    /// need an error path.
    pub fn handle_command(&mut self, command: Command) {
        match &mut self.mode {
            Mode::Choosing(selector) => {
                if let Some(sprite) = selector.handle_command(command) {
                    let session = self.start_session(sprite);
                    self.mode = Mode::Playing(session);
                }
            }

            Mode::Playing(session) => session.player.handle_command(command),

            // any key leaves the banner for a fresh character screen
            Mode::GameOver(_) => {
                self.mode = Mode::Choosing(Selector::new());
            }
        }
    }

    /// One fixed simulation step : fire due scheduled events, then tick
    /// whichever mode is live, then latch GameOver if the HUD says so.
    pub fn update(&mut self, dt: f32) {
        for fired in self.schedule.advance(dt) {
            self.apply(fired);
        }

        let verdict = match &mut self.mode {
            Mode::Choosing(_) => Verdict::Alive,
            Mode::Playing(session) => {
                session.tick(dt, &mut self.rng, &mut self.schedule, self.generation)
            }
            Mode::GameOver(session) => {
                session.tick_ambient(dt, &mut self.rng);
                Verdict::Alive
            }
        };

        if verdict == Verdict::GameOver {
            // one-way : only an explicit restart leaves GameOver
            self.mode = match mem::take(&mut self.mode) {
                Mode::Playing(session) => Mode::GameOver(session),
                other => other,
            };
        }
    }

    pub fn draw(&self, renderer: &Renderer, assets: &Assets) {
        renderer.clear(&Rect::new(
            Point { x: 0.0, y: 0.0 },
            Size {
                width: consts::FIELD_WIDTH,
                height: consts::FIELD_HEIGHT,
            },
        ));

        match &self.mode {
            Mode::Choosing(selector) => selector.draw(renderer, assets),
            Mode::Playing(session) => session.draw(renderer, assets, false),
            Mode::GameOver(session) => session.draw(renderer, assets, true),
        }
    }

    fn start_session(&mut self, sprite: &'static str) -> Session {
        self.generation += 1;
        Session {
            player: Player::new(sprite),
            enemies: Vec::new(),
            gem: spawn_gem(&mut self.rng),
            hud: Hud::new(),
            spawner: Some(consts::ENEMY_SPAWN_INTERVAL),
        }
    }

    /// Deliver one due scheduled event to the session it was queued for.
    /// Events outliving their round are dropped here, which is the whole
    /// point of the generation tag.
    fn apply(&mut self, fired: schedule::Fired) {
        if fired.generation != self.generation {
            log!("Dropping stale scheduled event : {:?}", fired.action);
            return;
        }

        let session = match &mut self.mode {
            Mode::Playing(session) | Mode::GameOver(session) => session,
            // the round ended and its session is gone; nothing to deliver to
            Mode::Choosing(_) => return,
        };

        match fired.action {
            schedule::Action::RespawnPlayer => session.player.respawn(),
            schedule::Action::SpawnGem => session.gem = spawn_gem(&mut self.rng),
        }
    }
}

fn spawn_gem(rng: &mut Pcg32) -> Gem {
    let col = rng.gen_range(0..consts::NUM_COLS) as f32;
    let row = rng.gen_range(0..consts::NUM_ROWS) as f32;
    let kind = &gem::KINDS[rng.gen_range(0..gem::KINDS.len())];

    Gem::new(
        Point {
            x: col * consts::TILE_WIDTH,
            y: row * consts::TILE_HEIGHT,
        },
        kind,
    )
}

fn spawn_enemy(rng: &mut Pcg32) -> Enemy {
    // one of the three stone rows, nudged up so the bug sits on the tile
    let row = rng.gen_range(1..=3) as f32;

    Enemy::new(
        Point {
            x: consts::ENEMY_SPAWN_X,
            y: row * consts::TILE_HEIGHT - 20.0,
        },
        rng.gen_range(50.0..200.0),
    )
}

fn draw_field(renderer: &Renderer, assets: &Assets) {
    for (row, sprite) in FIELD_ROWS.iter().enumerate() {
        let image = assets
            .get(sprite)
            .expect("Sprite was not pre-loaded! Unrecoverable error");
        for col in 0..consts::NUM_COLS {
            renderer.draw_image(
                image,
                &Point {
                    x: col as f32 * consts::TILE_WIDTH,
                    y: row as f32 * consts::TILE_HEIGHT,
                },
            );
        }
    }
}

/// One-shot timed events, processed once per tick. This replaces ambient
/// timers : a delay is data in the world, it advances only when the world
/// does, and it carries the generation of the round that queued it.
mod schedule {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Action {
        RespawnPlayer,
        SpawnGem,
    }

    /// An event whose delay has elapsed, ready to deliver
    #[derive(Debug, Clone, Copy)]
    pub struct Fired {
        pub generation: u64,
        pub action: Action,
    }

    #[derive(Debug, Clone, Copy)]
    struct Entry {
        remaining: f32,
        generation: u64,
        action: Action,
    }

    #[derive(Debug, Default)]
    pub struct Queue {
        entries: Vec<Entry>,
    }

    impl Queue {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&mut self, delay: f32, generation: u64, action: Action) {
            self.entries.push(Entry {
                remaining: delay,
                generation,
                action,
            });
        }

        /// Age every entry by dt and hand back the ones that came due, in
        /// the order they were queued
        pub fn advance(&mut self, dt: f32) -> Vec<Fired> {
            let mut due = Vec::new();
            self.entries.retain_mut(|entry| {
                entry.remaining -= dt;
                if entry.remaining <= 0.0 {
                    due.push(Fired {
                        generation: entry.generation,
                        action: entry.action,
                    });
                    false
                } else {
                    true
                }
            });
            due
        }

        #[cfg(test)]
        pub fn len(&self) -> usize {
            self.entries.len()
        }
    }

}
