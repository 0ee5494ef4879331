//! Entity model and the world aggregate
//!
//! All run state lives in `GameState`: the six entity groups, the singular
//! player, level progression and the phase machine. Level (re)entry is
//! seeded from the run seed and the level number, so re-entering a level
//! reproduces virus placement exactly.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Bounds;
use super::rect::Rect;
use crate::consts::*;
use crate::levels::{self, Grid};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Lethal contact; only an explicit restart leaves this state
    GameOver,
    /// All levels cleared; only an explicit restart leaves this state
    Finished,
}

/// The six drawable entity kinds, named after their theme assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Antibac,
    Bottle,
    Exit,
    Player,
    Virus,
    Wall,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Antibac,
        EntityKind::Bottle,
        EntityKind::Exit,
        EntityKind::Player,
        EntityKind::Virus,
        EntityKind::Wall,
    ];

    /// Theme asset stem for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Antibac => "antibac",
            EntityKind::Bottle => "bottle",
            EntityKind::Exit => "exit",
            EntityKind::Player => "player",
            EntityKind::Virus => "virus",
            EntityKind::Wall => "wall",
        }
    }
}

/// Direction the player last moved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Unit cell offset for this direction
    pub fn delta(&self) -> IVec2 {
        match self {
            Facing::Up => IVec2::new(0, -1),
            Facing::Down => IVec2::new(0, 1),
            Facing::Left => IVec2::new(-1, 0),
            Facing::Right => IVec2::new(1, 0),
        }
    }
}

/// A static wall segment, one grid cell in size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
}

/// A bottle of antibac charges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bottle {
    pub rect: Rect,
}

/// The level exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitDoor {
    pub rect: Rect,
}

/// A placed antibac splat, lethal to viruses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Splat {
    pub rect: Rect,
}

/// A free-roaming virus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Virus {
    pub rect: Rect,
    pub vel: IVec2,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub vel: IVec2,
    /// Antibac charges available for placement
    pub antibac_count: u32,
    /// A wall picked up off the grid; excluded from collision until dropped
    pub held_wall: Option<Wall>,
    pub facing: Facing,
    /// Lethal overlaps are ignored while `time_ticks` is below this
    pub invincible_until: u64,
}

impl Player {
    fn new() -> Self {
        Self {
            rect: Rect::new(64, 32, SPRITE_SIZE, SPRITE_SIZE),
            vel: IVec2::ZERO,
            antibac_count: 0,
            held_wall: None,
            facing: Facing::default(),
            invincible_until: 0,
        }
    }

    /// Reset mutable state on level entry; the rect is only moved by a
    /// player-start cell in the grid scan.
    fn reset(&mut self, now: u64) {
        self.vel = IVec2::ZERO;
        self.antibac_count = 0;
        self.held_wall = None;
        self.facing = Facing::default();
        self.invincible_until = now + INVINCIBILITY_TICKS;
    }
}

macro_rules! impl_bounds {
    ($($ty:ty),*) => {
        $(impl Bounds for $ty {
            fn bounds(&self) -> Rect {
                self.rect
            }
        })*
    };
}

impl_bounds!(Wall, Bottle, ExitDoor, Splat, Virus, Player);

/// Scalar state exposed for HUD text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub antibac_count: u32,
    pub elapsed_secs: u64,
    pub game_over: bool,
    pub finished: bool,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// 0-indexed into `levels`; advancing past the end finishes the run
    pub level_number: usize,
    pub levels: Vec<Grid>,
    /// Monotonic tick counter for the whole run
    pub time_ticks: u64,
    /// Ticks spent in the current level; frozen outside `Playing`
    pub level_ticks: u64,
    pub player: Player,
    pub viruses: Vec<Virus>,
    pub splats: Vec<Splat>,
    pub walls: Vec<Wall>,
    pub bottles: Vec<Bottle>,
    pub exits: Vec<ExitDoor>,
}

impl GameState {
    /// Create a run over the given level sequence and enter level 0
    pub fn new(seed: u64, levels: Vec<Grid>) -> Self {
        let mut state = Self {
            seed,
            phase: GamePhase::Playing,
            level_number: 0,
            levels,
            time_ticks: 0,
            level_ticks: 0,
            player: Player::new(),
            viruses: Vec::new(),
            splats: Vec::new(),
            walls: Vec::new(),
            bottles: Vec::new(),
            exits: Vec::new(),
        };
        state.enter_level();
        state
    }

    /// Whether lethal overlaps are currently ignored
    pub fn is_invincible(&self) -> bool {
        self.time_ticks < self.player.invincible_until
    }

    /// Elapsed level time in whole seconds
    pub fn elapsed_secs(&self) -> u64 {
        self.level_ticks / TICKS_PER_SECOND
    }

    /// RNG for the current level, derived from the run seed so that
    /// re-entering the same level reproduces placement exactly
    fn level_rng(&self) -> Pcg32 {
        let mix = (self.level_number as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Pcg32::seed_from_u64(self.seed ^ mix)
    }

    /// (Re)initialize entity state for `level_number`, or finish the run.
    ///
    /// Clears every non-player group; when the level exists, resets the
    /// player, instantiates the grid and spawns the virus population.
    pub fn enter_level(&mut self) {
        self.viruses.clear();
        self.splats.clear();
        self.walls.clear();
        self.bottles.clear();
        self.exits.clear();

        if self.level_number >= self.levels.len() {
            self.phase = GamePhase::Finished;
            log::info!("all {} levels cleared", self.levels.len());
            return;
        }

        self.phase = GamePhase::Playing;
        self.level_ticks = 0;
        self.player.reset(self.time_ticks);

        // Row-major grid scan; a later player-start cell overrides an
        // earlier one.
        let grid = &self.levels[self.level_number];
        for (y, row) in grid.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let rect = Rect::new(
                    x as i32 * SPRITE_SIZE,
                    y as i32 * SPRITE_SIZE,
                    SPRITE_SIZE,
                    SPRITE_SIZE,
                );
                match code {
                    levels::CELL_WALL => self.walls.push(Wall { rect }),
                    levels::CELL_BOTTLE => self.bottles.push(Bottle { rect }),
                    levels::CELL_PLAYER_START => {
                        self.player.rect.x = rect.x;
                        self.player.rect.y = rect.y;
                    }
                    levels::CELL_EXIT => self.exits.push(ExitDoor { rect }),
                    _ => {}
                }
            }
        }

        self.spawn_viruses();
        log::info!(
            "entered level {} ({} walls, {} bottles, {} viruses)",
            self.level_number,
            self.walls.len(),
            self.bottles.len(),
            self.viruses.len()
        );
    }

    /// Reset progression to level 0; the only exit from GameOver/Finished
    pub fn restart(&mut self) {
        log::info!("restart requested");
        self.level_number = 0;
        self.enter_level();
    }

    /// Spawn the level's virus population at random open positions.
    ///
    /// Each virus samples up to `SPAWN_ATTEMPTS` positions fully inside the
    /// screen, rejecting any that overlap the player or a wall; exhausting
    /// the attempts skips that virus.
    fn spawn_viruses(&mut self) {
        let mut rng = self.level_rng();
        let count = START_VIRUSES + self.level_number * VIRUSES_PER_LEVEL;

        for _ in 0..count {
            let mut placed = false;
            for _ in 0..SPAWN_ATTEMPTS {
                let rect = Rect::new(
                    rng.random_range(0..=SCREEN_WIDTH - SPRITE_SIZE),
                    rng.random_range(0..=SCREEN_HEIGHT - SPRITE_SIZE),
                    SPRITE_SIZE,
                    SPRITE_SIZE,
                );
                if rect.overlaps(&self.player.rect)
                    || self.walls.iter().any(|w| rect.overlaps(&w.rect))
                {
                    continue;
                }

                let vel = IVec2::new(random_axis_speed(&mut rng), random_axis_speed(&mut rng));
                self.viruses.push(Virus { rect, vel });
                placed = true;
                break;
            }
            if !placed {
                log::debug!("no open position for virus after {SPAWN_ATTEMPTS} attempts, skipping");
            }
        }
    }

    /// Scalar HUD snapshot
    pub fn hud(&self) -> Hud {
        Hud {
            antibac_count: self.player.antibac_count,
            elapsed_secs: self.elapsed_secs(),
            game_over: self.phase == GamePhase::GameOver,
            finished: self.phase == GamePhase::Finished,
        }
    }

    /// Every live entity as a rect + drawable-kind pair, in draw order
    /// (viruses under the player, walls on top)
    pub fn draw_list(&self) -> Vec<(Rect, EntityKind)> {
        let mut list = Vec::with_capacity(
            self.viruses.len()
                + self.splats.len()
                + self.exits.len()
                + self.bottles.len()
                + self.walls.len()
                + 2,
        );
        list.extend(self.viruses.iter().map(|v| (v.rect, EntityKind::Virus)));
        list.push((self.player.rect, EntityKind::Player));
        if let Some(held) = &self.player.held_wall {
            list.push((held.rect, EntityKind::Wall));
        }
        list.extend(self.splats.iter().map(|s| (s.rect, EntityKind::Antibac)));
        list.extend(self.exits.iter().map(|e| (e.rect, EntityKind::Exit)));
        list.extend(self.bottles.iter().map(|b| (b.rect, EntityKind::Bottle)));
        list.extend(self.walls.iter().map(|w| (w.rect, EntityKind::Wall)));
        list
    }
}

/// Random per-axis velocity: magnitude in the configured range, random sign
fn random_axis_speed(rng: &mut Pcg32) -> i32 {
    let magnitude = rng.random_range(VIRUS_MIN_SPEED..=VIRUS_MAX_SPEED);
    if rng.random::<bool>() { magnitude } else { -magnitude }
}
