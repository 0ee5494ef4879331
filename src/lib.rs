//! Viral Breakout - a single-screen grid arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `levels`: Level grid loading from JSON files
//! - `theme`: Sprite theme discovery and validation

pub mod levels;
pub mod sim;
pub mod theme;

pub use sim::{GamePhase, GameState, TickInput, tick};

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Screen dimensions in world units
    pub const SCREEN_WIDTH: i32 = 800;
    pub const SCREEN_HEIGHT: i32 = 608;
    /// Side length of every sprite and grid cell
    pub const SPRITE_SIZE: i32 = 32;

    /// Fixed simulation rate; one tick per rendered frame
    pub const TICKS_PER_SECOND: u64 = 60;

    /// Charges granted per antibac bottle
    pub const CHARGES_PER_BOTTLE: u32 = 5;
    /// Virus population: base count plus per-level growth
    pub const START_VIRUSES: usize = 5;
    pub const VIRUSES_PER_LEVEL: usize = 3;
    /// Per-axis virus speed magnitude range (inclusive)
    pub const VIRUS_MIN_SPEED: i32 = 1;
    pub const VIRUS_MAX_SPEED: i32 = 5;
    /// Player speed per axis
    pub const PLAYER_SPEED: i32 = 3;

    /// Placement attempts per virus before it is skipped
    pub const SPAWN_ATTEMPTS: u32 = 100;
    /// Lethal overlaps are ignored for this long after level entry
    pub const INVINCIBILITY_TICKS: u64 = 120;
}

/// Convert a grid cell coordinate to its world rectangle origin
#[inline]
pub fn cell_to_world(cell: IVec2) -> IVec2 {
    cell * consts::SPRITE_SIZE
}

/// Convert a world position to the nearest grid cell coordinate
#[inline]
pub fn world_to_cell(pos: IVec2) -> IVec2 {
    let half = consts::SPRITE_SIZE / 2;
    IVec2::new(
        (pos.x + half).div_euclid(consts::SPRITE_SIZE),
        (pos.y + half).div_euclid(consts::SPRITE_SIZE),
    )
}
