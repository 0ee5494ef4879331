//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One update pass per frame, fixed in-pass order
//! - Seeded RNG only
//! - Integer world units, no floats
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{Axis, Bounds, first_hit, move_and_resolve};
pub use rect::Rect;
pub use state::{
    Bottle, EntityKind, ExitDoor, Facing, GamePhase, GameState, Hud, Player, Splat, Virus, Wall,
};
pub use tick::{TickInput, tick};
