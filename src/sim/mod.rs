//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by tile ID, then hitbox order)
//! - No rendering or platform dependencies

pub mod course;
pub mod geometry;
pub mod layout;
pub mod remap;
pub mod side;
pub mod state;
pub mod tick;
pub mod tile;

pub use course::{Course, CourseError};
pub use geometry::{calc_new_velocity, collision_detect, side_of_world_collision};
pub use layout::{LayoutVariant, generate_layout};
pub use remap::{AxisMap, Transition, entry_position, remap};
pub use side::Side;
pub use state::{GameEvent, GamePhase, GameState, Outcome, Player, RoundEnd, Snapshot};
pub use tick::{TickInput, tick};
pub use tile::{Hitbox, HitboxList, HitboxOverflow, Tile, TileId};
