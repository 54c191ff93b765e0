//! Snowboard - tilt-driven snowboarding across neighbouring cube displays
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, tiles, transitions, game state)
//! - `settings`: Tunable physics and course generation parameters
//! - `timer`: Wall-clock round timer for display

pub mod settings;
pub mod sim;
pub mod timer;

pub use settings::{CourseSettings, Physics, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz physics clock)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Edge length of a tile's screen in pixels
    pub const TILE_SIZE: f32 = 128.0;
    /// Maximum number of tiles a course can hold
    pub const TILE_ALLOCATION: usize = 12;
    /// Hitboxes per tile
    pub const MAX_HITBOXES: usize = 8;

    /// Standard gravity, scaled onto the tilt direction
    pub const GRAVITY: f32 = 9.806;
    /// Velocity multiplier applied every tick
    pub const DAMPING: f32 = 0.95;
    /// Tilt components inside [-NOISE_BAND, NOISE_BAND] count as a flat device
    pub const NOISE_BAND: f32 = 1.0;

    /// Player sprite extent (square)
    pub const PLAYER_SIZE: f32 = 32.0;
    /// Shrinks the player box on each side for hitbox tests
    pub const PLAYER_INSET: f32 = 4.0;
    /// How far off-tile the player re-appears after crossing an edge
    pub const ENTRY_OFFSET: f32 = 10.0;
    /// Top-left of the player box at the start of a round
    pub const START_POS: (f32, f32) = (48.0, 8.0);

    /// Width of the lane walls on either side of a course segment
    pub const WALL_THICKNESS: f32 = 16.0;
    /// Edge length of a rock obstacle
    pub const ROCK_SIZE: f32 = 16.0;
}
