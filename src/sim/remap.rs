//! Cross-tile remapping
//!
//! Neighbouring cubes can touch on any pair of sides, so the frame the player
//! lands in may be rotated against the one it left. Crossing from `exit` on
//! the old tile to `entry` on the new one rotates position and velocity by a
//! whole number of quarter turns, then pins the player just outside the entry
//! edge so it visibly slides in.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::side::Side;
use super::tile::TileId;
use crate::consts::TILE_SIZE;
use crate::settings::Physics;

/// How the two screen axes carry over into the new frame
///
/// Axes are swapped first, then mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMap {
    pub swap: bool,
    pub mirror_x: bool,
    pub mirror_y: bool,
}

impl AxisMap {
    /// Frames line up
    pub const PASS: Self = Self::new(false, false, false);
    /// Quarter turn clockwise on screen: (x, y) -> (-y, x)
    pub const QUARTER_CW: Self = Self::new(true, true, false);
    /// Half turn: (x, y) -> (-x, -y)
    pub const HALF: Self = Self::new(false, true, true);
    /// Quarter turn counter-clockwise on screen: (x, y) -> (y, -x)
    pub const QUARTER_CCW: Self = Self::new(true, false, true);

    pub const fn new(swap: bool, mirror_x: bool, mirror_y: bool) -> Self {
        Self {
            swap,
            mirror_x,
            mirror_y,
        }
    }

    /// Table entry for entering through `entry` after leaving through `exit`
    pub fn between(entry: Side, exit: Side) -> Self {
        use Side::*;
        match (entry, exit) {
            (Top, Top) => Self::HALF,
            (Top, Left) => Self::QUARTER_CCW,
            (Top, Bottom) => Self::PASS,
            (Top, Right) => Self::QUARTER_CW,

            (Left, Top) => Self::QUARTER_CW,
            (Left, Left) => Self::HALF,
            (Left, Bottom) => Self::QUARTER_CCW,
            (Left, Right) => Self::PASS,

            (Bottom, Top) => Self::PASS,
            (Bottom, Left) => Self::QUARTER_CW,
            (Bottom, Bottom) => Self::HALF,
            (Bottom, Right) => Self::QUARTER_CCW,

            (Right, Top) => Self::QUARTER_CCW,
            (Right, Left) => Self::PASS,
            (Right, Bottom) => Self::QUARTER_CW,
            (Right, Right) => Self::HALF,
        }
    }

    pub fn apply(self, v: Vec2) -> Vec2 {
        let v = if self.swap { Vec2::new(v.y, v.x) } else { v };
        Vec2::new(
            if self.mirror_x { -v.x } else { v.x },
            if self.mirror_y { -v.y } else { v.y },
        )
    }
}

/// A completed crossing, reported to the outside world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: TileId,
    pub to: TileId,
    pub exit: Side,
    pub entry: Side,
}

impl Transition {
    /// Direction of travel once inside the new tile
    #[inline]
    pub fn facing(&self) -> Side {
        self.entry.opposite()
    }
}

/// Re-entry coordinate on the axis normal to `entry`
pub fn entry_position(entry: Side, player_size: f32, entry_offset: f32) -> f32 {
    match entry {
        Side::Top | Side::Left => -entry_offset,
        Side::Bottom | Side::Right => TILE_SIZE - player_size + entry_offset,
    }
}

/// Carry position and velocity from the old tile's frame into the new one
///
/// `pos` is the top-left of the player box.
pub fn remap(pos: Vec2, vel: Vec2, exit: Side, entry: Side, physics: &Physics) -> (Vec2, Vec2) {
    let map = AxisMap::between(entry, exit);
    let half_tile = Vec2::splat(TILE_SIZE / 2.0);
    let half_player = Vec2::splat(physics.player_size / 2.0);

    // Rotate the box centre about the tile centre
    let centered = pos + half_player - half_tile;
    let mut new_pos = map.apply(centered) + half_tile - half_player;

    let edge = entry_position(entry, physics.player_size, physics.entry_offset);
    if entry.is_horizontal() {
        new_pos.x = edge;
    } else {
        new_pos.y = edge;
    }

    (new_pos, map.apply(vel))
}
