//! Tile sides
//!
//! Screen space has x growing right and y growing down, so TOP is -y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One edge of a tile, in the order the hardware numbers them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Left,
    Bottom,
    Right,
}

impl Side {
    /// All sides in slot order
    pub const ALL: [Side; 4] = [Side::Top, Side::Left, Side::Bottom, Side::Right];

    /// Neighbour slot index
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Left => 1,
            Side::Bottom => 2,
            Side::Right => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Top => Side::Bottom,
            Side::Left => Side::Right,
            Side::Bottom => Side::Top,
            Side::Right => Side::Left,
        }
    }

    /// Outward unit normal of this edge
    pub fn outward(self) -> Vec2 {
        match self {
            Side::Top => Vec2::new(0.0, -1.0),
            Side::Left => Vec2::new(-1.0, 0.0),
            Side::Bottom => Vec2::new(0.0, 1.0),
            Side::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// True for the two sides crossed by moving along x
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Left => "left",
            Side::Bottom => "bottom",
            Side::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
