//! Tiles and their hitboxes
//!
//! A tile is one cube's 128x128 screen. It knows which tile sits against each
//! of its edges and carries the obstacles of the course segment it shows.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::geometry::collision_detect;
use super::remap::AxisMap;
use super::side::Side;
use crate::consts::{MAX_HITBOXES, TILE_SIZE};

/// Cube identifier, as handed out by the pairing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u8);

impl TileId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned obstacle or goal region in tile-local pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub origin: Vec2,
    pub size: Vec2,
    /// Goal region rather than an obstacle
    pub win: bool,
}

impl Hitbox {
    pub fn obstacle(origin: Vec2, size: Vec2) -> Self {
        Self {
            origin,
            size,
            win: false,
        }
    }

    pub fn goal(origin: Vec2, size: Vec2) -> Self {
        Self {
            origin,
            size,
            win: true,
        }
    }

    #[inline]
    pub fn overlaps(&self, origin: Vec2, size: Vec2) -> bool {
        collision_detect(origin, size, self.origin, self.size)
    }

    /// Same region turned about the tile centre
    pub fn rotated(self, map: AxisMap) -> Self {
        let half_tile = Vec2::splat(TILE_SIZE / 2.0);
        let a = map.apply(self.origin - half_tile);
        let b = map.apply(self.origin + self.size - half_tile);
        Self {
            origin: a.min(b) + half_tile,
            size: (a - b).abs(),
            win: self.win,
        }
    }
}

/// Pushing past the per-tile hitbox capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitboxOverflow {
    pub capacity: usize,
}

impl std::fmt::Display for HitboxOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hitbox list full ({} entries)", self.capacity)
    }
}

impl std::error::Error for HitboxOverflow {}

/// Bounded hitbox list; overflow is an error, never a silent drop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitboxList {
    entries: Vec<Hitbox>,
}

impl HitboxList {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_HITBOXES),
        }
    }

    pub fn push(&mut self, hitbox: Hitbox) -> Result<(), HitboxOverflow> {
        if self.entries.len() >= MAX_HITBOXES {
            return Err(HitboxOverflow {
                capacity: MAX_HITBOXES,
            });
        }
        self.entries.push(hitbox);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hitbox> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Hitbox] {
        &self.entries
    }

    /// First hitbox (in list order) touching the given box
    pub fn first_hit(&self, origin: Vec2, size: Vec2) -> Option<&Hitbox> {
        self.entries.iter().find(|h| h.overlaps(origin, size))
    }

    pub fn map_in_place(&mut self, mut f: impl FnMut(Hitbox) -> Hitbox) {
        for h in &mut self.entries {
            *h = f(*h);
        }
    }
}

impl<'a> IntoIterator for &'a HitboxList {
    type Item = &'a Hitbox;
    type IntoIter = std::slice::Iter<'a, Hitbox>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One cube in the course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    /// Neighbour per side, indexed by `Side::index`
    neighbors: [Option<TileId>; 4],
    pub hitboxes: HitboxList,
    /// Edge the current layout is laid out to be entered from
    pub entry: Side,
    /// Latest accelerometer reading
    pub accel: Vec3,
}

impl Tile {
    pub fn new(id: TileId) -> Self {
        Self {
            id,
            neighbors: [None; 4],
            hitboxes: HitboxList::new(),
            entry: Side::Top,
            accel: Vec3::ZERO,
        }
    }

    #[inline]
    pub fn neighbor(&self, side: Side) -> Option<TileId> {
        self.neighbors[side.index()]
    }

    pub(crate) fn set_neighbor(&mut self, side: Side, neighbor: Option<TileId>) {
        self.neighbors[side.index()] = neighbor;
    }

    /// Side on which `other` is attached, if it is
    pub fn side_of(&self, other: TileId) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|&side| self.neighbor(side) == Some(other))
    }

    pub fn neighbors(&self) -> impl Iterator<Item = (Side, TileId)> + '_ {
        Side::ALL
            .into_iter()
            .filter_map(|side| self.neighbor(side).map(|id| (side, id)))
    }

    /// Turn the layout so the lane opens onto `entry`
    ///
    /// Uses the same quarter turns as a crossing, so a rider arriving through
    /// `entry` meets the layout the way a top entry meets the unturned one.
    pub fn orient(&mut self, entry: Side) {
        if entry == self.entry {
            return;
        }
        let map = AxisMap::between(entry.opposite(), self.entry);
        self.hitboxes.map_in_place(|h| h.rotated(map));
        self.entry = entry;
    }
}
