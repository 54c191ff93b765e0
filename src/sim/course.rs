//! Course: the set of tiles and the neighbour graph between them
//!
//! Every edge is stored on both ends. `connect` and `disconnect` update the
//! two ends inside one call, so the graph is never observed half-updated.

use serde::{Deserialize, Serialize};

use super::side::Side;
use super::tile::{Tile, TileId};
use crate::consts::TILE_ALLOCATION;

/// Rejected course mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseError {
    /// The id names a tile that was never set up
    UnknownTile(TileId),
    /// The id is outside the tile allocation
    TileCapacity(TileId),
    /// `setup` called twice for the same tile
    AlreadySetup(TileId),
    /// Both ends of an edge are the same tile
    SelfConnection(TileId),
}

impl std::fmt::Display for CourseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseError::UnknownTile(id) => write!(f, "tile {} is not set up", id),
            CourseError::TileCapacity(id) => {
                write!(f, "tile {} exceeds allocation of {}", id, TILE_ALLOCATION)
            }
            CourseError::AlreadySetup(id) => write!(f, "tile {} is already set up", id),
            CourseError::SelfConnection(id) => write!(f, "tile {} cannot neighbour itself", id),
        }
    }
}

impl std::error::Error for CourseError {}

/// Owned, id-indexed tile collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    slots: Vec<Option<Tile>>,
    /// First tile set up; rounds start here
    start: Option<TileId>,
}

impl Default for Course {
    fn default() -> Self {
        Self::new()
    }
}

impl Course {
    pub fn new() -> Self {
        Self {
            slots: vec![None; TILE_ALLOCATION],
            start: None,
        }
    }

    /// Create a tile. Once set up a tile stays valid for the session.
    pub fn setup(&mut self, id: TileId) -> Result<&mut Tile, CourseError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(CourseError::TileCapacity(id))?;
        if slot.is_some() {
            return Err(CourseError::AlreadySetup(id));
        }
        if self.start.is_none() {
            self.start = Some(id);
        }
        Ok(slot.insert(Tile::new(id)))
    }

    pub fn start(&self) -> Option<TileId> {
        self.start
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn require_mut(&mut self, id: TileId) -> Result<&mut Tile, CourseError> {
        self.get_mut(id).ok_or(CourseError::UnknownTile(id))
    }

    /// Tiles in id order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.slots.iter().flatten()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.slots.iter_mut().flatten()
    }

    pub fn ids(&self) -> Vec<TileId> {
        self.tiles().map(|t| t.id).collect()
    }

    pub fn len(&self) -> usize {
        self.tiles().count()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// Tile attached on `side` of `id`
    pub fn neighbor(&self, id: TileId, side: Side) -> Option<TileId> {
        self.get(id).and_then(|t| t.neighbor(side))
    }

    /// Side of `id` that faces back toward `toward`
    pub fn side_facing(&self, id: TileId, toward: TileId) -> Option<Side> {
        self.get(id).and_then(|t| t.side_of(toward))
    }

    /// Attach `side_a` of `a` to `side_b` of `b`
    ///
    /// Any edge previously occupying either slot is torn down on both of its
    /// ends first.
    pub fn connect(
        &mut self,
        a: TileId,
        side_a: Side,
        b: TileId,
        side_b: Side,
    ) -> Result<(), CourseError> {
        if a == b {
            return Err(CourseError::SelfConnection(a));
        }
        if !self.contains(a) {
            return Err(CourseError::UnknownTile(a));
        }
        if !self.contains(b) {
            return Err(CourseError::UnknownTile(b));
        }

        self.detach(a, side_a);
        self.detach(b, side_b);
        // A pair of cubes touches along one edge only
        if let Some(stale) = self.side_facing(a, b) {
            self.detach(a, stale);
        }

        self.require_mut(a)?.set_neighbor(side_a, Some(b));
        self.require_mut(b)?.set_neighbor(side_b, Some(a));
        log::debug!("Neighbor add: {}:{} - {}:{}", a, side_a, b, side_b);
        Ok(())
    }

    /// Tear down the edge between `side_a` of `a` and `side_b` of `b`
    ///
    /// Either end is cleared only if it still points at the other.
    pub fn disconnect(
        &mut self,
        a: TileId,
        side_a: Side,
        b: TileId,
        side_b: Side,
    ) -> Result<(), CourseError> {
        if !self.contains(a) {
            return Err(CourseError::UnknownTile(a));
        }
        if !self.contains(b) {
            return Err(CourseError::UnknownTile(b));
        }

        let tile_a = self.require_mut(a)?;
        if tile_a.neighbor(side_a) == Some(b) {
            tile_a.set_neighbor(side_a, None);
        }
        let tile_b = self.require_mut(b)?;
        if tile_b.neighbor(side_b) == Some(a) {
            tile_b.set_neighbor(side_b, None);
        }
        log::debug!("Neighbor remove: {}:{} - {}:{}", a, side_a, b, side_b);
        Ok(())
    }

    /// Clear `side` of `id` and the matching slot on the far tile
    fn detach(&mut self, id: TileId, side: Side) {
        let Some(other) = self.neighbor(id, side) else {
            return;
        };
        if let Some(tile) = self.get_mut(id) {
            tile.set_neighbor(side, None);
        }
        if let Some(back) = self.side_facing(other, id) {
            if let Some(tile) = self.get_mut(other) {
                tile.set_neighbor(back, None);
            }
        }
    }

    /// Every stored edge has a matching edge on the far tile
    pub fn is_symmetric(&self) -> bool {
        self.tiles().all(|tile| {
            tile.neighbors()
                .all(|(_, other)| self.side_facing(other, tile.id).is_some())
        })
    }
}
