//! Game state and core simulation types
//!
//! `GameState` owns the course, the player and the seeded RNG. Everything
//! the tick loop mutates lives here and is passed around by `&mut`.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::course::{Course, CourseError};
use super::layout::{LayoutVariant, generate_layout};
use super::remap::Transition;
use super::side::Side;
use super::tile::{Hitbox, TileId};
use crate::consts::{SIM_DT, START_POS};
use crate::settings::{Physics, Settings};

/// How a round ended, from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEnd {
    /// Left the tile through a side with nothing attached
    NoNeighbor { tile: TileId, side: Side },
    /// The neighbour doesn't list the tile we came from
    AsymmetricGraph { tile: TileId, neighbor: TileId },
    /// Hit a wall or rock
    ObstacleCollision { tile: TileId },
    /// Crossed the finish line
    GoalReached { tile: TileId },
}

impl RoundEnd {
    pub fn outcome(&self) -> Outcome {
        match self {
            RoundEnd::GoalReached { .. } => Outcome::Win,
            _ => Outcome::Lose,
        }
    }
}

impl std::fmt::Display for RoundEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundEnd::NoNeighbor { tile, side } => {
                write!(f, "fell off the {} edge of tile {}", side, tile)
            }
            RoundEnd::AsymmetricGraph { tile, neighbor } => {
                write!(f, "tile {} is not linked back to tile {}", neighbor, tile)
            }
            RoundEnd::ObstacleCollision { tile } => write!(f, "crashed on tile {}", tile),
            RoundEnd::GoalReached { tile } => write!(f, "finished on tile {}", tile),
        }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Round ended; waits for a touch on the player's tile
    GameOver(RoundEnd),
}

impl GamePhase {
    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            GamePhase::Playing => None,
            GamePhase::GameOver(end) => Some(end.outcome()),
        }
    }
}

/// Things that happened during a tick, for audio and UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TileSetup(TileId),
    LayoutGenerated { tile: TileId, variant: LayoutVariant },
    Transition(Transition),
    RoundOver(RoundEnd),
    Reset,
}

/// The snowboarder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the player box, tile-local pixels
    pub pos: Vec2,
    pub vel: Vec2,
    /// Tile currently drawing the player
    pub owner: Option<TileId>,
    /// Direction of travel in the owner's frame
    pub facing: Side,
    pub size: Vec2,
}

impl Player {
    /// Fresh player at the start of the course
    pub fn at_start(owner: Option<TileId>, physics: &Physics) -> Self {
        Self {
            pos: Vec2::from(START_POS),
            vel: Vec2::ZERO,
            owner,
            facing: Side::Bottom,
            size: Vec2::splat(physics.player_size),
        }
    }

    /// Box used against hitboxes: the sprite shrunk by `inset` on every side
    pub fn hit_box(&self, inset: f32) -> (Vec2, Vec2) {
        (self.pos + inset, self.size - 2.0 * inset)
    }
}

/// Per-tile view for renderers and debug overlays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub id: TileId,
    /// Neighbour per side, in `Side::ALL` order
    pub neighbors: [Option<TileId>; 4],
    pub hitboxes: Vec<Hitbox>,
    /// Edge the layout is laid out to be entered from
    pub entry: Side,
}

/// Everything the outside world reads after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub owner: Option<TileId>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Side,
    pub phase: GamePhase,
    pub outcome: Option<Outcome>,
    /// Simulated course clock since the last reset, in seconds
    ///
    /// Counts ticks, so it stops during a game over and drives the finish
    /// gate. Wall-clock round timing lives in `timer::RoundTimer`.
    pub course_secs: f32,
    pub tiles: Vec<TileSnapshot>,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub course: Course,
    pub player: Player,
    pub phase: GamePhase,
    /// Simulation ticks played since the last reset
    pub time_ticks: u64,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an empty game; tiles arrive through `setup_tile`
    pub fn new(settings: Settings) -> Self {
        let rng = Pcg32::seed_from_u64(settings.course.seed);
        let player = Player::at_start(None, &settings.physics);
        Self {
            settings,
            course: Course::new(),
            player,
            phase: GamePhase::Playing,
            time_ticks: 0,
            rng,
            events: Vec::new(),
        }
    }

    /// Simulated course time in seconds
    pub fn course_secs(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    /// Bring a tile into the course and give it its first layout
    ///
    /// The first tile becomes the course start and receives the player.
    pub fn setup_tile(&mut self, id: TileId) -> Result<(), CourseError> {
        self.course.setup(id)?;
        log::info!("Tile {} set up", id);
        self.events.push(GameEvent::TileSetup(id));
        self.regenerate(id);

        if self.player.owner.is_none() {
            self.player = Player::at_start(Some(id), &self.settings.physics);
        }
        Ok(())
    }

    /// Neighbour-add notification from the pairing layer
    pub fn connect(
        &mut self,
        a: TileId,
        side_a: Side,
        b: TileId,
        side_b: Side,
    ) -> Result<(), CourseError> {
        self.course.connect(a, side_a, b, side_b).inspect_err(|e| {
            log::warn!("Ignoring neighbor add {}:{} - {}:{}: {}", a, side_a, b, side_b, e)
        })
    }

    /// Neighbour-remove notification from the pairing layer
    pub fn disconnect(
        &mut self,
        a: TileId,
        side_a: Side,
        b: TileId,
        side_b: Side,
    ) -> Result<(), CourseError> {
        self.course.disconnect(a, side_a, b, side_b).inspect_err(|e| {
            log::warn!("Ignoring neighbor remove {}:{} - {}:{}: {}", a, side_a, b, side_b, e)
        })
    }

    /// Store the latest accelerometer reading for a tile
    pub fn set_tilt(&mut self, id: TileId, accel: Vec3) {
        match self.course.get_mut(id) {
            Some(tile) => tile.accel = accel,
            None => log::warn!("Tilt for unknown tile {}", id),
        }
    }

    /// Touch on a tile; restarts the round when it's the player's tile after
    /// a game over. Returns whether a reset happened.
    pub fn touch(&mut self, id: TileId) -> bool {
        if self.phase.is_playing() || self.player.owner != Some(id) {
            return false;
        }
        self.reset();
        true
    }

    /// Put the player back at the start and rebuild every layout
    pub fn reset(&mut self) {
        self.player = Player::at_start(self.course.start(), &self.settings.physics);
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        for tile in self.course.tiles_mut() {
            tile.entry = Side::Top;
        }
        for id in self.course.ids() {
            self.regenerate(id);
        }
        log::info!("Round reset on tile {:?}", self.player.owner);
        self.events.push(GameEvent::Reset);
    }

    /// Give a tile a fresh layout, facing the edge it was last entered from
    pub fn regenerate(&mut self, id: TileId) {
        let elapsed = self.course_secs();
        let Some(tile) = self.course.get_mut(id) else {
            return;
        };
        let entry = tile.entry;
        // Layouts come out laid for a top entry
        tile.entry = Side::Top;
        match generate_layout(&mut tile.hitboxes, elapsed, &mut self.rng, &self.settings.course) {
            Ok(variant) => {
                tile.orient(entry);
                log::debug!("Tile {} layout: {} from {}", id, variant.as_str(), entry);
                self.events.push(GameEvent::LayoutGenerated { tile: id, variant });
            }
            Err(e) => {
                log::error!("Tile {} layout failed: {}", id, e);
                tile.hitboxes.clear();
            }
        }
    }

    pub(crate) fn end_round(&mut self, end: RoundEnd) {
        log::info!(
            "Round over ({:?}): {} after {:.1}s",
            end.outcome(),
            end,
            self.course_secs()
        );
        self.phase = GamePhase::GameOver(end);
        self.events.push(GameEvent::RoundOver(end));
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            owner: self.player.owner,
            position: self.player.pos,
            velocity: self.player.vel,
            facing: self.player.facing,
            phase: self.phase,
            outcome: self.phase.outcome(),
            course_secs: self.course_secs(),
            tiles: self
                .course
                .tiles()
                .map(|tile| TileSnapshot {
                    id: tile.id,
                    neighbors: Side::ALL.map(|side| tile.neighbor(side)),
                    hitboxes: tile.hitboxes.as_slice().to_vec(),
                    entry: tile.entry,
                })
                .collect(),
        }
    }
}
