//! Course segment layouts
//!
//! Each tile shows one segment of the slope. A segment is rebuilt from
//! scratch every time it is generated; the player never sees the same pass
//! twice.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tile::{Hitbox, HitboxList, HitboxOverflow};
use crate::consts::{ROCK_SIZE, TILE_SIZE, WALL_THICKNESS};
use crate::settings::CourseSettings;

/// Segment shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutVariant {
    /// Open lane between two walls
    Straight,
    /// Lane entering at the top and leaving on the right
    Curve,
    StraightOneObstacle,
    StraightTwoObstacles,
    /// Goal line across the lane
    Finish,
}

impl LayoutVariant {
    /// Variants picked at random; `Finish` is gated separately
    pub const RANDOM: [LayoutVariant; 4] = [
        LayoutVariant::Straight,
        LayoutVariant::Curve,
        LayoutVariant::StraightOneObstacle,
        LayoutVariant::StraightTwoObstacles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutVariant::Straight => "straight",
            LayoutVariant::Curve => "curve",
            LayoutVariant::StraightOneObstacle => "straight+1",
            LayoutVariant::StraightTwoObstacles => "straight+2",
            LayoutVariant::Finish => "finish",
        }
    }
}

/// Interior x range for rock origins (clear of both walls)
const ROCK_MIN_X: f32 = WALL_THICKNESS + 8.0;
const ROCK_MAX_X: f32 = TILE_SIZE - WALL_THICKNESS - ROCK_SIZE - 8.0;
/// Rocks stay below the band the player starts a round in
const ROCK_MIN_Y: f32 = 40.0;
const ROCK_MAX_Y: f32 = TILE_SIZE - WALL_THICKNESS - ROCK_SIZE;

/// Rebuild `hitboxes` with a fresh segment
///
/// Layouts are built for a rider entering through the top edge; the tile
/// turns them to its actual entry side afterwards. Once the course has run
/// for `finish_after_secs`, each call has a `finish_chance` of producing the
/// finish line instead of a random segment.
pub fn generate_layout<R: Rng>(
    hitboxes: &mut HitboxList,
    elapsed_secs: f32,
    rng: &mut R,
    settings: &CourseSettings,
) -> Result<LayoutVariant, HitboxOverflow> {
    hitboxes.clear();

    let variant = if elapsed_secs >= settings.finish_after_secs
        && rng.random_bool(settings.finish_chance.clamp(0.0, 1.0))
    {
        LayoutVariant::Finish
    } else {
        LayoutVariant::RANDOM[rng.random_range(0..LayoutVariant::RANDOM.len())]
    };
    build(variant, hitboxes, rng)?;
    Ok(variant)
}

fn build<R: Rng>(
    variant: LayoutVariant,
    hitboxes: &mut HitboxList,
    rng: &mut R,
) -> Result<(), HitboxOverflow> {
    match variant {
        LayoutVariant::Straight => push_lane_walls(hitboxes),
        LayoutVariant::Curve => {
            // Outer bank on the left and bottom, inner corner top-right
            hitboxes.push(Hitbox::obstacle(
                Vec2::ZERO,
                Vec2::new(WALL_THICKNESS, TILE_SIZE),
            ))?;
            hitboxes.push(Hitbox::obstacle(
                Vec2::new(WALL_THICKNESS, TILE_SIZE - WALL_THICKNESS),
                Vec2::new(TILE_SIZE - WALL_THICKNESS, WALL_THICKNESS),
            ))?;
            hitboxes.push(Hitbox::obstacle(
                Vec2::new(TILE_SIZE - WALL_THICKNESS, 0.0),
                Vec2::splat(WALL_THICKNESS),
            ))
        }
        LayoutVariant::StraightOneObstacle => {
            push_lane_walls(hitboxes)?;
            push_rock(hitboxes, rng, ROCK_MIN_Y, ROCK_MAX_Y)
        }
        LayoutVariant::StraightTwoObstacles => {
            push_lane_walls(hitboxes)?;
            // One rock per half so they never stack
            let mid = (ROCK_MIN_Y + ROCK_MAX_Y) / 2.0;
            push_rock(hitboxes, rng, ROCK_MIN_Y, mid)?;
            push_rock(hitboxes, rng, mid + ROCK_SIZE, ROCK_MAX_Y)
        }
        LayoutVariant::Finish => {
            hitboxes.push(Hitbox::goal(
                Vec2::new(WALL_THICKNESS, TILE_SIZE - 2.0 * WALL_THICKNESS),
                Vec2::new(TILE_SIZE - 2.0 * WALL_THICKNESS, WALL_THICKNESS),
            ))?;
            push_lane_walls(hitboxes)
        }
    }
}

fn push_lane_walls(hitboxes: &mut HitboxList) -> Result<(), HitboxOverflow> {
    let wall = Vec2::new(WALL_THICKNESS, TILE_SIZE);
    hitboxes.push(Hitbox::obstacle(Vec2::ZERO, wall))?;
    hitboxes.push(Hitbox::obstacle(
        Vec2::new(TILE_SIZE - WALL_THICKNESS, 0.0),
        wall,
    ))
}

fn push_rock<R: Rng>(
    hitboxes: &mut HitboxList,
    rng: &mut R,
    min_y: f32,
    max_y: f32,
) -> Result<(), HitboxOverflow> {
    let origin = Vec2::new(
        rng.random_range(ROCK_MIN_X..=ROCK_MAX_X),
        rng.random_range(min_y..=max_y),
    );
    hitboxes.push(Hitbox::obstacle(origin, Vec2::splat(ROCK_SIZE)))
}
