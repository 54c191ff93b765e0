//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec3;

use super::geometry::{calc_new_velocity, side_of_world_collision};
use super::remap::{Transition, remap};
use super::state::{GameEvent, GameState, RoundEnd};
use super::tile::TileId;
use crate::settings::Physics;

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest accelerometer sample per tile
    pub tilt: Vec<(TileId, Vec3)>,
    /// Tile that was tapped, if any
    pub touch: Option<TileId>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    for &(id, accel) in &input.tilt {
        state.set_tilt(id, accel);
    }
    if let Some(id) = input.touch {
        state.touch(id);
    }

    // Frozen until reset
    if !state.phase.is_playing() {
        return;
    }
    let Some(owner) = state.player.owner else {
        return;
    };

    state.time_ticks += 1;
    let physics = state.settings.physics.clone();

    // Integrate on the owning tile's tilt
    let accel = state
        .course
        .get(owner)
        .map(|tile| tile.accel)
        .unwrap_or(Vec3::ZERO);
    state.player.vel = calc_new_velocity(state.player.vel, accel, dt, &physics);
    state.player.pos += state.player.vel;

    // Obstacles and goals win over the board edge
    let (origin, size) = state.player.hit_box(physics.player_inset);
    let hit = state
        .course
        .get(owner)
        .and_then(|tile| tile.hitboxes.first_hit(origin, size))
        .copied();
    if let Some(hitbox) = hit {
        let end = if hitbox.win {
            RoundEnd::GoalReached { tile: owner }
        } else {
            RoundEnd::ObstacleCollision { tile: owner }
        };
        state.end_round(end);
        return;
    }

    let Some(exit) = side_of_world_collision(state.player.pos, state.player.size) else {
        return;
    };
    let Some(next) = state.course.neighbor(owner, exit) else {
        state.end_round(RoundEnd::NoNeighbor {
            tile: owner,
            side: exit,
        });
        return;
    };
    let Some(entry) = state.course.side_facing(next, owner) else {
        state.end_round(RoundEnd::AsymmetricGraph {
            tile: owner,
            neighbor: next,
        });
        return;
    };

    let transition = Transition {
        from: owner,
        to: next,
        exit,
        entry,
    };
    enter(state, transition, &physics);
}

/// Hand the player over to the neighbouring tile
fn enter(state: &mut GameState, transition: Transition, physics: &Physics) {
    let (pos, vel) = remap(
        state.player.pos,
        state.player.vel,
        transition.exit,
        transition.entry,
        physics,
    );
    state.player.pos = pos;
    state.player.vel = vel;
    state.player.owner = Some(transition.to);
    state.player.facing = transition.facing();

    log::debug!(
        "Player {}:{} -> {}:{} at ({:.1}, {:.1})",
        transition.from,
        transition.exit,
        transition.to,
        transition.entry,
        pos.x,
        pos.y
    );
    state.push_event(GameEvent::Transition(transition));

    // Lay the new segment out from the edge the rider came through
    if let Some(tile) = state.course.get_mut(transition.to) {
        tile.orient(transition.entry);
    }
    // The segment just ridden is used up
    state.regenerate(transition.from);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::side::Side;
    use crate::sim::state::{GamePhase, Outcome};
    use crate::sim::tile::Hitbox;

    fn clear_layouts(state: &mut GameState) {
        for tile in state.course.tiles_mut() {
            tile.hitboxes.clear();
        }
    }

    /// Two tiles side by side, A's right against B's left, no obstacles
    fn side_by_side() -> GameState {
        let mut state = GameState::new(Settings::default());
        state.setup_tile(TileId(0)).unwrap();
        state.setup_tile(TileId(1)).unwrap();
        state
            .connect(TileId(0), Side::Right, TileId(1), Side::Left)
            .unwrap();
        clear_layouts(&mut state);
        state
    }

    #[test]
    fn test_flat_tilt_coasts_and_damps() {
        let mut state = side_by_side();
        state.player.pos = Vec2::new(40.0, 40.0);
        state.player.vel = Vec2::new(1.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        let damping = state.settings.physics.damping;
        assert_eq!(state.player.vel, Vec2::new(damping, 0.0));
        assert_eq!(state.player.pos, Vec2::new(40.0 + damping, 40.0));
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_tilt_input_reaches_owner() {
        let mut state = side_by_side();
        state.player.pos = Vec2::new(40.0, 40.0);
        let input = TickInput {
            tilt: vec![(TileId(0), Vec3::new(0.0, 2.0, 0.0))],
            touch: None,
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.player.vel.y > 0.0);
        assert_eq!(state.player.vel.x, 0.0);
    }

    #[test]
    fn test_crossing_right_into_left() {
        let mut state = side_by_side();
        state.player.pos = Vec2::new(113.0, 50.0);
        state.player.vel = Vec2::new(3.0, 1.0);
        state.player.facing = Side::Right;
        state.drain_events();

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.phase.is_playing());
        assert_eq!(state.player.owner, Some(TileId(1)));
        assert_eq!(state.player.pos.x, -10.0);
        assert!((state.player.pos.y - (50.0 + state.player.vel.y)).abs() < 1e-4);
        assert_eq!(state.player.facing, Side::Right);
        assert_eq!(state.course.get(TileId(1)).unwrap().entry, Side::Left);

        // Old tile got a fresh layout, the new one kept its (empty) one
        assert!(!state.course.get(TileId(0)).unwrap().hitboxes.is_empty());
        assert!(state.course.get(TileId(1)).unwrap().hitboxes.is_empty());

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Transition(Transition {
            from: TileId(0),
            to: TileId(1),
            exit: Side::Right,
            entry: Side::Left,
        })));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::LayoutGenerated { tile: TileId(0), .. }
        )));
    }

    #[test]
    fn test_side_entry_survives_generated_layouts() {
        for seed in 0..50 {
            let mut settings = Settings::default();
            settings.course.seed = seed;
            let mut state = GameState::new(settings);
            state.setup_tile(TileId(0)).unwrap();
            state.setup_tile(TileId(1)).unwrap();
            state
                .connect(TileId(0), Side::Right, TileId(1), Side::Left)
                .unwrap();
            // Only the tile being left is cleared; B keeps its generated layout
            state.course.get_mut(TileId(0)).unwrap().hitboxes.clear();
            state.player.pos = Vec2::new(113.0, 50.0);
            state.player.vel = Vec2::new(3.0, 1.0);

            tick(&mut state, &TickInput::default(), SIM_DT);
            assert_eq!(state.player.owner, Some(TileId(1)), "seed {}", seed);
            tick(&mut state, &TickInput::default(), SIM_DT);

            assert!(state.phase.is_playing(), "seed {}: {:?}", seed, state.phase);
            assert_eq!(state.player.owner, Some(TileId(1)));
        }
    }

    #[test]
    fn test_crossing_into_rotated_tile() {
        let mut state = side_by_side();
        // Re-attach B with its top against A's right
        state
            .connect(TileId(0), Side::Right, TileId(1), Side::Top)
            .unwrap();
        state.player.pos = Vec2::new(113.0, 48.0);
        state.player.vel = Vec2::new(2.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.player.owner, Some(TileId(1)));
        assert_eq!(state.player.pos.y, -10.0);
        assert_eq!(state.player.facing, Side::Bottom);
        assert!(state.player.vel.y > 0.0);
        assert!(state.player.vel.x.abs() < 1e-6);
    }

    #[test]
    fn test_missing_neighbor_ends_round() {
        let mut state = side_by_side();
        state.player.pos = Vec2::new(-15.0, 50.0);
        state.player.vel = Vec2::new(-3.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(
            state.phase,
            GamePhase::GameOver(RoundEnd::NoNeighbor {
                tile: TileId(0),
                side: Side::Left,
            })
        );
        assert_eq!(state.phase.outcome(), Some(Outcome::Lose));

        // Frozen until reset
        let (pos, vel, ticks) = (state.player.pos, state.player.vel, state.time_ticks);
        let input = TickInput {
            tilt: vec![(TileId(0), Vec3::new(2.0, 2.0, 0.0))],
            touch: None,
        };
        for _ in 0..5 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.player.pos, pos);
        assert_eq!(state.player.vel, vel);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_one_sided_edge_ends_round() {
        let mut state = side_by_side();
        // B forgets A while A still points at B
        state
            .course
            .get_mut(TileId(1))
            .unwrap()
            .set_neighbor(Side::Left, None);
        assert!(!state.course.is_symmetric());

        state.player.pos = Vec2::new(113.0, 50.0);
        state.player.vel = Vec2::new(3.0, 0.0);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(
            state.phase,
            GamePhase::GameOver(RoundEnd::AsymmetricGraph {
                tile: TileId(0),
                neighbor: TileId(1),
            })
        );
        assert_eq!(state.player.owner, Some(TileId(0)));
    }

    #[test]
    fn test_obstacle_ends_round() {
        let mut state = side_by_side();
        state
            .course
            .get_mut(TileId(0))
            .unwrap()
            .hitboxes
            .push(Hitbox::obstacle(Vec2::new(60.0, 60.0), Vec2::splat(16.0)))
            .unwrap();
        state.player.pos = Vec2::new(40.0, 40.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(
            state.phase,
            GamePhase::GameOver(RoundEnd::ObstacleCollision { tile: TileId(0) })
        );
    }

    #[test]
    fn test_inset_forgives_a_graze() {
        let mut state = side_by_side();
        // Sprite box reaches x=72, inset box only x=68
        state
            .course
            .get_mut(TileId(0))
            .unwrap()
            .hitboxes
            .push(Hitbox::obstacle(Vec2::new(70.0, 40.0), Vec2::splat(16.0)))
            .unwrap();
        state.player.pos = Vec2::new(40.0, 40.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.phase.is_playing());
    }

    #[test]
    fn test_goal_checked_before_edge() {
        let mut state = side_by_side();
        // Goal straddling the right edge, player crossing it this tick
        state
            .course
            .get_mut(TileId(0))
            .unwrap()
            .hitboxes
            .push(Hitbox::goal(Vec2::new(100.0, 0.0), Vec2::new(28.0, 128.0)))
            .unwrap();
        state.player.pos = Vec2::new(113.0, 50.0);
        state.player.vel = Vec2::new(3.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(
            state.phase,
            GamePhase::GameOver(RoundEnd::GoalReached { tile: TileId(0) })
        );
        assert_eq!(state.phase.outcome(), Some(Outcome::Win));
        assert_eq!(state.player.owner, Some(TileId(0)));
    }

    #[test]
    fn test_touch_resets_after_game_over() {
        let mut state = side_by_side();
        state.player.pos = Vec2::new(-15.0, 50.0);
        state.player.vel = Vec2::new(-3.0, 0.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.phase.is_playing());

        let touch = TickInput {
            tilt: Vec::new(),
            touch: Some(TileId(0)),
        };
        tick(&mut state, &touch, SIM_DT);

        assert!(state.phase.is_playing());
        assert_eq!(state.player.owner, Some(TileId(0)));
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_no_tiles_no_motion() {
        let mut state = GameState::new(Settings::default());
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, 0);
        assert!(state.phase.is_playing());
    }

    #[test]
    fn test_determinism() {
        // Two games with the same seed and inputs stay in lockstep
        let build = || {
            let mut state = GameState::new(Settings::default());
            for i in 0..3 {
                state.setup_tile(TileId(i)).unwrap();
            }
            state
                .connect(TileId(0), Side::Bottom, TileId(1), Side::Top)
                .unwrap();
            state
                .connect(TileId(1), Side::Bottom, TileId(2), Side::Top)
                .unwrap();
            state
        };
        let mut a = build();
        let mut b = build();
        let input = TickInput {
            tilt: (0..3).map(|i| (TileId(i), Vec3::new(0.2, 1.6, 0.5))).collect(),
            touch: None,
        };

        for _ in 0..600 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }

        assert_eq!(a.snapshot(), b.snapshot());
    }
}
