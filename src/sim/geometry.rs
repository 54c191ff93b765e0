//! Collision detection and tilt integration
//!
//! Stateless helpers shared by the tick loop: turning an accelerometer sample
//! into velocity, overlapping two boxes, and finding which board edge the
//! player has crossed.

use glam::{Vec2, Vec3};

use super::side::Side;
use crate::consts::TILE_SIZE;
use crate::settings::Physics;

/// Integrate one tilt sample into a new velocity
///
/// A device lying flat reads within the noise band on both screen axes; that
/// reading only damps the existing velocity so a resting cube doesn't jitter
/// the player around. Any other reading is normalised, scaled to gravity and
/// its screen-plane projection added for `dt` before damping.
pub fn calc_new_velocity(old_velocity: Vec2, accel: Vec3, dt: f32, physics: &Physics) -> Vec2 {
    let band = physics.noise_band;
    let flat = (-band..=band).contains(&accel.x) && (-band..=band).contains(&accel.y);
    if flat || accel.length_squared() == 0.0 {
        return old_velocity * physics.damping;
    }

    let pull = accel.normalize() * physics.gravity;
    (old_velocity + pull.truncate() * dt) * physics.damping
}

/// Axis-aligned box overlap test (top-left origin + extent)
///
/// Boxes that share an edge exactly still count as overlapping.
pub fn collision_detect(origin_a: Vec2, size_a: Vec2, origin_b: Vec2, size_b: Vec2) -> bool {
    let max_a = origin_a + size_a;
    let max_b = origin_b + size_b;

    if max_a.y < origin_b.y {
        return false;
    }
    if origin_a.y > max_b.y {
        return false;
    }
    if max_a.x < origin_b.x {
        return false;
    }
    if origin_a.x > max_b.x {
        return false;
    }
    true
}

/// Which tile edge the centre of a box has crossed, if any
///
/// Only one side is reported. A corner exit resolves LEFT, then TOP, then
/// RIGHT, then BOTTOM.
pub fn side_of_world_collision(pos: Vec2, size: Vec2) -> Option<Side> {
    let center = pos + size / 2.0;

    if center.x < 0.0 {
        Some(Side::Left)
    } else if center.y < 0.0 {
        Some(Side::Top)
    } else if center.x > TILE_SIZE {
        Some(Side::Right)
    } else if center.y > TILE_SIZE {
        Some(Side::Bottom)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PLAYER_SIZE, SIM_DT};
    use proptest::prelude::*;

    fn player() -> Vec2 {
        Vec2::splat(PLAYER_SIZE)
    }

    #[test]
    fn test_flat_tilt_only_damps() {
        let physics = Physics::default();
        let old = Vec2::new(2.0, -1.5);

        let v = calc_new_velocity(old, Vec3::new(0.3, -1.0, 1.0), SIM_DT, &physics);
        assert_eq!(v, old * physics.damping);

        // Edges of the band are still flat
        let v = calc_new_velocity(old, Vec3::new(1.0, 1.0, -2.0), SIM_DT, &physics);
        assert_eq!(v, old * physics.damping);
    }

    #[test]
    fn test_zero_reading_is_finite() {
        let physics = Physics {
            noise_band: 0.0,
            ..Default::default()
        };
        let v = calc_new_velocity(Vec2::new(1.0, 1.0), Vec3::ZERO, SIM_DT, &physics);
        assert!(v.is_finite());
        assert_eq!(v, Vec2::new(1.0, 1.0) * physics.damping);
    }

    #[test]
    fn test_tilt_right_accelerates_right() {
        let physics = Physics::default();
        let v = calc_new_velocity(Vec2::ZERO, Vec3::new(2.0, 0.0, 0.0), SIM_DT, &physics);

        let expected = physics.gravity * SIM_DT * physics.damping;
        assert!((v.x - expected).abs() < 1e-5);
        assert!(v.y.abs() < 1e-6);
    }

    #[test]
    fn test_steep_tilt_keeps_only_screen_plane() {
        let physics = Physics::default();
        let accel = Vec3::new(0.0, 1.5, 2.0);
        let v = calc_new_velocity(Vec2::ZERO, accel, 1.0, &physics);

        let unit = accel.normalize();
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - unit.y * physics.gravity * physics.damping).abs() < 1e-4);
    }

    #[test]
    fn test_collision_overlap_and_miss() {
        let size = Vec2::splat(16.0);
        assert!(collision_detect(Vec2::ZERO, size, Vec2::new(8.0, 8.0), size));
        assert!(!collision_detect(Vec2::ZERO, size, Vec2::new(17.0, 0.0), size));
        assert!(!collision_detect(Vec2::ZERO, size, Vec2::new(0.0, -17.0), size));
        // Shared edge counts as touching
        assert!(collision_detect(Vec2::ZERO, size, Vec2::new(16.0, 0.0), size));
    }

    #[test]
    fn test_collision_containment() {
        let outer = Vec2::splat(100.0);
        let inner = Vec2::splat(10.0);
        assert!(collision_detect(Vec2::ZERO, outer, Vec2::new(40.0, 40.0), inner));
        assert!(collision_detect(Vec2::new(40.0, 40.0), inner, Vec2::ZERO, outer));
    }

    #[test]
    fn test_right_edge_boundary() {
        // Centre lands exactly at 112: still on the board
        assert_eq!(side_of_world_collision(Vec2::new(96.0, 1.0), player()), None);
        // 113 + 16 = 129 > 128
        assert_eq!(
            side_of_world_collision(Vec2::new(113.0, 1.0), player()),
            Some(Side::Right)
        );
        // Exactly on the edge is not past it
        assert_eq!(side_of_world_collision(Vec2::new(112.0, 1.0), player()), None);
    }

    #[test]
    fn test_each_edge_reported() {
        assert_eq!(
            side_of_world_collision(Vec2::new(-17.0, 50.0), player()),
            Some(Side::Left)
        );
        assert_eq!(
            side_of_world_collision(Vec2::new(50.0, -17.0), player()),
            Some(Side::Top)
        );
        assert_eq!(
            side_of_world_collision(Vec2::new(50.0, 113.0), player()),
            Some(Side::Bottom)
        );
    }

    #[test]
    fn test_corner_priority() {
        // Left beats top and bottom
        assert_eq!(
            side_of_world_collision(Vec2::new(-20.0, -20.0), player()),
            Some(Side::Left)
        );
        assert_eq!(
            side_of_world_collision(Vec2::new(-20.0, 120.0), player()),
            Some(Side::Left)
        );
        // Top beats right
        assert_eq!(
            side_of_world_collision(Vec2::new(120.0, -20.0), player()),
            Some(Side::Top)
        );
        // Right beats bottom
        assert_eq!(
            side_of_world_collision(Vec2::new(120.0, 120.0), player()),
            Some(Side::Right)
        );
    }

    proptest! {
        #[test]
        fn prop_flat_band_is_pure_damping(
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            ax in -1.0f32..=1.0,
            ay in -1.0f32..=1.0,
            az in -2.0f32..2.0,
        ) {
            let physics = Physics::default();
            let old = Vec2::new(vx, vy);
            let v = calc_new_velocity(old, Vec3::new(ax, ay, az), SIM_DT, &physics);
            prop_assert_eq!(v, old * physics.damping);
        }

        #[test]
        fn prop_out_of_band_is_finite(
            ax in 1.01f32..2.0,
            ay in -2.0f32..2.0,
            az in -2.0f32..2.0,
            flip in any::<bool>(),
        ) {
            let ax = if flip { -ax } else { ax };
            let v = calc_new_velocity(Vec2::ZERO, Vec3::new(ax, ay, az), SIM_DT, &Physics::default());
            prop_assert!(v.is_finite());
        }

        #[test]
        fn prop_collision_is_symmetric(
            ax in -200.0f32..200.0, ay in -200.0f32..200.0,
            aw in 1.0f32..100.0, ah in 1.0f32..100.0,
            bx in -200.0f32..200.0, by in -200.0f32..200.0,
            bw in 1.0f32..100.0, bh in 1.0f32..100.0,
        ) {
            let (oa, sa) = (Vec2::new(ax, ay), Vec2::new(aw, ah));
            let (ob, sb) = (Vec2::new(bx, by), Vec2::new(bw, bh));
            prop_assert_eq!(collision_detect(oa, sa, ob, sb), collision_detect(ob, sb, oa, sa));
        }

        #[test]
        fn prop_interior_has_no_exit(
            x in -16.0f32..112.0,
            y in -16.0f32..112.0,
        ) {
            prop_assert_eq!(side_of_world_collision(Vec2::new(x, y), player()), None);
        }
    }
}
