//! Whisker-based local avoidance and pursuit
//!
//! Three short rays (forward, forward-left, forward-right) decide whether an
//! enemy keeps homing on the player or turns away from geometry. The decision
//! itself is pure; probing goes through `SpatialQuery`.

use glam::{Vec2, Vec3};

use super::query::{Ignore, Ray, SpatialQuery};
use super::state::{Enemy, EnemyKey, GameState};
use crate::consts::{MINIMAP_LIMIT, MINIMAP_SCALE};
use crate::tuning::GruntTuning;
use crate::{distance_xz, normalize_angle, yaw_right, yaw_towards};

/// Which whiskers reported a hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Whiskers {
    pub front: bool,
    pub left: bool,
    pub right: bool,
}

impl Whiskers {
    /// Cast the three whiskers from the enemy's chest, ignoring itself and the player
    pub fn cast(
        query: &dyn SpatialQuery,
        state: &GameState,
        id: EnemyKey,
        enemy: &Enemy,
        length: f32,
    ) -> Self {
        let origin = enemy.chest();
        let forward = enemy.forward();
        let right = enemy.right();
        let ignore = Ignore::enemy_and_player(id);
        let cast = |dir: Vec3| query.blocked(state, &Ray::new(origin, dir, length), &ignore);

        Self {
            front: cast(forward),
            left: cast((forward - right).normalize()),
            right: cast((forward + right).normalize()),
        }
    }
}

/// Heading and speed for this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub yaw: f32,
    /// Multiplier on the enemy's base speed
    pub speed_scale: f32,
}

/// Apply the whisker decision table
pub fn steer(
    whiskers: Whiskers,
    yaw: f32,
    position: Vec3,
    target: Vec3,
    dt: f32,
    tuning: &GruntTuning,
) -> Steering {
    let turn = tuning.turn_rate() * dt;

    if whiskers.front {
        let delta = match (whiskers.left, whiskers.right) {
            (false, false) => {
                let to_target = (target - position).with_y(0.0);
                if to_target.dot(yaw_right(yaw)) > 0.0 {
                    turn
                } else {
                    -turn
                }
            }
            // Left is open: swing left
            (false, true) => -turn,
            (true, false) => turn,
            (true, true) => turn * 1.5,
        };
        return Steering {
            yaw: normalize_angle(yaw + delta),
            speed_scale: 0.5,
        };
    }

    let yaw = if distance_xz(position, target) > tuning.stop_distance {
        let desired = yaw_towards(position, target);
        let t = (tuning.heading_lerp * dt).min(1.0);
        normalize_angle(yaw + normalize_angle(desired - yaw) * t)
    } else {
        yaw
    };
    Steering {
        yaw,
        speed_scale: 1.0,
    }
}

/// Sniper movement relative to its stand-off band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandOff {
    /// Too close: back away
    Retreat,
    /// Too far: close in
    Advance,
    Hold,
}

pub fn stand_off(distance: f32, min_distance: f32, band_width: f32) -> StandOff {
    if distance < min_distance {
        StandOff::Retreat
    } else if distance > min_distance + band_width {
        StandOff::Advance
    } else {
        StandOff::Hold
    }
}

/// Minimap offset of an enemy relative to the player
pub fn minimap_offset(enemy: Vec3, player: Vec3) -> Vec2 {
    let rel = Vec2::new(enemy.x - player.x, enemy.z - player.z) * MINIMAP_SCALE;
    rel.clamp(Vec2::splat(-MINIMAP_LIMIT), Vec2::splat(MINIMAP_LIMIT))
}
