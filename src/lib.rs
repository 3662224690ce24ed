//! Arena Shooter - simulation core for a wave-based arena shooter
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (steering, combat, waves, game state)
//! - `hud`: Folds simulation events into HUD display values
//! - `persistence`: High score storage backends
//! - `highscores`: High score record keeping
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod hud;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use tuning::Tuning;

use glam::{Vec2, Vec3};

/// Arena geometry and body dimensions
pub mod consts {
    use glam::Vec3;

    /// Reference frame time (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Boundary walls sit at ±this on X and Z
    pub const ARENA_HALF_EXTENT: f32 = 50.0;
    /// Boundary wall height
    pub const WALL_HEIGHT: f32 = 10.0;
    /// Obstacles are scattered inside ±this on X and Z
    pub const OBSTACLE_HALF_EXTENT: i32 = 45;
    /// No obstacles closer than this to the arena origin (player spawn)
    pub const OBSTACLE_CLEAR_RADIUS: f32 = 10.0;
    /// Obstacle placement attempts per arena
    pub const OBSTACLE_ATTEMPTS: u32 = 40;

    /// Player body half extents (box centered `PLAYER_HALF_EXTENTS.y` above the feet)
    pub const PLAYER_HALF_EXTENTS: Vec3 = Vec3::new(0.4, 1.0, 0.4);
    /// Camera height above the player's feet
    pub const PLAYER_EYE_HEIGHT: f32 = 1.7;
    /// Player may not get closer than this to a boundary wall
    pub const PLAYER_WALL_MARGIN: f32 = 1.0;

    /// Enemy body half extents (box centered `ENEMY_HALF_EXTENTS.y` above the feet)
    pub const ENEMY_HALF_EXTENTS: Vec3 = Vec3::new(0.5, 1.0, 0.5);
    /// Height of the whisker rays and line-of-sight rays
    pub const ENEMY_CHEST_HEIGHT: f32 = 1.5;

    /// Enemy projectile collision radius
    pub const PROJECTILE_RADIUS: f32 = 0.25;

    /// Minimap units per world unit
    pub const MINIMAP_SCALE: f32 = 0.02;
    /// Minimap markers are clamped to ±this
    pub const MINIMAP_LIMIT: f32 = 0.45;

    /// Full-screen damage flash fade time (seconds)
    pub const SCREEN_FLASH_DURATION: f32 = 0.2;
    /// Entity hit-flash duration (seconds)
    pub const HIT_FLASH_DURATION: f32 = 0.1;
}

/// Normalized angle to [-π, π). Non-finite input maps to 0.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU
    if wrapped >= PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Horizontal forward vector for a yaw (0 faces +Z, positive yaw turns toward +X)
#[inline]
pub fn yaw_forward(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Horizontal right vector for a yaw
#[inline]
pub fn yaw_right(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, -yaw.sin())
}

/// Yaw that faces from `from` toward `to` on the XZ plane
#[inline]
pub fn yaw_towards(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    d.x.atan2(d.z)
}

/// Distance between two points on the XZ plane
#[inline]
pub fn distance_xz(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}
