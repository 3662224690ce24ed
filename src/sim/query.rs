//! Spatial queries the simulation asks of the scene
//!
//! The host engine normally owns collision; it plugs in by implementing
//! `SpatialQuery`. `ArenaQuery` answers the same questions from the boxes in
//! `GameState` and is what headless runs and tests use.

use glam::Vec3;

use super::collision::{ray_aabb, ray_ground, sphere_aabb_overlap};
use super::state::{EnemyKey, GameState};

/// What a ray or overlap test touched
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTarget {
    Player,
    Enemy(EnemyKey),
    /// Index into `GameState::obstacles`
    Obstacle(usize),
    Ground,
}

impl HitTarget {
    pub fn is_enemy(&self) -> bool {
        matches!(self, HitTarget::Enemy(_))
    }
}

/// Nearest hit along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub target: HitTarget,
    pub point: Vec3,
    pub distance: f32,
}

/// A ray with a length limit. `direction` is normalized on construction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            max_distance,
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Bodies a ray passes through
#[derive(Debug, Clone, Copy, Default)]
pub struct Ignore {
    pub enemy: Option<EnemyKey>,
    pub player: bool,
}

impl Ignore {
    pub fn player() -> Self {
        Self {
            enemy: None,
            player: true,
        }
    }

    pub fn enemy(id: EnemyKey) -> Self {
        Self {
            enemy: Some(id),
            player: false,
        }
    }

    /// Ignore both an enemy and the player
    pub fn enemy_and_player(id: EnemyKey) -> Self {
        Self {
            enemy: Some(id),
            player: true,
        }
    }
}

/// Scene query service
pub trait SpatialQuery {
    /// Nearest solid hit along `ray`, skipping the ignored bodies
    fn raycast(&self, state: &GameState, ray: &Ray, ignore: &Ignore) -> Option<RayHit>;

    /// Everything a sphere currently overlaps
    fn overlap_sphere(&self, state: &GameState, center: Vec3, radius: f32) -> Vec<HitTarget>;

    /// Convenience: does the ray hit anything at all
    fn blocked(&self, state: &GameState, ray: &Ray, ignore: &Ignore) -> bool {
        self.raycast(state, ray, ignore).is_some()
    }
}

/// Built-in query over the arena boxes, the floor and live bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct ArenaQuery;

impl SpatialQuery for ArenaQuery {
    fn raycast(&self, state: &GameState, ray: &Ray, ignore: &Ignore) -> Option<RayHit> {
        let (o, d, max) = (ray.origin, ray.direction, ray.max_distance);
        if d == Vec3::ZERO {
            return None;
        }

        let mut best: Option<(f32, HitTarget)> = None;
        let mut consider = |t: Option<f32>, target: HitTarget| {
            if let Some(t) = t {
                if best.is_none_or(|(bt, _)| t < bt) {
                    best = Some((t, target));
                }
            }
        };

        consider(ray_ground(o, d, max), HitTarget::Ground);
        for (i, ob) in state.obstacles.iter().enumerate() {
            consider(ray_aabb(o, d, max, &ob.bounds), HitTarget::Obstacle(i));
        }
        for (id, enemy) in state.enemies.iter() {
            if ignore.enemy == Some(id) {
                continue;
            }
            consider(ray_aabb(o, d, max, &enemy.body()), HitTarget::Enemy(id));
        }
        if !ignore.player {
            consider(ray_aabb(o, d, max, &state.player.body()), HitTarget::Player);
        }

        best.map(|(t, target)| RayHit {
            target,
            point: ray.at(t),
            distance: t,
        })
    }

    fn overlap_sphere(&self, state: &GameState, center: Vec3, radius: f32) -> Vec<HitTarget> {
        let mut hits = Vec::new();
        if sphere_aabb_overlap(center, radius, &state.player.body()) {
            hits.push(HitTarget::Player);
        }
        for (id, enemy) in state.enemies.iter() {
            if sphere_aabb_overlap(center, radius, &enemy.body()) {
                hits.push(HitTarget::Enemy(id));
            }
        }
        for (i, ob) in state.obstacles.iter().enumerate() {
            if sphere_aabb_overlap(center, radius, &ob.bounds) {
                hits.push(HitTarget::Obstacle(i));
            }
        }
        if center.y - radius <= 0.0 {
            hits.push(HitTarget::Ground);
        }
        hits
    }
}
