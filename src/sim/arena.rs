//! Procedural arena layout
//!
//! Four boundary walls plus a scatter of tall walls and low cover, kept clear
//! of the player spawn at the origin.

use glam::Vec3;
use rand::Rng;

use super::collision::Aabb;
use crate::consts::*;

/// Obstacle categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Arena boundary
    Boundary,
    /// Tall wall that blocks sight lines
    Wall,
    /// Low cover
    Cover,
}

/// A static solid box
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub bounds: Aabb,
}

impl Obstacle {
    /// Box resting on the floor, centered at (x, z)
    fn grounded(kind: ObstacleKind, x: f32, z: f32, size: Vec3) -> Self {
        let center = Vec3::new(x, size.y / 2.0, z);
        Self {
            kind,
            bounds: Aabb::from_center_half(center, size / 2.0),
        }
    }
}

/// The four walls enclosing the arena
pub fn boundary_walls() -> Vec<Obstacle> {
    let span = ARENA_HALF_EXTENT * 2.0;
    let e = ARENA_HALF_EXTENT;
    vec![
        Obstacle::grounded(ObstacleKind::Boundary, 0.0, e, Vec3::new(span, WALL_HEIGHT, 1.0)),
        Obstacle::grounded(ObstacleKind::Boundary, 0.0, -e, Vec3::new(span, WALL_HEIGHT, 1.0)),
        Obstacle::grounded(ObstacleKind::Boundary, e, 0.0, Vec3::new(1.0, WALL_HEIGHT, span)),
        Obstacle::grounded(ObstacleKind::Boundary, -e, 0.0, Vec3::new(1.0, WALL_HEIGHT, span)),
    ]
}

/// Generate a fresh arena layout
pub fn generate_arena<R: Rng>(rng: &mut R) -> Vec<Obstacle> {
    let mut obstacles = boundary_walls();

    for _ in 0..OBSTACLE_ATTEMPTS {
        let x = rng.random_range(-OBSTACLE_HALF_EXTENT..=OBSTACLE_HALF_EXTENT) as f32;
        let z = rng.random_range(-OBSTACLE_HALF_EXTENT..=OBSTACLE_HALF_EXTENT) as f32;
        if x.hypot(z) < OBSTACLE_CLEAR_RADIUS {
            continue;
        }

        let (kind, size) = if rng.random_bool(0.3) {
            let size = Vec3::new(
                rng.random_range(2..=4) as f32,
                rng.random_range(4..=8) as f32,
                rng.random_range(2..=4) as f32,
            );
            (ObstacleKind::Wall, size)
        } else {
            let size = Vec3::new(
                rng.random_range(2..=5) as f32,
                rng.random_range(1..=2) as f32,
                rng.random_range(2..=5) as f32,
            );
            (ObstacleKind::Cover, size)
        };
        obstacles.push(Obstacle::grounded(kind, x, z, size));
    }

    log::debug!("Generated arena with {} obstacles", obstacles.len());
    obstacles
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_boundary_walls_enclose_arena() {
        let walls = boundary_walls();
        assert_eq!(walls.len(), 4);
        for w in &walls {
            assert_eq!(w.kind, ObstacleKind::Boundary);
            assert!((w.bounds.min.y).abs() < 1e-6);
            assert!((w.bounds.max.y - WALL_HEIGHT).abs() < 1e-6);
        }
    }

    #[test]
    fn test_obstacles_avoid_spawn_and_stay_grounded() {
        let mut rng = Pcg32::seed_from_u64(7);
        let arena = generate_arena(&mut rng);
        assert!(arena.len() >= 4);
        assert!(arena.len() <= 4 + OBSTACLE_ATTEMPTS as usize);
        for ob in arena.iter().filter(|o| o.kind != ObstacleKind::Boundary) {
            let c = ob.bounds.center();
            assert!(c.x.hypot(c.z) >= OBSTACLE_CLEAR_RADIUS);
            assert!(ob.bounds.min.y.abs() < 1e-6);
            let h = ob.bounds.max.y;
            match ob.kind {
                ObstacleKind::Wall => assert!((4.0..=8.0).contains(&h)),
                ObstacleKind::Cover => assert!((1.0..=2.0).contains(&h)),
                ObstacleKind::Boundary => unreachable!(),
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = generate_arena(&mut Pcg32::seed_from_u64(99));
        let b = generate_arena(&mut Pcg32::seed_from_u64(99));
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.bounds, y.bounds);
        }
    }
}
