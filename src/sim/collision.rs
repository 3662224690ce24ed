//! Ray and overlap tests against axis-aligned boxes
//!
//! Every solid in the arena (walls, cover, enemy and player bodies) is an
//! axis-aligned box; the floor is the plane y = 0.

use glam::Vec3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half(center: Vec3, half: Vec3) -> Self {
        let half = half.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Closest point of the box to `p`
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }
}

/// Distance along a ray to where it enters the box.
///
/// `dir` must be normalized. Rays starting inside the box do not hit it.
/// Returns `None` on a miss or if the entry point is beyond `max_distance`.
pub fn ray_aabb(origin: Vec3, dir: Vec3, max_distance: f32, aabb: &Aabb) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if d.abs() < 1e-8 {
            // Parallel to this slab: must already be between the planes
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (lo - o) * inv;
        let mut t1 = (hi - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_enter < 0.0 || t_enter > max_distance {
        return None;
    }
    Some(t_enter)
}

/// Distance along a ray to the floor plane y = 0
pub fn ray_ground(origin: Vec3, dir: Vec3, max_distance: f32) -> Option<f32> {
    if dir.y >= -1e-8 || origin.y < 0.0 {
        return None;
    }
    let t = -origin.y / dir.y;
    (t <= max_distance).then_some(t)
}

/// Whether a sphere overlaps a box
pub fn sphere_aabb_overlap(center: Vec3, radius: f32, aabb: &Aabb) -> bool {
    aabb.closest_point(center).distance_squared(center) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(x: f32, z: f32) -> Aabb {
        Aabb::from_center_half(Vec3::new(x, 1.0, z), Vec3::splat(1.0))
    }

    #[test]
    fn test_ray_hits_box_in_front() {
        let b = unit_box_at(0.0, 5.0);
        let t = ray_aabb(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 10.0, &b).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_respects_max_distance() {
        let b = unit_box_at(0.0, 5.0);
        assert!(ray_aabb(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 3.0, &b).is_none());
    }

    #[test]
    fn test_ray_misses_box_behind_or_beside() {
        let b = unit_box_at(0.0, -5.0);
        assert!(ray_aabb(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 10.0, &b).is_none());
        let b = unit_box_at(3.0, 5.0);
        assert!(ray_aabb(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 10.0, &b).is_none());
    }

    #[test]
    fn test_ray_from_inside_does_not_hit() {
        let b = unit_box_at(0.0, 0.0);
        assert!(ray_aabb(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 10.0, &b).is_none());
    }

    #[test]
    fn test_diagonal_ray() {
        let b = unit_box_at(5.0, 5.0);
        let dir = Vec3::new(1.0, 0.0, 1.0).normalize();
        let t = ray_aabb(Vec3::new(0.0, 1.0, 0.0), dir, 20.0, &b).unwrap();
        // Enters at the corner (4, 4)
        assert!((t - 4.0 * std::f32::consts::SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn test_ray_ground() {
        let dir = Vec3::new(0.0, -1.0, 1.0).normalize();
        let t = ray_ground(Vec3::new(0.0, 2.0, 0.0), dir, 100.0).unwrap();
        let p = Vec3::new(0.0, 2.0, 0.0) + dir * t;
        assert!(p.y.abs() < 1e-5);
        assert!((p.z - 2.0).abs() < 1e-5);
        assert!(ray_ground(Vec3::new(0.0, 2.0, 0.0), Vec3::Z, 100.0).is_none());
    }

    #[test]
    fn test_sphere_overlap() {
        let b = unit_box_at(0.0, 0.0);
        assert!(sphere_aabb_overlap(Vec3::new(1.2, 1.0, 0.0), 0.25, &b));
        assert!(!sphere_aabb_overlap(Vec3::new(1.5, 1.0, 0.0), 0.25, &b));
        assert!(sphere_aabb_overlap(Vec3::new(0.0, 1.0, 0.0), 0.25, &b));
    }

    #[test]
    fn test_from_center_half_takes_abs_extents() {
        let b = Aabb::from_center_half(Vec3::ONE, Vec3::splat(-2.0));
        assert_eq!(b.min, Vec3::splat(-1.0));
        assert_eq!(b.max, Vec3::splat(3.0));
        assert_eq!(b.center(), Vec3::ONE);
    }
}
