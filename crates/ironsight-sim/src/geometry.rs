//! Static collision geometry and ray intersection tests.
//!
//! `StaticGeometry` is the in-crate [`WorldGeometry`] used by level setup:
//! a flat list of axis-aligned boxes and spheres, enumerated in insertion
//! order. The free functions are also used by the resolver to test hostile
//! bounding spheres.

use glam::Vec3;

use ironsight_core::types::{CollidableHandle, Ray, RayHit};

use crate::backend::WorldGeometry;

/// A collidable primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Aabb { min: Vec3, max: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

/// Static world geometry. Handles are assigned sequentially and double as
/// indices, so the enumeration order is the insertion order.
#[derive(Debug, Default)]
pub struct StaticGeometry {
    shapes: Vec<Shape>,
}

impl StaticGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis-aligned box.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3) -> CollidableHandle {
        self.push(Shape::Aabb {
            min: center - half_extents,
            max: center + half_extents,
        })
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32) -> CollidableHandle {
        self.push(Shape::Sphere { center, radius })
    }

    pub fn shape(&self, handle: CollidableHandle) -> Option<&Shape> {
        self.shapes.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Remove all geometry. Previously issued handles become invalid.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    fn push(&mut self, shape: Shape) -> CollidableHandle {
        let handle = CollidableHandle(self.shapes.len() as u32);
        self.shapes.push(shape);
        handle
    }
}

impl WorldGeometry for StaticGeometry {
    fn list_collidables(&self) -> Vec<CollidableHandle> {
        (0..self.shapes.len() as u32).map(CollidableHandle).collect()
    }

    fn intersect_ray(
        &self,
        ray: &Ray,
        max_distance: f32,
        handle: CollidableHandle,
    ) -> Option<RayHit> {
        match *self.shape(handle)? {
            Shape::Aabb { min, max } => ray_aabb(ray, max_distance, min, max),
            Shape::Sphere { center, radius } => ray_sphere(ray, max_distance, center, radius),
        }
    }
}

/// Slab test. A ray starting inside the box reports the exit face.
pub fn ray_aabb(ray: &Ray, max_distance: f32, min: Vec3, max: Vec3) -> Option<RayHit> {
    let origin = ray.origin.to_array();
    let dir = ray.direction.get().to_array();
    let lo = min.to_array();
    let hi = max.to_array();

    let mut t_enter = f32::NEG_INFINITY;
    let mut enter_normal = Vec3::ZERO;
    let mut t_exit = f32::INFINITY;
    let mut exit_normal = Vec3::ZERO;

    for axis in 0..3 {
        if dir[axis].abs() < f32::EPSILON {
            // Parallel to this slab: must already be inside it.
            if origin[axis] < lo[axis] || origin[axis] > hi[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir[axis];
        let mut near = (lo[axis] - origin[axis]) * inv;
        let mut far = (hi[axis] - origin[axis]) * inv;
        let mut axis_normal = Vec3::ZERO;
        axis_normal[axis] = 1.0;
        // Entering through the low face means the outward normal points down the axis.
        let (mut near_normal, mut far_normal) = (-axis_normal, axis_normal);
        if near > far {
            std::mem::swap(&mut near, &mut far);
            std::mem::swap(&mut near_normal, &mut far_normal);
        }

        if near > t_enter {
            t_enter = near;
            enter_normal = near_normal;
        }
        if far < t_exit {
            t_exit = far;
            exit_normal = far_normal;
        }
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    let (distance, normal) = if t_enter >= 0.0 {
        (t_enter, enter_normal)
    } else {
        (t_exit, exit_normal)
    };
    if distance > max_distance {
        return None;
    }

    Some(RayHit {
        distance,
        point: ray.at(distance),
        normal,
    })
}

/// Ray/sphere intersection. A ray starting inside reports the exit point.
pub fn ray_sphere(ray: &Ray, max_distance: f32, center: Vec3, radius: f32) -> Option<RayHit> {
    let dir = ray.direction.get();
    let oc = ray.origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let root = disc.sqrt();
    let near = -b - root;
    let far = -b + root;
    let distance = if near >= 0.0 {
        near
    } else if far >= 0.0 {
        far
    } else {
        return None;
    };
    if distance > max_distance {
        return None;
    }

    let point = ray.at(distance);
    let normal = (point - center).try_normalize().unwrap_or(-dir);
    Some(RayHit {
        distance,
        point,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironsight_core::types::Direction;

    fn ray(origin: Vec3, dir: Vec3) -> Ray {
        Ray::new(origin, Direction::new(dir).unwrap())
    }

    #[test]
    fn test_aabb_front_face() {
        let hit = ray_aabb(
            &ray(Vec3::new(0.0, 0.0, -5.0), Vec3::Z),
            100.0,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        )
        .expect("ray along +Z should hit the box");

        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert!((hit.point.z + 1.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::NEG_Z);
    }

    #[test]
    fn test_aabb_miss_and_range() {
        let min = Vec3::splat(-1.0);
        let max = Vec3::splat(1.0);
        // Offset sideways: parallel slab rejects.
        assert!(ray_aabb(&ray(Vec3::new(3.0, 0.0, -5.0), Vec3::Z), 100.0, min, max).is_none());
        // Pointing away.
        assert!(ray_aabb(&ray(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z), 100.0, min, max).is_none());
        // Beyond max distance.
        assert!(ray_aabb(&ray(Vec3::new(0.0, 0.0, -5.0), Vec3::Z), 3.9, min, max).is_none());
    }

    #[test]
    fn test_aabb_diagonal_hits_nearest_face() {
        let hit = ray_aabb(
            &ray(Vec3::new(-5.0, 0.5, 0.0), Vec3::new(1.0, -0.1, 0.0)),
            100.0,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        )
        .unwrap();
        assert_eq!(hit.normal, Vec3::NEG_X);
        assert!((hit.point.x + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_aabb_from_inside_reports_exit() {
        let hit = ray_aabb(&ray(Vec3::ZERO, Vec3::Y), 100.0, Vec3::splat(-2.0), Vec3::splat(2.0))
            .unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_sphere_hit_normal_points_outward() {
        let hit = ray_sphere(&ray(Vec3::new(0.0, 0.0, -10.0), Vec3::Z), 100.0, Vec3::ZERO, 1.0)
            .unwrap();
        assert!((hit.distance - 9.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        assert!(
            ray_sphere(&ray(Vec3::new(0.0, 2.0, -10.0), Vec3::Z), 100.0, Vec3::ZERO, 1.0).is_none()
        );
        assert!(
            ray_sphere(&ray(Vec3::new(0.0, 0.0, -10.0), Vec3::Z), 8.5, Vec3::ZERO, 1.0).is_none()
        );
    }

    #[test]
    fn test_static_geometry_enumerates_in_insertion_order() {
        let mut geometry = StaticGeometry::new();
        let a = geometry.add_box(Vec3::ZERO, Vec3::ONE);
        let b = geometry.add_sphere(Vec3::new(0.0, 0.0, 5.0), 1.0);
        assert_eq!(geometry.list_collidables(), vec![a, b]);

        let hit = geometry
            .intersect_ray(&ray(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z), 100.0, b)
            .unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert!(geometry
            .intersect_ray(&ray(Vec3::ZERO, Vec3::Z), 100.0, CollidableHandle(99))
            .is_none());
    }
}
