mod aabb;
mod interval;
mod ray_triangle_intersection;
mod triangle;

pub use aabb::AABB;
pub use interval::{Endpoint, EpsilonTest, Interval, Slab};
pub use triangle::{BarycentricCoordinates, Triangle};

pub type FloatType = f32;

pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;
pub type WorldBox = AABB<WorldPoint>;

/// Minimum accepted hit distance along a ray.
/// Shared by all shapes so that self intersections are rejected consistently.
pub const EPSILON: FloatType = 1e-4;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Direction of the ray, not necessarily normalized.
    pub direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        Ray { origin, direction }
    }

    pub fn point_at(&self, t: FloatType) -> WorldPoint {
        self.origin + self.direction * t
    }
}
