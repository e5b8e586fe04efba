mod cuboid;
mod cylinder;
mod sphere;
mod triangle;

pub use cuboid::Cuboid;
pub use cylinder::Cylinder;
pub use sphere::Sphere;
pub use triangle::Triangle;

use nalgebra::Unit;
use thiserror::Error;

use crate::geometry::{FloatType, Ray, WorldBox, WorldPoint, WorldVector};

/// Opaque material handle, stored by shapes and handed back with hits.
pub type MaterialId = usize;

/// Renderable primitive
pub trait Shape: std::fmt::Debug + Send + Sync {
    /// Nearest intersection of the ray with the shape that is at least `EPSILON` away.
    fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>>;

    /// Box containing the whole surface, fixed at construction.
    fn bounding_box(&self) -> &WorldBox;

    fn material(&self) -> MaterialId;
}

/// Ray hit on a shape surface.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: FloatType,
    pub point: WorldPoint,
    pub normal: Unit<WorldVector>,
    pub shape: &'a dyn Shape,
}

impl<'a> Intersection<'a> {
    /// Creates a hit at distance `t` along the ray, `normal` doesn't have to be normalized.
    pub fn new(
        shape: &'a dyn Shape,
        ray: &Ray,
        t: FloatType,
        normal: WorldVector,
    ) -> Intersection<'a> {
        Intersection {
            t,
            point: ray.point_at(t),
            normal: Unit::new_normalize(normal),
            shape,
        }
    }

    pub fn material(&self) -> MaterialId {
        self.shape.material()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Triangle needs exactly 3 vertices, got {0}")]
    VertexCount(usize),

    #[error("Triangle needs exactly 3 normals, got {0}")]
    NormalCount(usize),
}

/// Tests the ray against every shape and returns the closest hit.
pub fn closest_hit<'a, S: Shape + ?Sized + 'a>(
    shapes: impl IntoIterator<Item = &'a S>,
    ray: &Ray,
) -> Option<Intersection<'a>> {
    shapes
        .into_iter()
        .filter_map(|shape| shape.intersect(ray))
        .min_by(|a, b| a.t.total_cmp(&b.t))
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::geometry::EPSILON;
    use assert2::{assert, let_assert};
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    const TOLERANCE: FloatType = 1e-3;

    /// Checks the invariants every hit must satisfy.
    pub fn check_hit(hit: &Intersection, ray: &Ray) {
        let expected_point = ray.point_at(hit.t);
        let scale = 1.0 + expected_point.coords.norm();
        assert!(hit.t >= EPSILON);
        assert!((hit.point - expected_point).norm() <= TOLERANCE * scale);
        assert!((hit.normal.norm() - 1.0).abs() <= TOLERANCE);
        assert!(hit.normal.iter().all(|x| x.is_finite()));
    }

    /// Shoots random rays from around the shape and checks that every hit lies in the
    /// declared bounding box.
    pub fn check_bounding_box(shape: &dyn Shape, seed: u64) {
        const RAY_COUNT: usize = 1000;

        let bb = shape.bounding_box();
        let center = bb.center();
        let extent = bb.size().norm().max(1.0);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut hit_count = 0;

        for _ in 0..RAY_COUNT {
            let mut random_vector = || {
                WorldVector::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                )
            };
            let origin = center + random_vector() * (2.0 * extent);
            // Aim near the box center so that a reasonable fraction of rays hit
            let target = center + random_vector() * (0.5 * extent);
            let ray = Ray::new(origin, target - origin);

            if let Some(hit) = shape.intersect(&ray) {
                hit_count += 1;
                check_hit(&hit, &ray);
                assert!(
                    bb.contains(&hit.point, TOLERANCE * extent),
                    "{:?} must be in {bb:?}",
                    hit.point
                );
            }
        }

        assert!(hit_count > 0, "No random ray hit the shape");
    }

    #[test]
    fn closest_hit_picks_nearest() {
        let shapes: Vec<Box<dyn Shape>> = vec![
            Box::new(Sphere::new(WorldPoint::new(0.0, 0.0, 10.0), 1.0, 0)),
            Box::new(Sphere::new(WorldPoint::new(0.0, 0.0, 5.0), 1.0, 1)),
            Box::new(Sphere::new(WorldPoint::new(5.0, 0.0, 5.0), 1.0, 2)),
        ];
        let ray = Ray::new(WorldPoint::origin(), WorldVector::z());

        let_assert!(Some(hit) = closest_hit(shapes.iter().map(|s| &**s), &ray));
        assert!(hit.material() == 1);
        assert!((hit.t - 4.0).abs() < 1e-6);
    }

    #[test]
    fn closest_hit_miss() {
        let shapes: Vec<Box<dyn Shape>> =
            vec![Box::new(Sphere::new(WorldPoint::new(0.0, 0.0, -10.0), 1.0, 0))];
        let ray = Ray::new(WorldPoint::origin(), WorldVector::z());

        assert!(closest_hit(shapes.iter().map(|s| &**s), &ray).is_none());
    }

    #[test]
    fn intersection_is_consistent() {
        let sphere = Sphere::new(WorldPoint::origin(), 1.0, 7);
        let ray = Ray::new(WorldPoint::new(1.0, 2.0, 3.0), WorldVector::new(0.0, 0.0, 2.0));
        let hit = Intersection::new(&sphere, &ray, 1.5, WorldVector::new(0.0, 3.0, 0.0));

        assert!(hit.point == WorldPoint::new(1.0, 2.0, 6.0));
        assert!(*hit.normal == WorldVector::y());
        assert!(hit.material() == 7);
    }
}
