use assert2::assert;
use nalgebra::{Matrix3, Rotation3};

use crate::geometry::{
    EpsilonTest, FloatType, Interval, Ray, Slab, WorldBox, WorldPoint, WorldVector,
};

use super::{Intersection, MaterialId, Shape};

/// Finite cylinder with flat caps.
/// Intersections are calculated in a local frame where the axis is +Z and the base is the origin.
#[derive(Clone, Debug)]
pub struct Cylinder {
    base: WorldPoint,
    axis: WorldVector,
    radius: FloatType,
    material: MaterialId,

    /// World to local rotation
    to_local: Rotation3<FloatType>,
    caps: Slab,
    bounding_box: WorldBox,
}

impl Cylinder {
    /// Creates a cylinder going from `base` to `base + axis`.
    /// Panics if the axis is zero.
    pub fn new(
        base: WorldPoint,
        axis: WorldVector,
        radius: FloatType,
        material: MaterialId,
    ) -> Cylinder {
        let length = axis.norm();
        assert!(length > 0.0, "Cylinder axis must be non-zero");

        let r_vec = WorldVector::repeat(radius);
        let mut bounding_box = WorldBox::from_point(base + r_vec);
        bounding_box
            .extend(&(base - r_vec))
            .extend(&(base + axis + r_vec))
            .extend(&(base + axis - r_vec));

        Cylinder {
            base,
            axis,
            radius,
            material,
            to_local: rotation_to_z(&axis),
            caps: Slab::new(WorldVector::z(), 0.0, -length),
            bounding_box,
        }
    }

    pub fn base(&self) -> WorldPoint {
        self.base
    }

    pub fn axis(&self) -> WorldVector {
        self.axis
    }

    pub fn radius(&self) -> FloatType {
        self.radius
    }

    /// Range of the local ray that is inside the infinite round tube, with radial normals.
    fn tube_interval(&self, ray: &Ray) -> Option<Interval> {
        let q = &ray.origin;
        let d = &ray.direction;
        let a = d.x * d.x + d.y * d.y;
        let b = 2.0 * (d.x * q.x + d.y * q.y);
        let c = q.x * q.x + q.y * q.y - self.radius * self.radius;

        if a == 0.0 {
            // Parallel to the axis, the ray stays either inside or outside the tube
            return if c <= 0.0 {
                Some(Interval::everything())
            } else {
                None
            };
        }

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t0 = (-b - sqrt_disc) / (2.0 * a);
        let t1 = (-b + sqrt_disc) / (2.0 * a);
        let radial = |t: FloatType| WorldVector::new(q.x + t * d.x, q.y + t * d.y, 0.0);

        Some(Interval::new(t0, t1, radial(t0), radial(t1)))
    }
}

/// Rotation that maps `axis` onto +Z.
/// The helper axis is X, unless the axis is parallel to it, then Z is used.
fn rotation_to_z(axis: &WorldVector) -> Rotation3<FloatType> {
    let n_a = axis.normalize();
    let n_b = WorldVector::x()
        .cross(&n_a)
        .try_normalize(0.0)
        .unwrap_or_else(|| WorldVector::z().cross(&n_a).normalize());
    let c = n_a.cross(&n_b);

    // Columns are the local axes in world coordinates, this is the local to world rotation.
    Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[n_b, c, n_a])).inverse()
}

impl Shape for Cylinder {
    fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let local_ray = Ray::new(
            WorldPoint::from(self.to_local * (ray.origin - self.base)),
            self.to_local * ray.direction,
        );

        let caps = Interval::from_slab(&local_ray, &self.caps);
        let tube = self.tube_interval(&local_ray)?;
        let (t, local_normal) = caps.intersect(&tube).nearest(EpsilonTest::Inclusive)?;

        let normal = self.to_local.inverse_transform_vector(&local_normal);
        Some(Intersection::new(self, ray, t, normal))
    }

    fn bounding_box(&self) -> &WorldBox {
        &self.bounding_box
    }

    fn material(&self) -> MaterialId {
        self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::{EPSILON, test::RayWrapper},
        shape::test::{check_bounding_box, check_hit},
    };
    use assert2::{assert, let_assert};
    use test_case::test_case;
    use test_strategy::proptest;

    const TOLERANCE: FloatType = 1e-5;

    fn vector_close(a: &WorldVector, b: &WorldVector) -> bool {
        (a - b).norm() < TOLERANCE
    }

    fn z_cylinder() -> Cylinder {
        Cylinder::new(WorldPoint::origin(), WorldVector::new(0.0, 0.0, 2.0), 1.0, 0)
    }

    #[test_case(WorldVector::new(0.0, 0.0, 3.0) ; "z")]
    #[test_case(WorldVector::new(2.0, 0.0, 0.0) ; "x_needs_fallback")]
    #[test_case(WorldVector::new(-1.0, 0.0, 0.0) ; "negative_x_needs_fallback")]
    #[test_case(WorldVector::new(1.0, 2.0, -3.0) ; "oblique")]
    fn rotation_maps_axis_to_z(axis: WorldVector) {
        let rotation = rotation_to_z(&axis);
        let rotated = rotation * axis.normalize();

        assert!(vector_close(&rotated, &WorldVector::z()), "{rotated:?}");
        assert!(rotation.matrix().iter().all(|x| x.is_finite()));
        assert!((rotation.matrix().determinant() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn side_hit() {
        let ray = Ray::new(WorldPoint::new(-5.0, 0.0, 1.0), WorldVector::x());
        let shape = z_cylinder();
        let_assert!(Some(hit) = shape.intersect(&ray));

        assert!((hit.t - 4.0).abs() < TOLERANCE);
        assert!(vector_close(&hit.point.coords, &WorldVector::new(-1.0, 0.0, 1.0)));
        assert!(vector_close(&hit.normal, &-WorldVector::x()));
    }

    #[test]
    fn cap_hit() {
        let ray = Ray::new(WorldPoint::new(0.5, 0.0, 5.0), WorldVector::new(0.0, 0.0, -1.0));
        let shape = z_cylinder();
        let_assert!(Some(hit) = shape.intersect(&ray));

        assert!((hit.t - 3.0).abs() < TOLERANCE);
        assert!(vector_close(&hit.normal, &WorldVector::z()));
    }

    #[test]
    fn bottom_cap_hit_at_epsilon() {
        // The parallel ray starts exactly EPSILON below the bottom cap, which is still accepted
        let ray = Ray::new(WorldPoint::new(0.0, 0.0, -EPSILON), WorldVector::z());
        let shape = z_cylinder();
        let_assert!(Some(hit) = shape.intersect(&ray));

        assert!(hit.t == EPSILON);
        assert!(vector_close(&hit.normal, &-WorldVector::z()));
    }

    #[test]
    fn parallel_outside_misses() {
        let ray = Ray::new(WorldPoint::new(2.0, 0.0, -5.0), WorldVector::z());
        assert!(z_cylinder().intersect(&ray).is_none());
    }

    #[test]
    fn passes_beside_caps() {
        // Crosses the infinite tube, but above the top cap
        let ray = Ray::new(WorldPoint::new(-5.0, 0.0, 3.0), WorldVector::x());
        assert!(z_cylinder().intersect(&ray).is_none());
    }

    #[test]
    fn from_inside() {
        let ray = Ray::new(WorldPoint::new(0.0, 0.0, 1.0), WorldVector::y());
        let shape = z_cylinder();
        let_assert!(Some(hit) = shape.intersect(&ray));

        assert!((hit.t - 1.0).abs() < TOLERANCE);
        assert!(vector_close(&hit.normal, &WorldVector::y()));
    }

    #[test]
    fn x_axis_cylinder() {
        let cylinder = Cylinder::new(
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldVector::new(4.0, 0.0, 0.0),
            0.5,
            0,
        );

        let side = Ray::new(WorldPoint::new(3.0, 0.0, 5.0), WorldVector::new(0.0, 0.0, -1.0));
        let_assert!(Some(hit) = cylinder.intersect(&side));
        assert!((hit.t - 4.5).abs() < TOLERANCE);
        assert!(vector_close(&hit.normal, &WorldVector::z()));

        let cap = Ray::new(WorldPoint::new(-1.0, 0.1, 0.1), WorldVector::x());
        let_assert!(Some(hit) = cylinder.intersect(&cap));
        assert!((hit.t - 2.0).abs() < TOLERANCE);
        assert!(vector_close(&hit.normal, &-WorldVector::x()));
    }

    #[test]
    fn bounding_box() {
        let bb = z_cylinder().bounding_box().clone();

        assert!(bb.min == WorldPoint::new(-1.0, -1.0, -1.0));
        assert!(bb.max == WorldPoint::new(1.0, 1.0, 3.0));
    }

    #[test]
    #[should_panic]
    fn zero_axis() {
        Cylinder::new(WorldPoint::origin(), WorldVector::zeros(), 1.0, 0);
    }

    #[test]
    fn hits_stay_in_bounding_box() {
        check_bounding_box(&z_cylinder(), 1);
        check_bounding_box(
            &Cylinder::new(
                WorldPoint::new(1.0, 2.0, 3.0),
                WorldVector::new(-2.0, 1.0, 0.5),
                0.3,
                0,
            ),
            2,
        );
        check_bounding_box(
            &Cylinder::new(WorldPoint::origin(), WorldVector::new(5.0, 0.0, 0.0), 1.0, 0),
            3,
        );
    }

    #[proptest]
    fn hit_invariants(ray: RayWrapper) {
        let cylinder = Cylinder::new(
            WorldPoint::new(0.5, -0.5, 0.0),
            WorldVector::new(1.0, 1.0, 2.0),
            1.0,
            0,
        );
        if let Some(hit) = cylinder.intersect(&ray) {
            check_hit(&hit, &ray);
        }
    }
}
