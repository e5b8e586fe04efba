use super::{BarycentricCoordinates, EpsilonTest, FloatType, Ray, Triangle, WorldPoint};

impl Triangle<WorldPoint> {
    /// Calculates ray intersection with the (two sided) triangle.
    /// Returns distance along ray and barycentric uv coordinates of the hit.
    /// Adapted from https://en.wikipedia.org/wiki/M%C3%B6ller%E2%80%93Trumbore_intersection_algorithm#Rust_implementation
    pub fn intersect(&self, ray: &Ray) -> Option<(FloatType, BarycentricCoordinates<FloatType>)> {
        let [e1, e2] = self.edges();
        let s = ray.origin - self[0];

        let ray_cross_e2 = ray.direction.cross(&e2);
        let det = ray_cross_e2.dot(&e1);

        // Only an exactly parallel ray is rejected here, nearly parallel ones
        // fail the barycentric bounds below.
        if det == 0.0 {
            return None;
        }

        let u = ray_cross_e2.dot(&s) / det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let s_cross_e1 = s.cross(&e1);
        let v = ray.direction.dot(&s_cross_e1) / det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(&s_cross_e1) / det;
        if !EpsilonTest::Inclusive.accepts(t) {
            return None;
        }

        Some((t, BarycentricCoordinates { u, v }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{EPSILON, WorldVector};
    use assert2::{assert, let_assert};
    use test_case::test_case;

    fn unit_triangle() -> Triangle<WorldPoint> {
        Triangle::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldPoint::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn hit_from_above() {
        let ray = Ray::new(WorldPoint::new(0.25, 0.25, 1.0), WorldVector::new(0.0, 0.0, -1.0));
        let_assert!(Some((t, uv)) = unit_triangle().intersect(&ray));

        assert!(t == 1.0);
        assert!(uv == BarycentricCoordinates { u: 0.25, v: 0.25 });
    }

    #[test]
    fn hit_from_below() {
        let ray = Ray::new(WorldPoint::new(0.25, 0.25, -2.0), WorldVector::new(0.0, 0.0, 4.0));
        let_assert!(Some((t, _)) = unit_triangle().intersect(&ray));

        assert!(t == 0.5);
    }

    #[test_case(0.6, 0.6 ; "beyond_hypotenuse")]
    #[test_case(-0.1, 0.5 ; "negative_u")]
    #[test_case(0.5, -0.1 ; "negative_v")]
    #[test_case(1.5, 0.0 ; "u_above_one")]
    fn miss_outside(x: FloatType, y: FloatType) {
        let ray = Ray::new(WorldPoint::new(x, y, 1.0), WorldVector::new(0.0, 0.0, -1.0));
        assert!(unit_triangle().intersect(&ray).is_none());
    }

    #[test]
    fn miss_parallel() {
        let ray = Ray::new(WorldPoint::new(-1.0, 0.25, 0.0), WorldVector::new(1.0, 0.0, 0.0));
        assert!(unit_triangle().intersect(&ray).is_none());
    }

    #[test]
    fn miss_behind() {
        let ray = Ray::new(WorldPoint::new(0.25, 0.25, 1.0), WorldVector::new(0.0, 0.0, 1.0));
        assert!(unit_triangle().intersect(&ray).is_none());
    }

    #[test]
    fn miss_too_close() {
        let ray = Ray::new(
            WorldPoint::new(0.25, 0.25, EPSILON / 2.0),
            WorldVector::new(0.0, 0.0, -1.0),
        );
        assert!(unit_triangle().intersect(&ray).is_none());
    }
}
