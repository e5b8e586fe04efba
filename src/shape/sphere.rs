use crate::geometry::{EpsilonTest, FloatType, Ray, WorldBox, WorldPoint, WorldVector};

use super::{Intersection, MaterialId, Shape};

#[derive(Clone, Debug)]
pub struct Sphere {
    center: WorldPoint,
    radius: FloatType,
    material: MaterialId,
    bounding_box: WorldBox,
}

impl Sphere {
    pub fn new(center: WorldPoint, radius: FloatType, material: MaterialId) -> Sphere {
        let r_vec = WorldVector::repeat(radius);
        let mut bounding_box = WorldBox::from_point(center + r_vec);
        bounding_box.extend(&(center - r_vec));

        Sphere {
            center,
            radius,
            material,
            bounding_box,
        }
    }

    pub fn center(&self) -> WorldPoint {
        self.center
    }

    pub fn radius(&self) -> FloatType {
        self.radius
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let f = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * f.dot(&ray.direction);
        let c = f.dot(&f) - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;

        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t_minus = (-b - sqrt_disc) / (2.0 * a);
        let t_plus = (-b + sqrt_disc) / (2.0 * a);
        let (t, _) = EpsilonTest::Inclusive.nearest_root(t_minus, t_plus)?;

        // Not flipped for rays starting inside, the normal always points away from the center.
        let normal = ray.point_at(t) - self.center;
        Some(Intersection::new(self, ray, t, normal))
    }

    fn bounding_box(&self) -> &WorldBox {
        &self.bounding_box
    }

    fn material(&self) -> MaterialId {
        self.material
    }
}
