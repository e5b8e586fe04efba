use crate::geometry::{FloatType, WorldBox, WorldPoint, WorldVector};

use super::{BvhRay, Primitive};

/// Solid ball, only reports the ray entering it.
#[derive(Clone, Debug)]
pub struct Ball {
    pub center: WorldPoint,
    pub radius: FloatType,
}

impl Ball {
    pub fn new(center: WorldPoint, radius: FloatType) -> Ball {
        Ball { center, radius }
    }
}

impl Primitive for Ball {
    /// Hit point
    type Intersection = WorldPoint;

    fn bounding_box(&self) -> WorldBox {
        let r = WorldVector::repeat(self.radius);
        WorldBox::new(self.center - r, self.center + r)
    }

    fn center(&self) -> WorldPoint {
        self.center
    }

    fn intersect(&self, ray: &BvhRay) -> Option<(FloatType, WorldPoint)> {
        let oc = ray.origin - self.center;
        let a = ray.direction.norm_squared();
        let half_b = oc.dot(&ray.direction);
        let c = oc.norm_squared() - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let t = (-half_b - discriminant.sqrt()) / a;
        (ray.tmin <= t && t <= ray.tmax).then(|| (t, ray.origin + ray.direction * t))
    }
}

/// `n * n * n` unit balls on a grid with spacing 3, centered around the origin.
pub fn ball_grid(n: usize) -> Vec<Ball> {
    let offset = (n as FloatType - 1.0) * 1.5;
    itertools::iproduct!(0..n, 0..n, 0..n)
        .map(|(x, y, z)| {
            let p = WorldPoint::new(x as FloatType, y as FloatType, z as FloatType) * 3.0;
            Ball::new(p - WorldVector::repeat(offset), 1.0)
        })
        .collect()
}
