use crate::geometry::{EpsilonTest, Interval, Ray, Slab, WorldBox, WorldPoint, WorldVector};

use super::{Intersection, MaterialId, Shape};

/// Axis aligned box, intersected as three slabs.
#[derive(Clone, Debug)]
pub struct Cuboid {
    corner: WorldPoint,
    diagonal: WorldVector,
    material: MaterialId,

    slabs: [Slab; 3],
    bounding_box: WorldBox,
}

impl Cuboid {
    /// Creates a box spanning from `corner` to `corner + diagonal`.
    /// Components of the diagonal may be negative.
    pub fn new(corner: WorldPoint, diagonal: WorldVector, material: MaterialId) -> Cuboid {
        let slabs = std::array::from_fn(|axis| {
            Slab::new(
                WorldVector::ith(axis, 1.0),
                -corner[axis],
                -corner[axis] - diagonal[axis],
            )
        });

        let mut bounding_box = WorldBox::from_point(corner);
        bounding_box.extend(&(corner + diagonal));

        Cuboid {
            corner,
            diagonal,
            material,
            slabs,
            bounding_box,
        }
    }

    pub fn corner(&self) -> WorldPoint {
        self.corner
    }

    pub fn diagonal(&self) -> WorldVector {
        self.diagonal
    }
}

impl Shape for Cuboid {
    fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let combined = self
            .slabs
            .iter()
            .map(|slab| Interval::from_slab(ray, slab))
            .fold(Interval::everything(), |acc, interval| acc.intersect(&interval));

        // Strictly further than EPSILON, unlike the curved shapes
        let (t, normal) = combined.nearest(EpsilonTest::Exclusive)?;
        Some(Intersection::new(self, ray, t, normal))
    }

    fn bounding_box(&self) -> &WorldBox {
        &self.bounding_box
    }

    fn material(&self) -> MaterialId {
        self.material
    }
}
