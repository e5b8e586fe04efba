use crate::{
    bvh::{BvhRay, Primitive},
    geometry::{FloatType, Ray, WorldBox, WorldPoint},
    shape::{Intersection, Shape},
};

/// Non-owning handle that lets the hierarchy store a shape.
#[derive(Copy, Clone, Debug)]
pub struct ShapePrimitive<'a> {
    shape: &'a dyn Shape,
}

impl<'a> ShapePrimitive<'a> {
    pub fn new(shape: &'a dyn Shape) -> ShapePrimitive<'a> {
        ShapePrimitive { shape }
    }

    pub fn shape(&self) -> &'a dyn Shape {
        self.shape
    }
}

impl<'a> Primitive for ShapePrimitive<'a> {
    type Intersection = Intersection<'a>;

    fn bounding_box(&self) -> WorldBox {
        self.shape.bounding_box().clone()
    }

    fn center(&self) -> WorldPoint {
        self.shape.bounding_box().center()
    }

    /// Hits outside of the ray's current distance range are misses, the traversal
    /// relies on this to not replace a closer hit with a further one.
    fn intersect(&self, ray: &BvhRay) -> Option<(FloatType, Intersection<'a>)> {
        let hit = self.shape.intersect(&Ray::from(ray))?;
        (ray.tmin..=ray.tmax)
            .contains(&hit.t)
            .then_some((hit.t, hit))
    }
}

impl From<&BvhRay> for Ray {
    fn from(ray: &BvhRay) -> Self {
        Ray::new(ray.origin, ray.direction)
    }
}

impl From<&Ray> for BvhRay {
    fn from(ray: &Ray) -> Self {
        BvhRay::new(ray.origin, ray.direction)
    }
}
