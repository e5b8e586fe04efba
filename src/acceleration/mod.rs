//! Nearest hit queries over a whole list of shapes.

mod shape_primitive;

pub use shape_primitive::ShapePrimitive;

use log::{debug, trace};

use crate::{
    bvh::{
        BuildSettings, Bvh, BvhRay, BvhStatistics, StackCache, compute_bounding_boxes_and_centers,
        compute_bounding_boxes_union,
    },
    geometry::{Ray, WorldBox},
    shape::{Intersection, Shape},
};

/// Bounding volume hierarchy over borrowed shapes.
/// Built once, read only afterwards.
#[derive(Clone, Debug)]
pub struct AccelerationIndex<'a> {
    primitives: Vec<ShapePrimitive<'a>>,
    bvh: Bvh,
}

impl<'a> AccelerationIndex<'a> {
    pub fn new(
        shapes: impl IntoIterator<Item = &'a dyn Shape>,
        settings: &BuildSettings,
    ) -> AccelerationIndex<'a> {
        let primitives = shapes.into_iter().map(ShapePrimitive::new).collect();
        AccelerationIndex::from_primitives(primitives, settings)
    }

    /// Builds the index with default settings.
    pub fn from_shapes(shapes: &'a [Box<dyn Shape>]) -> AccelerationIndex<'a> {
        let primitives = shapes
            .iter()
            .map(|shape| ShapePrimitive::new(shape.as_ref()))
            .collect();
        AccelerationIndex::from_primitives(primitives, &BuildSettings::default())
    }

    fn from_primitives(
        primitives: Vec<ShapePrimitive<'a>>,
        settings: &BuildSettings,
    ) -> AccelerationIndex<'a> {
        let (boxes, centers) = compute_bounding_boxes_and_centers(&primitives);
        let global_box = compute_bounding_boxes_union(&boxes);
        let bvh = Bvh::build(&global_box, &boxes, &centers, settings);

        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "Built acceleration index over {} shapes\n{}",
                primitives.len(),
                bvh.statistics()
            );
        }

        AccelerationIndex { primitives, bvh }
    }

    /// Nearest hit of the ray with any of the shapes.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'a>> {
        self.intersect_with_stack(ray, &mut StackCache::default())
    }

    /// Like `intersect`, reusing traversal memory between queries.
    pub fn intersect_with_stack(
        &self,
        ray: &Ray,
        stack: &mut StackCache,
    ) -> Option<Intersection<'a>> {
        if self.is_empty() {
            trace!("Query on an empty acceleration index");
            return None;
        }

        self.bvh
            .traverse(BvhRay::from(ray), &self.primitives, stack)
            .map(|hit| hit.intersection)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Union of all shape bounding boxes.
    pub fn bounding_box(&self) -> &WorldBox {
        self.bvh.bounding_box()
    }

    pub fn statistics(&self) -> BvhStatistics {
        self.bvh.statistics()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &'a dyn Shape> + '_ {
        self.primitives.iter().map(|primitive| primitive.shape())
    }
}
