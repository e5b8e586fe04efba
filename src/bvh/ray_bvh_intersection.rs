use std::cmp::Reverse;

use arrayvec::ArrayVec;
use assert2::debug_assert;
use ordered_float::OrderedFloat;

use super::{
    Bvh, BvhRay, INNER_NODE_CHILDREN, InnerNode, NodeLink, Primitive, RayIntersectionExt as _,
};
use crate::geometry::FloatType;

/// Traversal stack, kept between queries to avoid reallocating.
#[derive(Clone, Debug, Default)]
#[repr(transparent)]
pub struct StackCache {
    stack: Vec<(NodeLink, FloatType)>,
}

/// Nearest primitive hit found during traversal.
#[derive(Clone, Debug, PartialEq)]
pub struct ClosestHit<I> {
    /// Index of the primitive in the slice the hierarchy was built from
    pub primitive_index: usize,
    pub distance: FloatType,
    pub intersection: I,
}

impl Bvh {
    /// Finds the nearest primitive hit within the ray's distance range.
    ///
    /// `primitives` must be the same slice (in the same order) that the hierarchy was built from.
    /// Primitives are trusted to only report hits within `ray.tmin..=ray.tmax`.
    pub fn traverse<P: Primitive>(
        &self,
        mut ray: BvhRay,
        primitives: &[P],
        stack: &mut StackCache,
    ) -> Option<ClosestHit<P::Intersection>> {
        debug_assert!(stack.stack.is_empty());
        debug_assert!(primitives.len() == self.primitive_count());

        if self.is_empty() {
            return None;
        }

        let (t1, t2) = self.bounding_box.intersect(&ray);
        let t1 = t1.max(ray.tmin);
        let t2 = t2.min(ray.tmax);
        if !(t1 <= t2) {
            return None;
        }

        stack.stack.push((self.root.clone(), t1));

        let mut best = None;

        while let Some((link, node_t1)) = stack.stack.pop() {
            if node_t1 > ray.tmax {
                // The whole node is further away than the best hit found so far
                continue;
            }

            match link {
                NodeLink::Inner { index } => {
                    let mut children: ArrayVec<_, INNER_NODE_CHILDREN> =
                        self.inner_nodes[index].intersect(ray).collect();

                    // Nearest child goes last, to be popped first
                    children.sort_unstable_by_key(|(t1, _)| Reverse(OrderedFloat(*t1)));
                    stack
                        .stack
                        .extend(children.into_iter().map(|(t1, link)| (link.clone(), t1)));
                }
                NodeLink::Leaf { indices } => {
                    for &primitive_index in &self.primitive_indices[indices] {
                        if let Some((distance, intersection)) =
                            primitives[primitive_index].intersect(&ray)
                        {
                            ray.tmax = distance;
                            best = Some(ClosestHit {
                                primitive_index,
                                distance,
                                intersection,
                            });
                        }
                    }
                }
            }
        }

        best
    }
}

impl InnerNode {
    /// Intersect this inner node with a ray.
    /// Returns an iterator of intersecting children: (t1, link to the child),
    /// where t1 is the nearest distance along the ray within the ray's range.
    fn intersect(&self, ray: BvhRay) -> impl Iterator<Item = (FloatType, &NodeLink)> {
        self.child_bounds
            .iter()
            .zip(&self.child_links)
            .filter_map(move |(child_box, link)| {
                let (t1, t2) = child_box.intersect(&ray);
                let t1 = t1.max(ray.tmin);
                let t2 = t2.min(ray.tmax);
                (t1 <= t2).then_some((t1, link))
            })
    }
}
