//! Bounding volume hierarchy over arbitrary primitives.
//!
//! The hierarchy only knows primitive bounding boxes and centers, all exact intersection
//! math is delegated back to the primitives through the [`Primitive`] trait.

mod building;
mod ray_box_intersection;
mod ray_bvh_intersection;
mod statistics;

#[cfg(test)]
mod test_primitives;

use std::{num::NonZeroUsize, ops::Range};

use arrayvec::ArrayVec;
use bon::bon;

use crate::geometry::{FloatType, WorldBox, WorldPoint, WorldVector};

pub use building::{compute_bounding_boxes_and_centers, compute_bounding_boxes_union};
pub use ray_box_intersection::RayIntersectionExt;
pub use ray_bvh_intersection::{ClosestHit, StackCache};
pub use statistics::BvhStatistics;

const INNER_NODE_CHILDREN: usize = 8;
const DEFAULT_MAX_LEAF_SIZE: usize = 4;

/// Something that can be stored in the hierarchy.
pub trait Primitive {
    type Intersection;

    fn bounding_box(&self) -> WorldBox;
    fn center(&self) -> WorldPoint;

    /// Intersect the primitive with the ray.
    /// Returns hit distance and intersection data, the distance must be within
    /// `ray.tmin..=ray.tmax`.
    fn intersect(&self, ray: &BvhRay) -> Option<(FloatType, Self::Intersection)>;
}

/// Ray as used for traversal, with a valid distance range.
#[derive(Copy, Clone, Debug)]
pub struct BvhRay {
    pub origin: WorldPoint,
    pub direction: WorldVector,

    /// Componentwise inverse of the ray direction
    /// Zeros in direction get turned into positive infinity regardless of the sign of the zero
    pub inv_direction: WorldVector,

    pub tmin: FloatType,
    pub tmax: FloatType,
}

impl BvhRay {
    /// Ray covering the whole positive half line.
    pub fn new(origin: WorldPoint, direction: WorldVector) -> BvhRay {
        BvhRay::with_range(origin, direction, 0.0, FloatType::INFINITY)
    }

    pub fn with_range(
        origin: WorldPoint,
        direction: WorldVector,
        tmin: FloatType,
        tmax: FloatType,
    ) -> BvhRay {
        let inv_direction = direction.map(|x| if x == 0.0 { FloatType::INFINITY } else { 1.0 / x });

        BvhRay {
            origin,
            direction,
            inv_direction,
            tmin,
            tmax,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct BuildSettings {
    /// Nodes with at most this many primitives become leaves.
    pub max_leaf_size: NonZeroUsize,
}

#[bon]
impl BuildSettings {
    #[builder]
    pub fn new(#[builder(default = DEFAULT_MAX_LEAF_SIZE)] max_leaf_size: usize) -> Self {
        BuildSettings {
            max_leaf_size: NonZeroUsize::new(max_leaf_size).expect("Leaf size must be non-zero"),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings::builder().build()
    }
}

#[derive(Clone, Debug)]
pub struct Bvh {
    bounding_box: WorldBox,
    root: NodeLink,

    inner_nodes: index_vec::IndexVec<InnerNodeIdx, InnerNode>,

    /// Primitive indices, ordered so that every leaf references a contiguous range.
    primitive_indices: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
struct InnerNode {
    child_bounds: ArrayVec<WorldBox, INNER_NODE_CHILDREN>,
    child_links: ArrayVec<NodeLink, INNER_NODE_CHILDREN>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum NodeLink {
    Inner { index: InnerNodeIdx },
    /// Range in `primitive_indices`
    Leaf { indices: Range<usize> },
}

index_vec::define_index_type! {
    struct InnerNodeIdx = u32;
}

impl Bvh {
    pub fn bounding_box(&self) -> &WorldBox {
        &self.bounding_box
    }

    pub fn primitive_count(&self) -> usize {
        self.primitive_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitive_indices.is_empty()
    }
}
