use std::{array, ops::Range};

use assert2::assert;
use index_vec::IndexVec;
use itertools::Itertools as _;
use morton_encoding::morton_encode;

use crate::geometry::{FloatType, WorldBox, WorldPoint, WorldVector};

use super::{BuildSettings, Bvh, INNER_NODE_CHILDREN, InnerNode, NodeLink, Primitive};

/// Collects bounding boxes and centers of all primitives in one pass.
pub fn compute_bounding_boxes_and_centers<P: Primitive>(
    primitives: &[P],
) -> (Vec<WorldBox>, Vec<WorldPoint>) {
    primitives
        .iter()
        .map(|primitive| (primitive.bounding_box(), primitive.center()))
        .unzip()
}

/// Box enclosing all the boxes, degenerate box at origin if there are none.
pub fn compute_bounding_boxes_union(boxes: &[WorldBox]) -> WorldBox {
    boxes
        .iter()
        .cloned()
        .reduce(|a, b| a.union(&b))
        .unwrap_or_default()
}

impl Bvh {
    /// Builds the hierarchy from primitive bounding boxes and centers.
    /// `boxes[i]` and `centers[i]` belong to the primitive with index `i`, the same
    /// indexing must be used when traversing.
    pub fn build(
        global_box: &WorldBox,
        boxes: &[WorldBox],
        centers: &[WorldPoint],
        settings: &BuildSettings,
    ) -> Bvh {
        assert!(boxes.len() == centers.len());

        let mut primitive_indices = (0..boxes.len()).collect::<Vec<_>>();
        morton_sort(&mut primitive_indices, centers);

        let mut bvh = Bvh {
            bounding_box: global_box.clone(),
            root: NodeLink::Leaf { indices: 0..0 },
            inner_nodes: IndexVec::new(),
            primitive_indices: Vec::new(),
        };

        bvh.root = bvh.build_recursive(0..boxes.len(), &primitive_indices, boxes, settings);
        bvh.primitive_indices = primitive_indices;

        bvh
    }

    fn build_recursive(
        &mut self,
        range: Range<usize>,
        primitive_indices: &[usize],
        boxes: &[WorldBox],
        settings: &BuildSettings,
    ) -> NodeLink {
        if range.len() <= settings.max_leaf_size.get() {
            NodeLink::Leaf { indices: range }
        } else {
            self.build_inner_node(range, primitive_indices, boxes, settings)
        }
    }

    fn build_inner_node(
        &mut self,
        range: Range<usize>,
        primitive_indices: &[usize],
        boxes: &[WorldBox],
        settings: &BuildSettings,
    ) -> NodeLink {
        // Create placeholder node that will be overwriten later
        let node_index = self.inner_nodes.push(InnerNode::default());

        let mut node = InnerNode::default();
        for (start, end) in split_range(&range).into_iter().tuple_windows() {
            if start == end {
                continue;
            }

            let child_box = compute_bounding_boxes_union(
                &primitive_indices[start..end]
                    .iter()
                    .map(|&i| boxes[i].clone())
                    .collect::<Vec<_>>(),
            );
            let child_link =
                self.build_recursive(start..end, primitive_indices, boxes, settings);

            node.child_bounds.push(child_box);
            node.child_links.push(child_link);
        }

        // Replace the placeholder with an actual inner node
        self.inner_nodes[node_index] = node;

        NodeLink::Inner { index: node_index }
    }
}

/// Indices where the range should be split into children. First item is always
/// `range.start`, last item is always `range.end`, the chunks differ in size by at most one.
fn split_range(range: &Range<usize>) -> [usize; INNER_NODE_CHILDREN + 1] {
    let len = range.len();
    array::from_fn::<_, { INNER_NODE_CHILDREN + 1 }, _>(|i| {
        range.start + i * len / INNER_NODE_CHILDREN
    })
}

/// Orders the primitives along a Z-order curve through their centers, so that
/// neighbors in the ordering are also close in space.
fn morton_sort(primitive_indices: &mut [usize], centers: &[WorldPoint]) {
    const GRID_BITS: usize = 10;
    const GRID_MAX: FloatType = ((1 << GRID_BITS) - 1) as FloatType;

    let Some(bounds) = WorldBox::from_points(centers) else {
        return;
    };
    let min = bounds.min;
    let scale: WorldVector = bounds
        .size()
        .map(|size| if size > 0.0 { GRID_MAX / size } else { 0.0 });

    primitive_indices.sort_by_cached_key(|&i| {
        let grid_coordinates: [u32; 3] = (centers[i] - min)
            .component_mul(&scale)
            .map(|x| x.round().clamp(0.0, GRID_MAX) as u32)
            .into();

        morton_encode(grid_coordinates)
    });
}
