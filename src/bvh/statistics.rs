use std::fmt::Display;

use crate::util::Stats;

use super::{Bvh, NodeLink};

/// Shape of the hierarchy, for logging and tuning the build settings.
#[derive(Clone, Debug, PartialEq)]
pub struct BvhStatistics {
    /// Number of nodes on the path from the root to each leaf, including both ends
    pub depth: Stats,
    /// Primitives per leaf
    pub leaf_size: Stats,
    /// Children per inner node
    pub inner_children: Stats,
}

impl Bvh {
    pub fn statistics(&self) -> BvhStatistics {
        let mut inner_children = Stats::default();
        inner_children.add_samples(self.inner_nodes.iter().map(|node| node.child_links.len()));

        let mut leaf_size = Stats::default();
        self.for_each_leaf(&self.root, &mut |indices_len| leaf_size.add_sample(indices_len));

        BvhStatistics {
            depth: self.depth_statistics_recursive(&self.root),
            leaf_size,
            inner_children,
        }
    }

    fn depth_statistics_recursive(&self, node: &NodeLink) -> Stats {
        match node {
            NodeLink::Leaf { .. } => Stats::new_single(1),
            NodeLink::Inner { index } => self.inner_nodes[*index]
                .child_links
                .iter()
                .map(|child| self.depth_statistics_recursive(child))
                .fold(Stats::default(), |a, b| a.merge(&b))
                .increment(),
        }
    }

    fn for_each_leaf(&self, node: &NodeLink, f: &mut impl FnMut(usize)) {
        match node {
            NodeLink::Leaf { indices } => f(indices.len()),
            NodeLink::Inner { index } => {
                for child in &self.inner_nodes[*index].child_links {
                    self.for_each_leaf(child, f);
                }
            }
        }
    }
}

impl Display for BvhStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Depth: {}", self.depth)?;
        writeln!(f, "Inner node child count: {}", self.inner_children)?;
        write!(f, "Leaf node fill: {}", self.leaf_size)
    }
}
