//! Partition tree nodes
//!
//! Each node is one region of the recursive partition: the dataset rows it
//! covers, the row that anchors it, and the regions it was split into. Nodes
//! are stored in an arena and refer to each other by [`NodeId`]; the parent
//! link is a plain index kept for upward traversal only.

/// Index of a node inside a [`PartitionTree`]
pub type NodeId = usize;

/// One region of the partition
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionNode {
    /// Dataset rows covered by this region
    pub indices: Vec<usize>,
    /// Row anchoring this region
    pub representative: usize,
    /// Enclosing region, `None` for the root
    pub parent: Option<NodeId>,
    /// Sub-regions in creation order
    pub children: Vec<NodeId>,
    /// Distance from the root
    pub depth: usize,
}

impl PartitionNode {
    /// Check if node is a leaf
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of rows in this region
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True if the region covers no rows
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Arena holding every node produced during one induction
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    /// Root id of every tree
    pub const ROOT: NodeId = 0;

    /// Tree with a single root covering rows `0..rows`, anchored at row 0
    pub fn with_root(rows: usize) -> Self {
        Self {
            nodes: vec![PartitionNode {
                indices: (0..rows).collect(),
                representative: 0,
                parent: None,
                children: Vec::new(),
                depth: 0,
            }],
        }
    }

    /// Borrow a node
    ///
    /// Panics if `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> &PartitionNode {
        &self.nodes[id]
    }

    /// The root region
    pub fn root(&self) -> &PartitionNode {
        &self.nodes[Self::ROOT]
    }

    /// Attach a new region under `parent` and return its id
    pub fn add_child(&mut self, parent: NodeId, indices: Vec<usize>, representative: usize) -> NodeId {
        let id = self.nodes.len();
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(PartitionNode {
            indices,
            representative,
            parent: Some(parent),
            children: Vec::new(),
            depth,
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Total node count
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate all nodes with their ids, in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PartitionNode)> {
        self.nodes.iter().enumerate()
    }

    /// Leaf ids in depth-first pre-order, children visited in creation order
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_leaf() {
                leaves.push(id);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        leaves
    }

    /// Representative rows of all leaves, in [`leaves`](Self::leaves) order
    pub fn leaf_representatives(&self) -> Vec<usize> {
        self.leaves()
            .into_iter()
            .map(|id| self.nodes[id].representative)
            .collect()
    }

    /// Deepest node depth
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Ids of the nodes on the path from `id` up to the root, `id` first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            path.push(parent);
            current = parent;
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_covers_all_rows() {
        let tree = PartitionTree::with_root(5);
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root().indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(tree.root().representative, 0);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.leaf_representatives(), vec![0]);
    }

    #[test]
    fn children_link_both_ways() {
        let mut tree = PartitionTree::with_root(6);
        let a = tree.add_child(PartitionTree::ROOT, vec![0, 1, 2], 1);
        let b = tree.add_child(PartitionTree::ROOT, vec![3, 4, 5], 4);
        let c = tree.add_child(a, vec![0], 0);

        assert_eq!(tree.root().children, vec![a, b]);
        assert_eq!(tree.node(a).parent, Some(PartitionTree::ROOT));
        assert_eq!(tree.node(c).depth, 2);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.ancestors(c), vec![c, a, PartitionTree::ROOT]);
    }

    #[test]
    fn leaves_in_preorder() {
        let mut tree = PartitionTree::with_root(8);
        let a = tree.add_child(PartitionTree::ROOT, vec![0, 1, 2, 3], 2);
        let b = tree.add_child(PartitionTree::ROOT, vec![4, 5, 6, 7], 6);
        tree.add_child(a, vec![0, 1], 0);
        tree.add_child(a, vec![2, 3], 3);
        let b1 = tree.add_child(b, vec![4, 7], 7);
        tree.add_child(b, vec![5, 6], 5);
        tree.add_child(b1, vec![4, 7], 4);

        assert_eq!(tree.leaf_representatives(), vec![0, 3, 4, 5]);
        assert!(!tree.node(b).is_leaf());
        assert_eq!(tree.node(b).len(), 4);
    }
}
