//! Nearest-neighbour index over a fixed point set
//!
//! A k-d tree built once from an N×D matrix. It answers a single query type:
//! the nearest stored point to a query vector, with its squared Euclidean
//! distance. Ties are resolved towards the lower point index so results do
//! not depend on tree shape.
//!
//! Nodes live in a flat arena; leaves hold a contiguous slice of the permuted
//! index array.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// Default number of points per leaf bucket
pub const DEFAULT_LEAF_SIZE: usize = 10;

/// Squared Euclidean distance between two vectors of equal length
#[inline]
pub fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

#[derive(Debug, Clone, Copy)]
enum KdNode {
    Leaf {
        start: usize,
        end: usize,
    },
    Split {
        axis: usize,
        value: f64,
        left: usize,
        right: usize,
    },
}

/// Static k-d tree over an owned point matrix
#[derive(Debug, Clone)]
pub struct KdTree {
    points: Array2<f64>,
    /// Permutation of point indices, grouped by leaf
    order: Vec<usize>,
    nodes: Vec<KdNode>,
    leaf_size: usize,
}

impl KdTree {
    /// Build an index over the rows of `points`
    pub fn build(points: Array2<f64>) -> Self {
        Self::with_leaf_size(points, DEFAULT_LEAF_SIZE)
    }

    /// Build with a custom leaf bucket size (minimum 1)
    pub fn with_leaf_size(points: Array2<f64>, leaf_size: usize) -> Self {
        let mut tree = Self {
            order: (0..points.nrows()).collect(),
            points,
            nodes: Vec::new(),
            leaf_size: leaf_size.max(1),
        };
        if !tree.order.is_empty() {
            let len = tree.order.len();
            tree.build_node(0, len);
        }
        tree
    }

    /// Recursively split `order[start..end]`, returning the arena index
    fn build_node(&mut self, start: usize, end: usize) -> usize {
        let id = self.nodes.len();
        if end - start <= self.leaf_size {
            self.nodes.push(KdNode::Leaf { start, end });
            return id;
        }

        let axis = self.widest_axis(start, end);
        let mid = start + (end - start) / 2;
        {
            let points = &self.points;
            self.order[start..end].select_nth_unstable_by(mid - start, |&a, &b| {
                points[[a, axis]].total_cmp(&points[[b, axis]])
            });
        }
        let value = self.points[[self.order[mid], axis]];

        // Reserve the slot, children are appended after it
        self.nodes.push(KdNode::Leaf { start, end });
        let left = self.build_node(start, mid);
        let right = self.build_node(mid, end);
        self.nodes[id] = KdNode::Split {
            axis,
            value,
            left,
            right,
        };
        id
    }

    /// Axis with the largest spread over `order[start..end]`
    fn widest_axis(&self, start: usize, end: usize) -> usize {
        let mut best_axis = 0;
        let mut best_spread = f64::NEG_INFINITY;
        for axis in 0..self.points.ncols() {
            let column = self.points.index_axis(Axis(1), axis);
            let (lo, hi) = self.order[start..end].iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), &i| (lo.min(column[i]), hi.max(column[i])),
            );
            let spread = hi - lo;
            if spread > best_spread {
                best_spread = spread;
                best_axis = axis;
            }
        }
        best_axis
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    /// True if no points are indexed
    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Dimensionality of the indexed points
    pub fn dimensions(&self) -> usize {
        self.points.ncols()
    }

    /// The indexed points, in original order
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Index and squared distance of the stored point nearest to `query`
    ///
    /// Returns `None` only for an empty index.
    pub fn nearest(&self, query: ArrayView1<'_, f64>) -> Option<(usize, f64)> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut best = (usize::MAX, f64::INFINITY);
        self.search(0, query, &mut best);
        if best.0 == usize::MAX {
            // NaN query: no distance compares, report the first point
            return Some((0, squared_distance(query, self.points.row(0))));
        }
        Some(best)
    }

    fn search(&self, node: usize, query: ArrayView1<'_, f64>, best: &mut (usize, f64)) {
        match self.nodes[node] {
            KdNode::Leaf { start, end } => {
                for &i in &self.order[start..end] {
                    let dist = squared_distance(query, self.points.row(i));
                    if dist < best.1 || (dist == best.1 && i < best.0) {
                        *best = (i, dist);
                    }
                }
            }
            KdNode::Split {
                axis,
                value,
                left,
                right,
            } => {
                let diff = query[axis] - value;
                let (near, far) = if diff < 0.0 { (left, right) } else { (right, left) };
                self.search(near, query, best);
                // Ties on the splitting plane may hide a lower index on the far side
                if diff * diff <= best.1 {
                    self.search(far, query, best);
                }
            }
        }
    }
}
