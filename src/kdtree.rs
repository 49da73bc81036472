//! A static k-d tree over feature vectors.
//!
//! A small from-scratch recursive median-split tree: built once per
//! `rws` call, queried with nearest-neighbor lookups, and discarded.
//! It supports exactly the one operation the driver needs
//! (`nearest`); range queries, insertion, and deletion are out of
//! scope.

use crate::error::CoreError;

struct KdNode {
    /// Index into the tree's owned `points` vec.
    point_index: usize,
    axis: usize,
    left: Option<Box<KdNode>>,
    right: Option<Box<KdNode>>,
}

/// A static spatial index over `n` points in R^d, supporting
/// `nearest(query)`. Owns a flat copy of the points it indexes.
pub struct KdTree {
    points: Vec<Vec<f64>>,
    dim: usize,
    root: KdNode,
}

impl KdTree {
    /// Builds a static k-d tree from `points`. All points must share
    /// the same dimension, and there must be at least one of them;
    /// both are caller preconditions reported via `CoreError` rather
    /// than asserted, since this constructor (unlike the rest of the
    /// pipeline) can be reached directly with hand-assembled data.
    pub fn build(points: Vec<Vec<f64>>) -> Result<KdTree, CoreError> {
        if points.is_empty() {
            return Err(CoreError::EmptyPointSet);
        }
        let dim = points[0].len();
        if dim == 0 {
            return Err(CoreError::ZeroDimension);
        }
        for (i, p) in points.iter().enumerate() {
            if p.len() != dim {
                return Err(CoreError::InconsistentDimension {
                    expected: dim,
                    actual: p.len(),
                    index: i,
                });
            }
        }

        let mut indices: Vec<usize> = (0..points.len()).collect();
        let root = build_node(&points, &mut indices, 0, dim)
            .expect("non-empty index set always yields a root");

        Ok(KdTree { points, dim, root })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the index (into the point set passed to `build`) of
    /// the point nearest `query` under Euclidean distance. Ties are
    /// broken by the order the recursive search happens to visit
    /// candidates in, which is deterministic for a fixed input set.
    pub fn nearest(&self, query: &[f64]) -> usize {
        debug_assert_eq!(query.len(), self.dim);
        let mut best = self.root.point_index;
        let mut best_dist = squared_distance(&self.points[best], query);
        search(&self.root, &self.points, query, &mut best, &mut best_dist);
        best
    }
}

fn build_node(
    points: &[Vec<f64>],
    indices: &mut [usize],
    depth: usize,
    dim: usize,
) -> Option<KdNode> {
    if indices.is_empty() {
        return None;
    }
    let axis = depth % dim;
    indices.sort_by(|&a, &b| {
        points[a][axis]
            .partial_cmp(&points[b][axis])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let mid = indices.len() / 2;
    let point_index = indices[mid];
    let (left_indices, rest) = indices.split_at_mut(mid);
    let right_indices = &mut rest[1..];

    let left = build_node(points, left_indices, depth + 1, dim).map(Box::new);
    let right = build_node(points, right_indices, depth + 1, dim).map(Box::new);

    Some(KdNode {
        point_index,
        axis,
        left,
        right,
    })
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn search(
    node: &KdNode,
    points: &[Vec<f64>],
    query: &[f64],
    best: &mut usize,
    best_dist: &mut f64,
) {
    let d = squared_distance(&points[node.point_index], query);
    if d < *best_dist {
        *best_dist = d;
        *best = node.point_index;
    }

    let diff = query[node.axis] - points[node.point_index][node.axis];
    let (near, far) = if diff < 0.0 {
        (&node.left, &node.right)
    } else {
        (&node.right, &node.left)
    };

    if let Some(near) = near {
        search(near, points, query, best, best_dist);
    }
    // Only descend into the far side if the splitting hyperplane is
    // closer than the current best. Standard k-d tree pruning rule.
    if diff * diff < *best_dist {
        if let Some(far) = far {
            search(far, points, query, best, best_dist);
        }
    }
}
