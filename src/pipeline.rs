//! Composes the labeling, pq-gram, and vectorization stages into a
//! single decoration entry point.

use crate::gram::GramLabel;
use crate::label::{label_tree, Labeled};
use crate::pqgram::{pqgram_tree, GramAnnotated};
use crate::tree::{Shape, Tree};
use crate::vector::{feature_vector_decorator, FeatureAnnotated};

/// The fully-decorated annotation type produced by
/// [`feature_vector_decorator`]: every pipeline stage's contribution,
/// innermost first.
pub type Decorated<A, L> = FeatureAnnotated<GramAnnotated<Labeled<A, L>, L>>;

/// Runs the whole pipeline, labeling, pq-gram decoration, feature
/// vectorization, over `tree` and returns a tree where every
/// annotation carries its subtree's feature vector (plus, nested
/// inside, its gram and label).
pub fn feature_vector_decorator_full<A, L: GramLabel>(
    tree: Tree<A>,
    label_fn: &impl Fn(&A, &[Shape]) -> L,
    p: usize,
    q: usize,
    d: usize,
) -> Tree<Decorated<A, L>> {
    let labeled = label_tree(tree, label_fn);
    let grammed = pqgram_tree(labeled, p, q);
    feature_vector_decorator(grammed, d)
}
