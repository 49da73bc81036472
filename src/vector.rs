//! Feature vectorization: folds a bag of grams into a fixed-dimension
//! real vector via hash-seeded random projection, then sums bottom-up
//! so every subtree ends up carrying the vector for its own content.

use crate::gram::{Gram, GramLabel};
use crate::pqgram::{GramAnnotated, HasGram};
use crate::tree::Tree;
use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Annotation layer produced by the final pipeline stage: prior
/// annotation `P` plus the subtree's feature vector.
#[derive(Debug, Clone)]
pub struct FeatureAnnotated<P> {
    pub inner: P,
    pub feature: Vec<f64>,
}

/// Exposes the feature vector of an annotation to the RWS driver, so
/// `rws.rs` doesn't need to know the full layer stack above it.
pub trait HasFeature {
    fn feature(&self) -> &[f64];
}

impl<P> HasFeature for FeatureAnnotated<P> {
    fn feature(&self) -> &[f64] {
        &self.feature
    }
}

/// Deterministic unit vector for a gram hash.
///
/// Uses `rand_chacha::ChaCha8Rng`, seeded with the gram's `u64` hash
/// via `SeedableRng::seed_from_u64`. Each of the `d` coordinates is drawn
/// uniformly from `[-1.0, 1.0)` with `Rng::random`, then the vector is
/// normalized to unit Euclidean magnitude. A zero-magnitude draw is
/// possible only in the limit `d == 0`; for `d >= 1` the probability
/// of an exact-zero draw from a continuous distribution is zero, so
/// normalization below only guards against `d == 0` explicitly.
pub fn unit_vector(d: usize, hash: u64) -> Vec<f64> {
    if d == 0 {
        return Vec::new();
    }
    let mut rng = ChaCha8Rng::seed_from_u64(hash);
    let mut v: Vec<f64> = (0..d).map(|_| rng.random::<f64>() * 2.0 - 1.0).collect();
    let magnitude = l2_norm(&v);
    if magnitude > 0.0 {
        for x in v.iter_mut() {
            *x /= magnitude;
        }
    }
    v
}

pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn add_in_place(acc: &mut [f64], other: &[f64]) {
    debug_assert_eq!(acc.len(), other.len());
    for (a, b) in acc.iter_mut().zip(other.iter()) {
        *a += b;
    }
}

/// The feature vector for a bag (multiset) of grams: the
/// element-wise sum of `unit_vector(d, hash(g))` over every gram `g`
/// in the bag, starting from the zero vector of length `d`.
pub fn feature_vector<L: GramLabel>(d: usize, grams: &[Gram<L>]) -> Vec<f64> {
    let mut acc = vec![0.0; d];
    for g in grams {
        add_in_place(&mut acc, &unit_vector(d, g.hash_u64()));
    }
    acc
}

/// Decorates every node of a gram-annotated tree with its subtree's
/// feature vector, in a single post-order pass: a node's vector is
/// the sum of its children's vectors plus `unit_vector(d, hash(own
/// gram))`. This computes the same result as vectorizing the full bag
/// of grams in the subtree, without materializing that bag.
pub fn feature_vector_decorator<P, L: GramLabel>(
    tree: Tree<GramAnnotated<P, L>>,
    d: usize,
) -> Tree<FeatureAnnotated<GramAnnotated<P, L>>> {
    let children: Vec<Tree<FeatureAnnotated<GramAnnotated<P, L>>>> = tree
        .children
        .into_iter()
        .map(|c| feature_vector_decorator(c, d))
        .collect();

    let mut feature = vec![0.0; d];
    for c in &children {
        add_in_place(&mut feature, &c.annotation.feature);
    }
    let own = unit_vector(d, tree.annotation.gram().hash_u64());
    add_in_place(&mut feature, &own);

    trace!(
        "decorated node (gram hash {}) with feature vector of magnitude {:.6}",
        tree.annotation.gram().hash_u64(),
        l2_norm(&feature)
    );

    Tree {
        annotation: FeatureAnnotated {
            inner: tree.annotation,
            feature,
        },
        children,
    }
}
