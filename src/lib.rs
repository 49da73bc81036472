//! Random-Walk Similarity (RWS) tree matching core.
//!
//! This crate implements the hard, algorithmic center of a
//! structural source-code differ: given two labeled, ordered trees
//! (the "old" and "new" parse of a file), it aligns matching
//! subtrees and marks the rest as insertions or deletions, producing
//! a tree-structured edit script.
//!
//! Everything else a real differ needs, parsing, rendering, file I/O,
//! a CLI, is out of scope here and expected to sit around this crate
//! as external collaborators; the one plug-in point this crate
//! exposes to them is the comparator passed to [`rws()`].
//!
//! The pipeline, leaves first:
//!
//! 1. [`mod@label`]: decorate every node with a label derived from its
//!    shape.
//! 2. [`mod@pqgram`]: replace each label with a `p`-ancestor /
//!    `q`-sibling [`Gram`].
//! 3. [`mod@vector`]: fold each subtree's bag of grams into a
//!    fixed-dimension feature vector via hash-seeded random
//!    projection.
//! 4. [`KdTree`]: index the old tree's feature vectors for
//!    nearest-neighbor queries.
//! 5. [`rws()`]: walk the new tree in order, query the index, and
//!    emit a monotonic, order-constrained matching as a diff.

mod config;
mod error;
mod gram;
mod kdtree;
mod label;
mod pipeline;
mod pqgram;
mod rws;
mod tree;
mod vector;

pub use config::Config;
pub use error::CoreError;
pub use gram::{pad_to_size, Gram, GramLabel};
pub use kdtree::KdTree;
pub use label::{label_tree, HasLabel, Labeled};
pub use pipeline::{feature_vector_decorator_full, Decorated};
pub use pqgram::{pqgram_tree, pqgrams, GramAnnotated, HasGram};
pub use rws::{rws, Diff, Patch};
pub use tree::{Shape, Tree};
pub use vector::{
    feature_vector, feature_vector_decorator, unit_vector, FeatureAnnotated, HasFeature,
};

#[cfg(test)]
mod tests {
    //! End-to-end scenarios, run through the full pipeline rather
    //! than against hand-built feature vectors.
    use super::*;

    fn label_of_char(ann: &char, _shapes: &[Shape]) -> char {
        *ann
    }

    fn decorate(tree: Tree<char>, cfg: &Config) -> Tree<Decorated<char, char>> {
        feature_vector_decorator_full(tree, &label_of_char, cfg.p, cfg.q, cfg.d)
    }

    fn label_eq_comparator(
        old: &Tree<Decorated<char, char>>,
        new: &Tree<Decorated<char, char>>,
    ) -> Option<Diff<Decorated<char, char>>> {
        if old.annotation.inner.inner.label == new.annotation.inner.inner.label {
            Some(Diff::Matched {
                old: old.annotation.clone(),
                new: new.annotation.clone(),
                children: Vec::new(),
            })
        } else {
            None
        }
    }

    fn scenario(as_: Vec<char>, bs: Vec<char>) -> Vec<Diff<Decorated<char, char>>> {
        let cfg = Config::new(2, 3, 4);
        let as_trees: Vec<_> = as_
            .into_iter()
            .map(|c| decorate(Tree::leaf(c), &cfg))
            .collect();
        let bs_trees: Vec<_> = bs
            .into_iter()
            .map(|c| decorate(Tree::leaf(c), &cfg))
            .collect();
        rws(&label_eq_comparator, as_trees, bs_trees)
    }

    #[test]
    fn scenario_1_single_matching_node() {
        let out = scenario(vec!['A'], vec!['A']);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Diff::Matched { .. }));
    }

    #[test]
    fn scenario_2_two_matching_nodes_in_order() {
        let out = scenario(vec!['A', 'B'], vec!['A', 'B']);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|d| matches!(d, Diff::Matched { .. })));
    }

    #[test]
    fn scenario_5_all_inserts_when_old_is_empty() {
        let out = scenario(vec![], vec!['X', 'Y', 'Z']);
        assert_eq!(out.len(), 3);
        assert!(out
            .iter()
            .all(|d| matches!(d, Diff::Patch(Patch::Insert(_)))));
    }

    #[test]
    fn scenario_6_rejecting_comparator_yields_insert_then_delete() {
        // Distinct labels ('A' vs 'Z') so the comparator never
        // accepts the pair, covering a node that is structurally
        // similar but labeled differently.
        let out = scenario(vec!['A'], vec!['Z']);
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], Diff::Patch(Patch::Insert(_))));
        assert!(matches!(out[1], Diff::Patch(Patch::Delete(_))));
    }

    #[test]
    fn conservation_holds_across_a_larger_scenario() {
        let as_: Vec<char> = "abcdefg".chars().collect();
        let bs: Vec<char> = "aceg".chars().collect();
        let n_as = as_.len();
        let n_bs = bs.len();
        let out = scenario(as_, bs);

        let matched = out.iter().filter(|d| matches!(d, Diff::Matched { .. })).count();
        let deletes = out
            .iter()
            .filter(|d| matches!(d, Diff::Patch(Patch::Delete(_))))
            .count();
        let inserts = out
            .iter()
            .filter(|d| matches!(d, Diff::Patch(Patch::Insert(_))))
            .count();

        assert_eq!(deletes, n_as - matched);
        assert_eq!(inserts, n_bs - matched);
    }
}
