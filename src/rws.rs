//! The RWS matching driver: the heart of this crate.
//!
//! Walks the new tree's top-level terms in order, queries a k-d tree
//! built over the old terms' feature vectors, and commits a match
//! only when the candidate is unmapped, doesn't violate old-index
//! monotonicity, and the caller-supplied comparator agrees the pair
//! aligns. Everything left over becomes an `Insert` or a `Delete`.

use crate::kdtree::KdTree;
use crate::tree::Tree;
use crate::vector::HasFeature;
use log::{debug, trace};
use rustc_hash::FxHashSet;

/// A new-tree node with no match in the old tree, or an old-tree node
/// with no match in the new tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Insert(Tree<T>),
    Delete(Tree<T>),
}

/// Either a `Patch` leaf, or an aligned pair of annotations with an
/// ordered sequence of child diffs produced by the caller-supplied
/// comparator.
#[derive(Debug, Clone, PartialEq)]
pub enum Diff<T> {
    Patch(Patch<T>),
    Matched {
        old: T,
        new: T,
        children: Vec<Diff<T>>,
    },
}

/// An old- or new-tree term wrapped with its dense, zero-based
/// position within the list being matched, and its top-level feature
/// vector. Transient: it exists only for the duration of one `rws`
/// call.
struct UnmappedTerm<T> {
    index: usize,
    feature: Vec<f64>,
    term: Tree<T>,
}

/// Runs the RWS matching algorithm.
///
/// `compare(old, new)` decides whether two subtrees align; returning
/// `None` means "too different to align here," and `Some(diff)`
/// commits the pair. This is where the comparator may recursively
/// diff the pair's own children; this driver never descends into a
/// matched pair itself.
///
/// Total and infallible: there is no input on which this function can
/// fail.
pub fn rws<T>(
    compare: &impl Fn(&Tree<T>, &Tree<T>) -> Option<Diff<T>>,
    as_: Vec<Tree<T>>,
    bs: Vec<Tree<T>>,
) -> Vec<Diff<T>>
where
    T: HasFeature,
{
    debug!(
        "rws: matching {} old term(s) against {} new term(s)",
        as_.len(),
        bs.len()
    );

    if as_.is_empty() {
        return bs.into_iter().map(|b| Diff::Patch(Patch::Insert(b))).collect();
    }
    if bs.is_empty() {
        return as_.into_iter().map(|a| Diff::Patch(Patch::Delete(a))).collect();
    }

    let old_terms: Vec<UnmappedTerm<T>> = as_
        .into_iter()
        .enumerate()
        .map(|(index, term)| UnmappedTerm {
            index,
            feature: term.annotation.feature().to_vec(),
            term,
        })
        .collect();

    let points: Vec<Vec<f64>> = old_terms.iter().map(|t| t.feature.clone()).collect();
    let kdtree = KdTree::build(points).expect(
        "feature_vector_decorator always produces non-empty, consistently-sized vectors",
    );

    // A hash set keyed by old index gives O(1) average membership and
    // removal, instead of an O(|as|) linear scan, so the overall walk
    // stays log-linear.
    let mut unmapped: FxHashSet<usize> = (0..old_terms.len()).collect();
    let mut previous: i64 = -1;

    let mut output: Vec<(i64, Diff<T>)> = Vec::with_capacity(bs.len());

    for b in bs {
        let candidate_index = kdtree.nearest(b.annotation.feature());
        let candidate = &old_terms[candidate_index];

        let still_unmapped = unmapped.contains(&candidate_index);
        let monotonic = candidate.index as i64 >= previous;

        trace!(
            "rws: candidate old-index {} for new term (unmapped={}, monotonic={})",
            candidate_index,
            still_unmapped,
            monotonic
        );

        let commit = if still_unmapped && monotonic {
            compare(&candidate.term, &b)
        } else {
            None
        };

        match commit {
            Some(diff) => {
                previous = candidate.index as i64;
                unmapped.remove(&candidate_index);
                output.push((candidate.index as i64, diff));
            }
            None => {
                output.push((-1, Diff::Patch(Patch::Insert(b))));
            }
        }
    }

    let mut remaining: Vec<UnmappedTerm<T>> = old_terms
        .into_iter()
        .filter(|t| unmapped.contains(&t.index))
        .collect();
    remaining.sort_by_key(|t| t.index);
    for t in remaining {
        output.push((t.index as i64, Diff::Patch(Patch::Delete(t.term))));
    }

    // Stable sort ascending by old index: `-1` (inserts) sorts before
    // every real old index, and matches already appear in
    // non-decreasing old-index order from the walk, so this only has
    // to interleave the trailing deletes into place.
    output.sort_by_key(|(index, _)| *index);

    debug!("rws: finished with {} emitted diff(s)", output.len());

    output.into_iter().map(|(_, d)| d).collect()
}
