//! PQ-Gram decoration: replaces every node's label with a `Gram<L>`,
//! the sequence of `p` ancestor labels (stem) and `q` sibling labels
//! (base).
//!
//! Two passes:
//!
//! - Pass 1 (top-down) threads the ancestor list root-to-leaf and
//!   assigns every node its `stem`.
//! - Pass 2 (bottom-up) assigns every node's `base` from its
//!   children's labels, sliced into a per-child suffix window as the
//!   walk proceeds left to right; the root, which is nobody's child
//!   and so is never assigned a base by a parent's pass-2 walk, keeps
//!   a fallback self-assignment built from its own children's labels.

use crate::gram::{pad_to_size, Gram, GramLabel};
use crate::label::{HasLabel, Labeled};
use crate::tree::Tree;

/// Annotation layer produced by pass 1: prior annotation `P` plus a
/// provisional stem, not yet paired with a base.
#[derive(Debug, Clone)]
struct Stemmed<P, L> {
    inner: P,
    stem: Vec<Option<L>>,
}

impl<P: HasLabel<L>, L> HasLabel<L> for Stemmed<P, L> {
    fn label(&self) -> &L {
        self.inner.label()
    }
}

/// Annotation layer produced by the full pipeline: prior annotation
/// `P` plus the finished gram.
#[derive(Debug, Clone)]
pub struct GramAnnotated<P, L: GramLabel> {
    pub inner: P,
    pub gram: Gram<L>,
}

/// Exposes the gram of a `GramAnnotated<P, L>` to downstream stages
/// (`vector.rs`), the same way `HasLabel` exposes the label.
pub trait HasGram<L: GramLabel> {
    fn gram(&self) -> &Gram<L>;
}

impl<P, L: GramLabel> HasGram<L> for GramAnnotated<P, L> {
    fn gram(&self) -> &Gram<L> {
        &self.gram
    }
}

/// Labels a tree, decorates it with pq-grams, and flattens the result
/// into the bag (multiset) of every node's gram. Grams are returned
/// in pre-order; since the return type is a bag, callers must not
/// depend on that order.
pub fn pqgrams<A, L: GramLabel>(
    tree: Tree<A>,
    label_fn: &impl Fn(&A, &[crate::tree::Shape]) -> L,
    p: usize,
    q: usize,
) -> Vec<Gram<L>> {
    let labeled = crate::label::label_tree(tree, label_fn);
    let grammed = pqgram_tree(labeled, p, q);
    let mut out = Vec::new();
    collect_grams(&grammed, &mut out);
    out
}

fn collect_grams<P, L: GramLabel>(tree: &Tree<GramAnnotated<P, L>>, out: &mut Vec<Gram<L>>) {
    out.push(tree.annotation.gram.clone());
    for c in &tree.children {
        collect_grams(c, out);
    }
}

/// Decorates every node of a labeled tree with its pq-gram.
///
/// `p` and `q` may both be zero: the result is a tree of grams with
/// empty stems and/or empty bases, never a panic.
pub fn pqgram_tree<A, L: GramLabel>(
    tree: Tree<Labeled<A, L>>,
    p: usize,
    q: usize,
) -> Tree<GramAnnotated<Labeled<A, L>, L>> {
    let stemmed = pass1_stems(tree, p, &[]);
    pass2_bases(stemmed, q)
}

/// Pass 1: top-down. `ancestors` holds the nearest ancestors first,
/// already capped to at most `p` entries (older entries are never
/// read by `pad_to_size`, so there is no point carrying them).
fn pass1_stems<A, L: GramLabel>(
    tree: Tree<Labeled<A, L>>,
    p: usize,
    ancestors: &[L],
) -> Tree<Stemmed<Labeled<A, L>, L>> {
    let ancestor_opts: Vec<Option<L>> = ancestors.iter().cloned().map(Some).collect();
    let stem = pad_to_size(p, &ancestor_opts);

    let mut child_ancestors: Vec<L> = Vec::with_capacity(p);
    child_ancestors.push(tree.annotation.label.clone());
    child_ancestors.extend(ancestors.iter().take(p.saturating_sub(1)).cloned());

    let children = tree
        .children
        .into_iter()
        .map(|c| pass1_stems(c, p, &child_ancestors))
        .collect();

    Tree {
        annotation: Stemmed {
            inner: tree.annotation,
            stem,
        },
        children,
    }
}

/// Pass 2: bottom-up. Finalizes every child's base from a right-ward
/// suffix of its sibling group, then recurses so grandchildren are
/// finalized the same way by their own parent. The node passed to
/// this function is itself finalized using its *own* children's
/// labels, correct for the root (no parent exists to override it) and
/// harmlessly overwritten by the caller for every non-root node.
fn pass2_bases<A, L: GramLabel>(
    tree: Tree<Stemmed<Labeled<A, L>, L>>,
    q: usize,
) -> Tree<GramAnnotated<Labeled<A, L>, L>> {
    let sibling_labels: Vec<L> = tree
        .children
        .iter()
        .map(|c| c.annotation.label().clone())
        .collect();

    let children = tree
        .children
        .into_iter()
        .enumerate()
        .map(|(i, child)| {
            let mut finalized = pass2_bases(child, q);
            let suffix: Vec<Option<L>> =
                sibling_labels[i..].iter().cloned().map(Some).collect();
            let base = pad_to_size(q, &suffix);
            finalized.annotation.gram =
                Gram::from_parts(finalized.annotation.gram.stem().to_vec(), base);
            finalized
        })
        .collect();

    let self_base_src: Vec<Option<L>> = sibling_labels.into_iter().map(Some).collect();
    let self_base = pad_to_size(q, &self_base_src);

    Tree {
        annotation: GramAnnotated {
            inner: tree.annotation.inner,
            gram: Gram::from_parts(tree.annotation.stem, self_base),
        },
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::label_tree;
    use crate::tree::Shape;

    fn own_label(ann: &String, _shapes: &[Shape]) -> String {
        ann.clone()
    }

    fn build(label: &str, children: Vec<Tree<String>>) -> Tree<String> {
        Tree::new(label.to_string(), children)
    }

    #[test]
    fn stem_and_base_have_exact_arity_everywhere() {
        let t = build(
            "a",
            vec![
                build("a", vec![build("e", vec![]), build("b", vec![])]),
                build("b", vec![]),
                build("c", vec![]),
            ],
        );
        let labeled = label_tree(t, &own_label);
        let grammed = pqgram_tree(labeled, 2, 3);

        fn check<A>(t: &Tree<GramAnnotated<Labeled<A, String>, String>>, p: usize, q: usize) {
            assert_eq!(t.annotation.gram.stem().len(), p);
            assert_eq!(t.annotation.gram.base().len(), q);
            for c in &t.children {
                check(c, p, q);
            }
        }
        check(&grammed, 2, 3);
    }

    #[test]
    fn root_base_comes_from_its_own_children() {
        let t = build("a", vec![build("b", vec![]), build("c", vec![])]);
        let labeled = label_tree(t, &own_label);
        let grammed = pqgram_tree(labeled, 2, 3);
        assert_eq!(
            grammed.annotation.gram.base(),
            &[Some("b".to_string()), Some("c".to_string()), None]
        );
        // Root has no ancestors at all.
        assert_eq!(grammed.annotation.gram.stem(), &[None, None]);
    }

    #[test]
    fn middle_child_base_is_suffix_of_its_sibling_group() {
        let t = build(
            "a",
            vec![build("b", vec![]), build("c", vec![]), build("d", vec![])],
        );
        let labeled = label_tree(t, &own_label);
        let grammed = pqgram_tree(labeled, 2, 3);
        // "c" is the middle child: base = [c, d, absent].
        assert_eq!(
            grammed.children[1].annotation.gram.base(),
            &[Some("c".to_string()), Some("d".to_string()), None]
        );
        // "d" is the last child: base = [d, absent, absent].
        assert_eq!(
            grammed.children[2].annotation.gram.base(),
            &[Some("d".to_string()), None, None]
        );
    }

    #[test]
    fn child_stem_is_parent_then_grandparent_nearest_first() {
        let t = build("a", vec![build("b", vec![build("c", vec![])])]);
        let labeled = label_tree(t, &own_label);
        let grammed = pqgram_tree(labeled, 2, 3);
        let c_node = &grammed.children[0].children[0];
        assert_eq!(
            c_node.annotation.gram.stem(),
            &[Some("b".to_string()), Some("a".to_string())]
        );
    }

    #[test]
    fn zero_p_gives_empty_stem_everywhere() {
        let t = build("a", vec![build("b", vec![])]);
        let labeled = label_tree(t, &own_label);
        let grammed = pqgram_tree(labeled, 0, 2);
        assert!(grammed.annotation.gram.stem().is_empty());
        assert!(grammed.children[0].annotation.gram.stem().is_empty());
    }

    #[test]
    fn zero_q_gives_empty_base_everywhere() {
        let t = build("a", vec![build("b", vec![])]);
        let labeled = label_tree(t, &own_label);
        let grammed = pqgram_tree(labeled, 2, 0);
        assert!(grammed.annotation.gram.base().is_empty());
        assert!(grammed.children[0].annotation.gram.base().is_empty());
    }

    #[test]
    fn pqgrams_bag_has_one_gram_per_node() {
        let t = build(
            "a",
            vec![build("b", vec![build("d", vec![])]), build("c", vec![])],
        );
        let bag = pqgrams(t, &own_label, 2, 3);
        assert_eq!(bag.len(), 4);
    }

    #[test]
    fn zero_p_and_zero_q_does_not_panic() {
        let t = build("a", vec![build("b", vec![])]);
        let labeled = label_tree(t, &own_label);
        let grammed = pqgram_tree(labeled, 0, 0);
        assert!(grammed.annotation.gram.stem().is_empty());
        assert!(grammed.annotation.gram.base().is_empty());
    }
}
