//! Labeling: the first stage of the pipeline. Decorates every node of
//! a tree with a label derived from its shape, leaves first.

use crate::tree::{Shape, Tree};

/// A node carrying a prior annotation `A` plus a computed label `L`.
/// One layer of the layered-annotation pattern: each pipeline stage
/// wraps the previous stage's annotation type rather than mutating a
/// single record with optional fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Labeled<A, L> {
    pub inner: A,
    pub label: L,
}

/// Exposes the label of a `Labeled<A, L>` (and, transitively, of any
/// later annotation layered on top of it) to downstream stages, so
/// `pqgram.rs` doesn't need to know the concrete annotation type, only
/// that it carries a label somewhere in its layer stack.
pub trait HasLabel<L> {
    fn label(&self) -> &L;
}

impl<A, L> HasLabel<L> for Labeled<A, L> {
    fn label(&self) -> &L {
        &self.label
    }
}

/// Post-order decoration: every node's label is computed from its own
/// prior annotation and its children's shapes (child counts), never
/// from the children's annotations or labels. Total by construction:
/// `label_fn` is a pure, caller-supplied function, so this can never
/// fail.
pub fn label_tree<A, L>(
    tree: Tree<A>,
    label_fn: &impl Fn(&A, &[Shape]) -> L,
) -> Tree<Labeled<A, L>> {
    let shapes: Vec<Shape> = tree.children.iter().map(Shape::of).collect();
    let label = label_fn(&tree.annotation, &shapes);
    let children = tree
        .children
        .into_iter()
        .map(|c| label_tree(c, label_fn))
        .collect();
    Tree {
        annotation: Labeled {
            inner: tree.annotation,
            label,
        },
        children,
    }
}
