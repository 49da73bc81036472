//! `Gram<L>`: the fixed-size structural fingerprint of a node. Stem
//! and base slots that don't reach their target length are padded
//! with "absent", spelled here as `None`.

use crate::error::CoreError;
use std::fmt;
use std::hash::{Hash, Hasher};
use rustc_hash::FxHasher;

/// Everything a pq-gram label type must support. Implementors add an
/// empty `impl GramLabel for T {}` to opt in.
pub trait GramLabel: Clone + Eq + Hash + fmt::Debug {}

impl GramLabel for String {}
impl GramLabel for &'static str {}
impl GramLabel for i8 {}
impl GramLabel for u8 {}
impl GramLabel for i16 {}
impl GramLabel for u16 {}
impl GramLabel for i32 {}
impl GramLabel for u32 {}
impl GramLabel for i64 {}
impl GramLabel for u64 {}
impl GramLabel for usize {}
impl GramLabel for char {}

/// A pq-gram: `p` ancestor labels (`stem`, root-ward, nearest first)
/// and `q` sibling labels (`base`, the node itself plus its
/// neighbors in sibling order). Both sequences are padded with
/// `None` ("absent") to their exact target length, never shorter,
/// never longer: `stem.len() == p` and `base.len() == q` always.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gram<L: GramLabel> {
    stem: Vec<Option<L>>,
    base: Vec<Option<L>>,
}

impl<L: GramLabel> Gram<L> {
    /// Builds a gram from already-padded stem/base sequences.
    /// Infallible: used internally by the decoration pipeline, which
    /// always hands in exactly-sized sequences by construction.
    pub(crate) fn from_parts(stem: Vec<Option<L>>, base: Vec<Option<L>>) -> Gram<L> {
        Gram { stem, base }
    }

    /// Builds a gram from caller-supplied stem/base, validating their
    /// lengths against `p`/`q`. This is the one gram constructor a
    /// caller outside the pipeline can reach, so it is the one that
    /// reports rather than asserts.
    pub fn new(p: usize, q: usize, stem: Vec<Option<L>>, base: Vec<Option<L>>) -> Result<Gram<L>, CoreError> {
        if stem.len() != p {
            return Err(CoreError::WrongStemLength {
                expected: p,
                actual: stem.len(),
            });
        }
        if base.len() != q {
            return Err(CoreError::WrongBaseLength {
                expected: q,
                actual: base.len(),
            });
        }
        Ok(Gram { stem, base })
    }

    pub fn stem(&self) -> &[Option<L>] {
        &self.stem
    }

    pub fn base(&self) -> &[Option<L>] {
        &self.base
    }

    /// `u64` hash of `stem ++ base`. Uses `FxHasher` for a fast hash
    /// that is stable across process runs (unlike the std
    /// `DefaultHasher`'s randomized per-process seed), which the
    /// downstream PRNG seeding in `vector.rs` depends on.
    pub fn hash_u64(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for label in self.stem.iter().chain(self.base.iter()) {
            label.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// `xs` truncated to its first `n` elements, or padded on the right
/// with `None` up to length `n`.
pub fn pad_to_size<L: Clone>(n: usize, xs: &[Option<L>]) -> Vec<Option<L>> {
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        out.push(xs.get(i).cloned().unwrap_or(None));
    }
    out
}
