//! Error handling for the few seams of this crate that aren't total.
//!
//! The decoration pipeline and the RWS driver have no recoverable
//! error conditions: given well-typed input that already satisfies
//! the crate's preconditions, they cannot fail. Those preconditions
//! are checked with `debug_assert!` at the call sites that produce
//! the data (see `pqgram.rs`, `vector.rs`). The two constructors a
//! caller can feed malformed data into directly, building a `Gram` by
//! hand or building a `KdTree` from a point set collected elsewhere,
//! validate and report via this type instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("gram stem has length {actual}, expected p = {expected}")]
    WrongStemLength { expected: usize, actual: usize },

    #[error("gram base has length {actual}, expected q = {expected}")]
    WrongBaseLength { expected: usize, actual: usize },

    #[error("k-d tree requires at least one point")]
    EmptyPointSet,

    #[error("k-d tree points have inconsistent dimension: expected {expected}, found {actual} at index {index}")]
    InconsistentDimension {
        expected: usize,
        actual: usize,
        index: usize,
    },

    #[error("feature vector dimension must be non-zero")]
    ZeroDimension,
}
