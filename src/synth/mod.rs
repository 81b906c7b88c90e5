pub mod enumerative;

use std::time::Instant;

use crate::{eval::EvalError, tree::Tree};

/// A synthesizer is an iterator-like structure. It can generate
/// new program candidates, but in addition to that it can also
/// be told how the previous candidates fared. This allows synthesizers
/// to speed up the search.
pub trait Synthesizer {
    /// Query the synthesizer for a next program to try. The synthesizer
    /// may return `None` if it can no longer provide any new candidate.
    fn next_candidate(&mut self) -> Option<Result<Tree, EvalError>>;

    /// Reports the verdict on a candidate previously returned by
    /// `next_candidate`.
    fn feedback(&mut self, candidate: &Tree, correct: bool);

    /// Tells the synthesizer when the search gives up. A synthesizer that
    /// could otherwise search for a next candidate forever should return
    /// `None` once `deadline` has passed.
    fn set_deadline(&mut self, _deadline: Instant) {}
}
