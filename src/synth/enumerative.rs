use std::time::Instant;

use crate::{
    eval::EvalError,
    grammar::{Enumeration, Grammar},
    screen::EquivalenceScreen,
    tree::Tree,
};

use super::Synthesizer;

/// Proposes the programs of a grammar smallest first, skipping the
/// ones equal to an earlier proposal.
pub struct EnumerativeSynth<'g> {
    enumeration: Enumeration<'g, EquivalenceScreen>,
}

impl<'g> EnumerativeSynth<'g> {
    pub fn new(grammar: &'g Grammar, max_depth: Option<usize>) -> Self {
        let screen = EquivalenceScreen::new();
        let enumeration = match max_depth {
            Some(max) => grammar.enumerate_up_to(max, screen),
            None => grammar.enumerate_forever(screen),
        };

        Self { enumeration }
    }

    pub fn depth(&self) -> usize {
        self.enumeration.depth()
    }

    pub fn proposed(&self) -> usize {
        self.enumeration.screen().len()
    }
}

impl<'g> Synthesizer for EnumerativeSynth<'g> {
    fn next_candidate(&mut self) -> Option<Result<Tree, EvalError>> {
        self.enumeration.next()
    }

    fn feedback(&mut self, _candidate: &Tree, _correct: bool) {
        // Plain enumeration doesn't learn
    }

    fn set_deadline(&mut self, deadline: Instant) {
        self.enumeration.set_deadline(deadline);
    }
}
