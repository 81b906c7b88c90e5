use std::collections::HashSet;

use crate::tree::Tree;

/// Decides which of the enumerated programs are worth handing out.
pub trait ProgramFilter {
    fn is_useful_program(&self, tree: &Tree) -> bool;

    fn register_program(&mut self, tree: Tree);
}

impl<F: ProgramFilter + ?Sized> ProgramFilter for &mut F {
    fn is_useful_program(&self, tree: &Tree) -> bool {
        (**self).is_useful_program(tree)
    }

    fn register_program(&mut self, tree: Tree) {
        (**self).register_program(tree)
    }
}

/// Drops programs equal to one seen before. Equality is plain tree
/// equality, so `add(x, 1)` and `add(1, x)` collapse when `add` is
/// symmetric, but `mul(x, 2)` and `add(x, x)` both get through.
#[derive(Debug, Default)]
pub struct EquivalenceScreen {
    generated: HashSet<Tree>,
}

impl EquivalenceScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.generated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generated.is_empty()
    }
}

impl ProgramFilter for EquivalenceScreen {
    fn is_useful_program(&self, tree: &Tree) -> bool {
        !self.generated.contains(tree)
    }

    fn register_program(&mut self, tree: Tree) {
        self.generated.insert(tree);
    }
}
