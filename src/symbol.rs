use std::{fmt, hash::{Hash, Hasher}};

use crate::{constraint::{self, Constraint}, eval::EvalError, tree::Tree};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Category {
    Named(String),
    /// Stands for the left-hand side of the rule the symbol appears in.
    /// Gets rewritten when the rule is built.
    Itself,
}

/// A nonterminal, as used at one particular place of a grammar. The
/// constraints belong to the usage site: `A` and `A.with(c)` share the
/// same rules, but the latter filters everything it produces through `c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    category: Category,
    constraints: Vec<Constraint>,
}

impl Symbol {
    pub const ITSELF_NAME: &'static str = "Self";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            category: Category::Named(name.into()),
            constraints: Vec::new(),
        }
    }

    /// A reference to the left-hand side of the enclosing rule.
    pub fn itself() -> Self {
        Self {
            category: Category::Itself,
            constraints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        match &self.category {
            Category::Named(name) => name,
            Category::Itself => Self::ITSELF_NAME,
        }
    }

    pub fn is_itself(&self) -> bool {
        self.category == Category::Itself
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Same category, one more site constraint. The receiver is untouched.
    pub fn with(&self, constraint: Constraint) -> Symbol {
        let mut res = self.clone();
        res.constraints.push(constraint);
        res
    }

    pub fn accepts(&self, tree: &Tree) -> Result<bool, EvalError> {
        constraint::accepts_all(&self.constraints, tree)
    }

    /// Resolves `Symbol::itself()` to the category `owner`, keeping the
    /// constraints attached at this site.
    pub(crate) fn resolve_itself(&self, owner: &str) -> Symbol {
        if !self.is_itself() {
            return self.clone();
        }

        Symbol {
            category: Category::Named(owner.to_string()),
            constraints: self.constraints.clone(),
        }
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        for (idx, c) in self.constraints.iter().enumerate() {
            let sep = if idx == 0 { ": " } else { ", " };
            write!(f, "{sep}{c}")?;
        }
        Ok(())
    }
}
