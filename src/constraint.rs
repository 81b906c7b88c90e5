use std::{fmt, rc::Rc};

use log::trace;

use crate::{eval::{Bindings, Datum, EvalError, Evaluator}, tree::{Tree, Value}};

/// A predicate over candidate trees, attached either to a symbol usage
/// site or to a production rule.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Rejects trees that evaluate to `forbidden` under `binds`. A tree
    /// referring to a variable missing from `binds` cannot be judged and
    /// is let through.
    DoesNotEvaluateTo {
        forbidden: Datum,
        evaluator: Rc<Evaluator>,
        binds: Bindings,
    },
    /// Rejects nodes having two equal children.
    DistinctChildren,
    /// Rejects trees that reference no variable at all.
    Dynamic,
}

impl Constraint {
    pub fn does_not_evaluate_to(
        forbidden: impl Into<Datum>,
        evaluator: Rc<Evaluator>,
        binds: Bindings,
    ) -> Self {
        Constraint::DoesNotEvaluateTo {
            forbidden: forbidden.into(),
            evaluator,
            binds,
        }
    }

    pub fn accepts(&self, tree: &Tree) -> Result<bool, EvalError> {
        let res = match self {
            Constraint::DoesNotEvaluateTo { forbidden, evaluator, binds } => {
                match evaluator.eval(tree, binds) {
                    Ok(val) => val != *forbidden,
                    Err(e) if e.is_unbound() => true,
                    Err(e) => return Err(e),
                }
            },
            Constraint::DistinctChildren => distinct_children(tree),
            Constraint::Dynamic => is_dynamic(tree),
        };

        trace!("{self} on {tree}: {res}");

        Ok(res)
    }
}

/// Conjunction of `constraints`. Stops at the first rejection or error.
pub fn accepts_all(constraints: &[Constraint], tree: &Tree) -> Result<bool, EvalError> {
    for c in constraints {
        if !c.accepts(tree)? {
            return Ok(false);
        }
    }

    Ok(true)
}

fn distinct_children(tree: &Tree) -> bool {
    let Some(node) = tree.as_node() else { return true; };
    let children = node.children();

    children.iter()
        .enumerate()
        .all(|(idx, x)| children[idx + 1..].iter().all(|y| x != y))
}

fn is_dynamic(tree: &Tree) -> bool {
    match tree {
        Tree::Value(Value::Var(_)) => true,
        Tree::Node(node) => node.children().iter().any(is_dynamic),
        _ => false,
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Constraint::DoesNotEvaluateTo { forbidden: f1, evaluator: e1, binds: b1 },
                Constraint::DoesNotEvaluateTo { forbidden: f2, evaluator: e2, binds: b2 },
            ) => f1 == f2 && Rc::ptr_eq(e1, e2) && b1 == b2,
            (Constraint::DistinctChildren, Constraint::DistinctChildren) => true,
            (Constraint::Dynamic, Constraint::Dynamic) => true,
            _ => false,
        }
    }
}

impl Eq for Constraint {}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::DoesNotEvaluateTo { forbidden, .. } => write!(f, "!= {forbidden}"),
            Constraint::DistinctChildren => write!(f, "DistinctChildren"),
            Constraint::Dynamic => write!(f, "Dynamic"),
        }
    }
}
