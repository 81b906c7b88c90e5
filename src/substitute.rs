//! Bottom-up hole filling.
//!
//! Depth is only consumed when descending into the holes of a node
//! template. Picking a rule for a symbol, or following a rule that is a
//! plain alias for another symbol, is free. Leaves are produced at any
//! positive depth.

use std::{iter, rc::Rc};

use itertools::Itertools;
use log::trace;

use crate::{
    constraint::{self, Constraint},
    eval::EvalError,
    grammar::{Grammar, Rule},
    symbol::Symbol,
    tree::{Node, Tree},
};

pub type Expansion<'g> = Box<dyn Iterator<Item = Result<Tree, EvalError>> + 'g>;

/// Every complete tree `symbol` can produce within `depth` levels of
/// nodes, filtered through the constraints of this usage site.
pub fn expand<'g>(grammar: &'g Grammar, symbol: &'g Symbol, depth: usize) -> Expansion<'g> {
    if depth == 0 {
        return Box::new(iter::empty());
    }

    trace!("Expand {symbol} at depth {depth}");

    let trees = grammar.rules_for(symbol.name())
        .flat_map(move |rule| expand_rule(grammar, rule, depth));

    filtered(trees, symbol.constraints())
}

/// Every complete tree a single application of `rule` can produce,
/// filtered through the rule's own constraints.
pub fn expand_rule<'g>(grammar: &'g Grammar, rule: &'g Rule, depth: usize) -> Expansion<'g> {
    if depth == 0 {
        return Box::new(iter::empty());
    }

    let trees: Expansion<'g> = match rule.rhs() {
        Tree::Hole(alias) => expand(grammar, alias, depth),
        Tree::Value(_) => Box::new(iter::once(Ok(rule.rhs().clone()))),
        Tree::Node(template) => fill_template(grammar, template, depth),
    };

    filtered(trees, rule.constraints())
}

fn fill_template<'g>(grammar: &'g Grammar, template: &'g Rc<Node>, depth: usize) -> Expansion<'g> {
    let ids = template.hole_indices();

    if ids.is_empty() {
        return Box::new(iter::once(Ok(Tree::Node(Rc::clone(template)))));
    }

    // Sub-expansions are only computed once the caller starts pulling.
    let fills = iter::once(()).flat_map(move |()| -> Expansion<'g> {
        let subs = template.holes()
            .map(|sym| expand(grammar, sym, depth - 1).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>();
        let subs = match subs {
            Ok(subs) => subs,
            Err(e) => return Box::new(iter::once(Err(e))),
        };

        trace!(
            "Fill {template}: {} combinations",
            subs.iter().map(Vec::len).product::<usize>(),
        );

        let ids = ids.clone();
        // Leftmost hole varies slowest.
        let trees = subs.into_iter()
            .map(Vec::into_iter)
            .multi_cartesian_product()
            .map(move |fill| Ok(Tree::from(template.replace_children(&ids, fill))));

        Box::new(trees)
    });

    Box::new(fills)
}

fn filtered<'g>(
    trees: impl Iterator<Item = Result<Tree, EvalError>> + 'g,
    constraints: &'g [Constraint],
) -> Expansion<'g> {
    if constraints.is_empty() {
        return Box::new(trees);
    }

    Box::new(trees.filter_map(move |res| {
        let tree = match res {
            Ok(tree) => tree,
            Err(e) => return Some(Err(e)),
        };

        match constraint::accepts_all(constraints, &tree) {
            Ok(true) => Some(Ok(tree)),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }))
}
