use std::{collections::{BTreeSet, HashMap}, fmt, iter, time::Instant};

use log::{debug, trace};

use crate::{
    constraint::{self, Constraint},
    eval::EvalError,
    screen::ProgramFilter,
    substitute::{self, Expansion},
    symbol::Symbol,
    tree::Tree,
};

/// `lhs := rhs`. The right-hand side is a leaf, a node template whose
/// holes are filled from the grammar, or a single symbol (an alias).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    lhs: Symbol,
    rhs: Tree,
    constraints: Vec<Constraint>,
}

impl Rule {
    pub fn new(lhs: Symbol, rhs: impl Into<Tree>) -> Self {
        Self::constrained(lhs, rhs, [])
    }

    /// A rule whose every complete result must pass `constraints`.
    /// Occurrences of `Symbol::itself()` in `rhs` are bound to `lhs` here.
    ///
    /// Holes of a node template must be direct children of the template:
    /// `f(A, 1)` is fine, `f(g(A))` is rejected. Nest through a helper
    /// symbol instead (`f(B)` with `B := g(A)`).
    pub fn constrained(
        lhs: Symbol,
        rhs: impl Into<Tree>,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Self {
        assert!(!lhs.is_itself(), "A rule needs a named left-hand side");

        let rhs: Tree = rhs.into();
        if let Some(template) = rhs.as_node() {
            assert!(
                template.children().iter().all(|c| c.as_hole().is_some() || c.is_complete()),
                "Holes of {template} must be its direct children",
            );
        }
        let rhs = rhs.map_holes(&mut |sym| sym.resolve_itself(lhs.name()));

        Self {
            lhs,
            rhs,
            constraints: constraints.into_iter().collect(),
        }
    }

    pub fn lhs(&self) -> &Symbol {
        &self.lhs
    }

    pub fn rhs(&self) -> &Tree {
        &self.rhs
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn accepts(&self, tree: &Tree) -> Result<bool, EvalError> {
        constraint::accepts_all(&self.constraints, tree)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \t:= {}", self.lhs, self.rhs)?;
        for (idx, c) in self.constraints.iter().enumerate() {
            let sep = if idx == 0 { ": " } else { ", " };
            write!(f, "{sep}{c}")?;
        }
        Ok(())
    }
}

/// Rules grouped by the name of their left-hand side, plus a start
/// symbol. Rules keep their insertion order, which fixes the order in
/// which programs get enumerated.
#[derive(Debug, Clone)]
pub struct Grammar {
    start: Symbol,
    rules: Vec<Rule>,
    by_lhs: HashMap<String, Vec<usize>>,
}

impl Grammar {
    pub fn new(start: Symbol) -> Self {
        assert!(!start.is_itself(), "The start symbol must be named");

        Self {
            start,
            rules: Vec::new(),
            by_lhs: HashMap::new(),
        }
    }

    pub fn add_rule(&mut self, rule: Rule) -> &mut Self {
        self.by_lhs.entry(rule.lhs().name().to_string())
            .or_default()
            .push(self.rules.len());
        self.rules.push(rule);
        self
    }

    pub fn start(&self) -> &Symbol {
        &self.start
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rules_for<'g>(&'g self, name: &str) -> impl Iterator<Item = &'g Rule> + 'g {
        self.by_lhs.get(name)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.rules[idx])
    }

    /// Names used as holes or aliases (or as the start symbol) for which
    /// no rule exists. Such holes never produce anything.
    pub fn undefined_symbols(&self) -> BTreeSet<String> {
        let mut used = vec![self.start.name().to_string()];
        for rule in &self.rules {
            collect_hole_names(rule.rhs(), &mut used);
        }

        used.into_iter()
            .filter(|name| !self.by_lhs.contains_key(name))
            .collect()
    }

    /// Programs of nesting depth at most `depth` that `screen` has not
    /// seen yet. Every program handed out is registered with `screen`.
    pub fn enumerate_bottom_up<'g, F: ProgramFilter>(
        &'g self,
        depth: usize,
        screen: &'g mut F,
    ) -> Enumeration<'g, &'g mut F> {
        Enumeration::new(self, screen, depth, Some(depth))
    }

    /// Same as running `enumerate_bottom_up` for depths `0..=max_depth`
    /// with a single screen.
    pub fn enumerate_up_to<F: ProgramFilter>(
        &self,
        max_depth: usize,
        screen: F,
    ) -> Enumeration<'_, F> {
        Enumeration::new(self, screen, 0, Some(max_depth))
    }

    /// Programs of ever increasing depth. Only stops after an error or,
    /// when one is set, once the deadline has passed. With a finite
    /// language and no deadline, pulling past the last program never
    /// returns.
    pub fn enumerate_forever<F: ProgramFilter>(&self, screen: F) -> Enumeration<'_, F> {
        Enumeration::new(self, screen, 0, None)
    }
}

impl Extend<Rule> for Grammar {
    fn extend<T: IntoIterator<Item = Rule>>(&mut self, rules: T) {
        for rule in rules {
            self.add_rule(rule);
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grammar (start: {}):", self.start)?;
        for rule in &self.rules {
            write!(f, "\n  {rule}")?;
        }
        Ok(())
    }
}

fn collect_hole_names(tree: &Tree, out: &mut Vec<String>) {
    match tree {
        Tree::Value(_) => (),
        Tree::Hole(sym) => out.push(sym.name().to_string()),
        Tree::Node(node) => node.children()
            .iter()
            .for_each(|c| collect_hole_names(c, out)),
    }
}

/// Lazy stream of screened programs, one depth after another. The
/// stream stops for good after yielding an error.
pub struct Enumeration<'g, F> {
    grammar: &'g Grammar,
    screen: F,
    depth: usize,
    max_depth: Option<usize>,
    deadline: Option<Instant>,
    current: Expansion<'g>,
    failed: bool,
}

impl<'g, F: ProgramFilter> Enumeration<'g, F> {
    fn new(grammar: &'g Grammar, screen: F, depth: usize, max_depth: Option<usize>) -> Self {
        debug!("Enumerating at depth {depth}");

        Self {
            grammar,
            screen,
            depth,
            max_depth,
            deadline: None,
            current: substitute::expand(grammar, grammar.start(), depth),
            failed: false,
        }
    }

    /// The depth currently being enumerated.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn screen(&self) -> &F {
        &self.screen
    }

    pub fn into_screen(self) -> F {
        self.screen
    }

    /// Stop moving on to deeper rounds once `deadline` has passed. The
    /// round in progress is still drained.
    pub fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.set_deadline(deadline);
        self
    }

    fn exhausted(&self) -> bool {
        self.max_depth.is_some_and(|max| self.depth >= max)
    }

    fn out_of_time(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

impl<'g, F: ProgramFilter> Iterator for Enumeration<'g, F> {
    type Item = Result<Tree, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            match self.current.next() {
                Some(Ok(tree)) => {
                    if !self.screen.is_useful_program(&tree) {
                        trace!("Screened out: {tree}");
                        continue;
                    }

                    self.screen.register_program(tree.clone());
                    return Some(Ok(tree));
                },
                Some(Err(e)) => {
                    self.failed = true;
                    self.current = Box::new(iter::empty());
                    return Some(Err(e));
                },
                None if self.exhausted() => return None,
                None if self.out_of_time() => {
                    debug!("Deadline passed after depth {}", self.depth);
                    return None;
                },
                None => {
                    self.depth += 1;
                    debug!("Enumerating at depth {}", self.depth);
                    self.current = substitute::expand(self.grammar, self.grammar.start(), self.depth);
                },
            }
        }
    }
}
