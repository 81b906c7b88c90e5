use std::{fmt, hash::{Hash, Hasher}, rc::Rc};

use itertools::Either;

use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i64),
    Str(String),
    Var(String),
}

impl Value {
    pub fn key(&self) -> TreeKey {
        match self {
            Value::Int(x) => TreeKey::Int(*x),
            Value::Str(s) => TreeKey::Str(s.clone()),
            Value::Var(name) => TreeKey::Var(name.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Var(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Plain,
    /// The operator is commutative: once no holes remain, the children
    /// are compared and hashed as an unordered collection.
    Symmetric,
}

/// An operator applied to an ordered list of children. Children may still
/// be holes while the node is a grammar template.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    kind: NodeKind,
    children: Vec<Tree>,
    complete: bool,
    /// Child positions sorted by key. Only set for complete symmetric nodes.
    order: Option<Box<[usize]>>,
}

impl Node {
    pub fn new(name: impl Into<String>, children: impl IntoIterator<Item = Tree>) -> Self {
        Self::with_kind(name, NodeKind::Plain, children)
    }

    pub fn symmetric(name: impl Into<String>, children: impl IntoIterator<Item = Tree>) -> Self {
        Self::with_kind(name, NodeKind::Symmetric, children)
    }

    pub fn with_kind(
        name: impl Into<String>,
        kind: NodeKind,
        children: impl IntoIterator<Item = Tree>,
    ) -> Self {
        let children: Vec<Tree> = children.into_iter().collect();
        let complete = children.iter().all(Tree::is_complete);
        let order = (kind == NodeKind::Symmetric && complete).then(|| {
            let mut order: Vec<usize> = (0..children.len()).collect();
            order.sort_by_cached_key(|&idx| children[idx].key());
            order.into_boxed_slice()
        });

        Self {
            name: name.into(),
            kind,
            children,
            complete,
            order,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[Tree] {
        &self.children
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Positions of the children that are holes, in ascending order.
    pub fn hole_indices(&self) -> Vec<usize> {
        self.children.iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Tree::Hole(_)))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// The symbols of the hole children, in the same order as `hole_indices`.
    pub fn holes(&self) -> impl Iterator<Item = &Symbol> {
        self.children.iter().filter_map(Tree::as_hole)
    }

    /// Builds a copy of this node where the child at `ids[i]` is replaced
    /// with `replacements[i]`. The node kind is kept.
    pub fn replace_children(&self, ids: &[usize], replacements: Vec<Tree>) -> Node {
        // NOTE: these asserts failing is 100% an API misuse
        assert_eq!(
            ids.len(),
            replacements.len(),
            "Every replaced position needs exactly one replacement",
        );

        let mut children = self.children.clone();
        for (&idx, repl) in ids.iter().zip(replacements) {
            assert!(
                idx < children.len(),
                "Position {idx} is out of range for {}",
                self.name,
            );
            children[idx] = repl;
        }

        Self::with_kind(self.name.clone(), self.kind, children)
    }

    pub fn key(&self) -> TreeKey {
        TreeKey::Node {
            name: self.name.clone(),
            kind: self.kind,
            children: self.canonical_children().map(Tree::key).collect(),
        }
    }

    /// Children in the order used for equality, hashing and keys.
    fn canonical_children(&self) -> impl Iterator<Item = &Tree> {
        match &self.order {
            Some(order) => Either::Left(order.iter().map(move |&idx| &self.children[idx])),
            None => Either::Right(self.children.iter()),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.children.len() == other.children.len()
            && self.canonical_children().eq(other.canonical_children())
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.kind.hash(state);
        state.write_usize(self.children.len());
        self.canonical_children().for_each(|c| c.hash(state));
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, child) in self.children.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{child}")?;
        }
        write!(f, ")")
    }
}

/// A program fragment. A tree is complete when no hole is reachable from it;
/// only complete trees get evaluated, screened or handed out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tree {
    Value(Value),
    Node(Rc<Node>),
    Hole(Symbol),
}

impl Tree {
    pub fn int(x: i64) -> Self {
        Tree::Value(Value::Int(x))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Tree::Value(Value::Str(s.into()))
    }

    pub fn var(name: impl Into<String>) -> Self {
        Tree::Value(Value::Var(name.into()))
    }

    pub fn node(name: impl Into<String>, children: impl IntoIterator<Item = Tree>) -> Self {
        Tree::from(Node::new(name, children))
    }

    pub fn symmetric(name: impl Into<String>, children: impl IntoIterator<Item = Tree>) -> Self {
        Tree::from(Node::symmetric(name, children))
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Tree::Value(_) => true,
            Tree::Node(node) => node.is_complete(),
            Tree::Hole(_) => false,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Tree::Node(node) => Some(&**node),
            _ => None,
        }
    }

    pub fn as_hole(&self) -> Option<&Symbol> {
        match self {
            Tree::Hole(sym) => Some(sym),
            _ => None,
        }
    }

    /// Total order key. Symmetric nodes without holes sort their children,
    /// so two trees comparing equal always share a key.
    pub fn key(&self) -> TreeKey {
        match self {
            Tree::Value(v) => v.key(),
            Tree::Node(node) => node.key(),
            Tree::Hole(sym) => TreeKey::Hole(sym.name().to_string()),
        }
    }

    pub(crate) fn map_holes<F>(&self, f: &mut F) -> Tree
    where
        F: FnMut(&Symbol) -> Symbol,
    {
        match self {
            Tree::Value(_) => self.clone(),
            Tree::Hole(sym) => Tree::Hole(f(sym)),
            Tree::Node(node) => Tree::from(Node::with_kind(
                node.name(),
                node.kind(),
                node.children().iter().map(|c| c.map_holes(f)),
            )),
        }
    }
}

impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        Tree::Value(value)
    }
}

impl From<Node> for Tree {
    fn from(node: Node) -> Self {
        Tree::Node(Rc::new(node))
    }
}

impl From<Symbol> for Tree {
    fn from(sym: Symbol) -> Self {
        Tree::Hole(sym)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Value(v) => write!(f, "{v}"),
            Tree::Node(node) => write!(f, "{node}"),
            Tree::Hole(sym) => write!(f, "{sym}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TreeKey {
    Int(i64),
    Str(String),
    Var(String),
    Hole(String),
    Node {
        name: String,
        kind: NodeKind,
        children: Vec<TreeKey>,
    },
}
