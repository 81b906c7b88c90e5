use std::{collections::hash_map::DefaultHasher, hash::{Hash, Hasher}};

use gramsynth::{
    constraint::Constraint,
    symbol::Symbol,
    tree::{Node, NodeKind, Tree},
};

fn hash_of(tree: &Tree) -> u64 {
    let mut hasher = DefaultHasher::new();
    tree.hash(&mut hasher);
    hasher.finish()
}

fn hole(name: &str) -> Tree {
    Tree::from(Symbol::new(name))
}

#[test]
fn symmetric_children_are_unordered() {
    let l = Tree::symmetric("add", [Tree::var("x"), Tree::int(1)]);
    let r = Tree::symmetric("add", [Tree::int(1), Tree::var("x")]);

    assert_eq!(l, r);
    assert_eq!(hash_of(&l), hash_of(&r));
    assert_eq!(l.key(), r.key());
}

#[test]
fn symmetry_applies_to_nested_nodes() {
    let l = Tree::symmetric("add", [
        Tree::symmetric("mul", [Tree::var("x"), Tree::var("y")]),
        Tree::int(1),
    ]);
    let r = Tree::symmetric("add", [
        Tree::int(1),
        Tree::symmetric("mul", [Tree::var("y"), Tree::var("x")]),
    ]);

    assert_eq!(l, r);
    assert_eq!(hash_of(&l), hash_of(&r));
}

#[test]
fn symmetric_children_compare_as_a_multiset() {
    let x = Tree::var("x");
    let one = Tree::int(1);
    let l = Tree::symmetric("f", [x.clone(), one.clone(), x.clone()]);
    let r = Tree::symmetric("f", [one.clone(), x.clone(), x.clone()]);
    let other = Tree::symmetric("f", [one.clone(), one, x]);

    assert_eq!(l, r);
    assert_eq!(hash_of(&l), hash_of(&r));
    assert_eq!(l.key(), r.key());
    assert_ne!(l, other);
    assert_ne!(l.key(), other.key());

    // Children keep their written order for display
    assert_eq!(l.to_string(), "f(x, 1, x)");
    assert_eq!(r.to_string(), "f(1, x, x)");
}

#[test]
fn plain_children_are_ordered() {
    let l = Tree::node("sub", [Tree::var("x"), Tree::int(1)]);
    let r = Tree::node("sub", [Tree::int(1), Tree::var("x")]);

    assert_ne!(l, r);
}

#[test]
fn symmetric_and_plain_nodes_differ() {
    let sym = Tree::symmetric("add", [Tree::var("x"), Tree::int(1)]);
    let plain = Tree::node("add", [Tree::var("x"), Tree::int(1)]);

    assert_ne!(sym, plain);
}

#[test]
fn symmetric_with_holes_is_positional() {
    let l = Tree::symmetric("add", [hole("A"), Tree::int(1)]);
    let r = Tree::symmetric("add", [Tree::int(1), hole("A")]);

    assert!(!l.is_complete());
    assert_ne!(l, r);
    assert_eq!(l, Tree::symmetric("add", [hole("A"), Tree::int(1)]));
}

#[test]
fn holes_with_different_constraints_differ() {
    let plain = hole("A");
    let dynamic = Tree::from(Symbol::new("A").with(Constraint::Dynamic));

    assert_ne!(plain, dynamic);
}

#[test]
fn values_of_different_kinds_differ() {
    assert_ne!(Tree::int(1), Tree::string("1"));
    assert_ne!(Tree::var("x"), Tree::string("x"));
}

#[test]
fn keys_give_a_total_order() {
    let mut trees = vec![
        Tree::node("f", [Tree::int(1)]),
        Tree::var("x"),
        Tree::int(10),
        Tree::int(-1),
        Tree::int(2),
    ];
    trees.sort_by_key(Tree::key);

    assert_eq!(trees, vec![
        Tree::int(-1),
        Tree::int(2),
        Tree::int(10),
        Tree::var("x"),
        Tree::node("f", [Tree::int(1)]),
    ]);
}

#[test]
fn renders_as_text() {
    let tree = Tree::node("sub", [
        Tree::var("x"),
        Tree::symmetric("add", [Tree::int(-1), Tree::string("s")]),
    ]);
    assert_eq!(tree.to_string(), r#"sub(x, add(-1, "s"))"#);

    let template = Tree::node("neg", [Tree::from(Symbol::new("A").with(Constraint::Dynamic))]);
    assert_eq!(template.to_string(), "neg(A: Dynamic)");
}

#[test]
fn finds_holes() {
    let node = Node::new("f", [hole("A"), Tree::int(1), hole("B")]);

    assert!(!node.is_complete());
    assert_eq!(node.hole_indices(), vec![0, 2]);
    assert_eq!(node.holes().map(Symbol::name).collect::<Vec<_>>(), vec!["A", "B"]);

    assert!(Node::new("f", [Tree::int(1)]).hole_indices().is_empty());
}

#[test]
fn replace_children_builds_a_new_node() {
    let node = Node::new("f", [hole("A"), Tree::int(1), hole("B")]);
    let filled = node.replace_children(&[0, 2], vec![Tree::var("x"), Tree::int(2)]);

    assert!(filled.is_complete());
    assert_eq!(Tree::from(filled), Tree::node("f", [Tree::var("x"), Tree::int(1), Tree::int(2)]));
    assert_eq!(node.hole_indices(), vec![0, 2]);
}

#[test]
fn replace_children_keeps_symmetry() {
    let node = Node::symmetric("add", [hole("A"), hole("A")]);
    let filled = node.replace_children(&[0, 1], vec![Tree::var("x"), Tree::int(1)]);

    assert_eq!(filled.kind(), NodeKind::Symmetric);
    assert_eq!(Tree::from(filled), Tree::symmetric("add", [Tree::int(1), Tree::var("x")]));
}

#[test]
#[should_panic]
fn replace_children_rejects_mismatched_lengths() {
    let node = Node::new("f", [hole("A"), hole("B")]);
    node.replace_children(&[0, 1], vec![Tree::int(1)]);
}
