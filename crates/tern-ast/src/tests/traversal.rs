use super::*;
use crate::node::{Meta, NodeKind};
use crate::stmt::{StmtData, StmtKind};

fn block(arena: &mut NodeArena) -> NodeId {
    arena.alloc(
        NodeKind::Stmt(StmtData::new(StmtKind::Block)),
        Meta::default(),
    )
}

fn tree(arena: &mut NodeArena) -> (NodeId, NodeId, NodeId, NodeId) {
    let root = block(arena);
    let a = block(arena);
    let b = block(arena);
    let c = block(arena);
    arena.add_child(root, a);
    arena.add_child(root, b);
    arena.add_child(a, c);
    (root, a, b, c)
}

#[test]
fn pre_order_parents_first() {
    let mut arena = NodeArena::new();
    let (root, a, b, c) = tree(&mut arena);
    assert_eq!(pre_order(&arena, root), vec![root, a, c, b]);
}

#[test]
fn post_order_children_first() {
    let mut arena = NodeArena::new();
    let (root, a, b, c) = tree(&mut arena);
    assert_eq!(post_order(&arena, root), vec![c, a, b, root]);
}

#[test]
fn prune_walk_stops_descent() {
    let mut arena = NodeArena::new();
    let (root, a, b, c) = tree(&mut arena);
    arena.node_mut(a).prune_walk = true;

    // Pre-order visits the pruned node itself but none of its children.
    let pre = pre_order(&arena, root);
    assert!(pre.contains(&a));
    assert!(!pre.contains(&c));

    // Post-order skips both the children and the pruned node.
    let post = post_order(&arena, root);
    assert!(!post.contains(&a));
    assert!(!post.contains(&c));
    assert!(post.contains(&b));
}

#[test]
fn null_slots_are_skipped() {
    let mut arena = NodeArena::new();
    let root = block(&mut arena);
    let a = block(&mut arena);
    arena.append_child_slot(root, None);
    arena.add_child(root, a);

    assert_eq!(pre_order(&arena, root), vec![root, a]);
}

#[test]
fn each_node_visited_once() {
    let mut arena = NodeArena::new();
    let (root, ..) = tree(&mut arena);
    let mut visited = pre_order(&arena, root);
    visited.sort();
    visited.dedup();
    assert_eq!(visited.len(), 4);
}
