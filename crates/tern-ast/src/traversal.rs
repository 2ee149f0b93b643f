//! Tree traversal.
//!
//! A configurable pre-order or post-order walk that yields each reachable
//! node exactly once. Traversal honors `prune_walk`: pre-order visits such a
//! node and stops descending; post-order skips both the node's children and
//! the node itself. Null child slots are skipped unless explicitly requested
//! (needed when rendering).
//!
//! Walks collect ids up front, so passes can rewrite the tree while
//! iterating; a pass that cares whether a visited node is still attached
//! checks its parent link.

use crate::arena::{NodeArena, NodeId};

/// Order of a traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Pre,
    Post,
}

/// Collects the nodes reachable from `root` in the given order.
pub fn walk(arena: &NodeArena, root: NodeId, order: Order) -> Vec<NodeId> {
    let mut out = Vec::new();
    collect(arena, root, order, &mut out);
    out
}

/// Pre-order walk.
pub fn pre_order(arena: &NodeArena, root: NodeId) -> Vec<NodeId> {
    walk(arena, root, Order::Pre)
}

/// Post-order walk: children before parents.
pub fn post_order(arena: &NodeArena, root: NodeId) -> Vec<NodeId> {
    walk(arena, root, Order::Post)
}

/// Pre-order walk that also reports the depth of each node.
pub fn pre_order_with_depth(arena: &NodeArena, root: NodeId) -> Vec<(usize, NodeId)> {
    let mut out = Vec::new();
    collect_with_depth(arena, root, 0, &mut out);
    out
}

fn collect(arena: &NodeArena, id: NodeId, order: Order, out: &mut Vec<NodeId>) {
    let node = arena.node(id);

    if node.prune_walk {
        // Pre-order still shows the pruned node itself; post-order does not.
        if order == Order::Pre {
            out.push(id);
        }
        return;
    }

    if order == Order::Pre {
        out.push(id);
    }

    for child in arena.children(id).iter().copied().flatten() {
        collect(arena, child, order, out);
    }

    if order == Order::Post {
        out.push(id);
    }
}

fn collect_with_depth(
    arena: &NodeArena,
    id: NodeId,
    depth: usize,
    out: &mut Vec<(usize, NodeId)>,
) {
    out.push((depth, id));

    if arena.node(id).prune_walk {
        return;
    }

    for child in arena.children(id).iter().copied().flatten() {
        collect_with_depth(arena, child, depth + 1, out);
    }
}

#[cfg(test)]
#[path = "tests/traversal.rs"]
mod tests;
