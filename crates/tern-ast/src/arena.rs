//! Node arena.
//!
//! All AST nodes of a compilation context live in one `NodeArena` and are
//! addressed by `NodeId`. Parent links are plain ids, which makes weak
//! back-references (enum label to enum type, type name to declaration)
//! naturally expressible without reference counting.
//!
//! Nodes are never deallocated individually; detaching a node from its parent
//! only unlinks it. The arena is dropped wholesale with its context.

use smallvec::SmallVec;
use tern_common::{AstError, ErrorPriority, Location};

use crate::node::{Meta, Node, NodeKind};
use crate::scope::Scope;

/// Handle of a node within a `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Arena owning every node of one compilation context.
#[derive(Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a node with no children.
    pub fn alloc(&mut self, kind: NodeKind, meta: Meta) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, meta));
        id
    }

    /// Allocates a node and attaches the given children (null slots allowed).
    pub fn alloc_with_children(
        &mut self,
        kind: NodeKind,
        children: Vec<Option<NodeId>>,
        meta: Meta,
    ) -> NodeId {
        let id = self.alloc(kind, meta);
        for c in children {
            self.append_child_slot(id, c);
        }
        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[Option<NodeId>] {
        &self.node(id).children
    }

    /// Returns the child in a given slot, if present.
    #[inline]
    pub fn child(&self, id: NodeId, i: usize) -> Option<NodeId> {
        self.node(id).children.get(i).copied().flatten()
    }

    pub fn meta(&self, id: NodeId) -> &Meta {
        &self.node(id).meta
    }

    pub fn location(&self, id: NodeId) -> Location {
        self.node(id).meta.location.clone()
    }

    /// Walks the parent chain to the topmost node.
    pub fn top(&self, id: NodeId) -> NodeId {
        let mut n = id;
        while let Some(p) = self.parent(n) {
            n = p;
        }
        n
    }

    /// Returns the closest ancestor (including `id` itself) matching the
    /// predicate.
    pub fn ancestor_where(
        &self,
        id: NodeId,
        pred: impl Fn(&Node) -> bool,
    ) -> Option<NodeId> {
        let mut n = Some(id);
        while let Some(cur) = n {
            if pred(self.node(cur)) {
                return Some(cur);
            }
            n = self.parent(cur);
        }
        None
    }

    /// Returns the subset of children matching the predicate, skipping null
    /// slots.
    pub fn children_where(
        &self,
        id: NodeId,
        pred: impl Fn(&Node) -> bool,
    ) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .flatten()
            .filter(|&c| pred(self.node(c)))
            .collect()
    }

    // ===== Child mutation =====
    //
    // Every mutation below maintains the parent-link invariant: a node is in
    // exactly one parent slot at a time, and attaching it rewires its parent
    // link while detaching clears it.

    /// Appends a child node. A child without a location inherits the parent's.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.append_child_slot(parent, Some(child));
    }

    /// Appends a child slot, preserving null slots for positional indexing.
    pub fn append_child_slot(&mut self, parent: NodeId, child: Option<NodeId>) {
        if let Some(c) = child {
            self.adopt(parent, c);
        }
        self.node_mut(parent).children.push(child);
    }

    /// Replaces the child in slot `idx`, clearing the previous occupant's
    /// parent link.
    pub fn set_child(&mut self, parent: NodeId, idx: usize, child: Option<NodeId>) {
        if let Some(old) = self.node(parent).children[idx] {
            self.node_mut(old).parent = None;
        }
        if let Some(c) = child {
            self.adopt(parent, c);
        }
        self.node_mut(parent).children[idx] = child;
    }

    /// Removes the child slots in `[begin, end)`, clearing their parent links.
    pub fn remove_children(&mut self, parent: NodeId, begin: usize, end: usize) {
        let removed: SmallVec<[Option<NodeId>; 4]> =
            self.node(parent).children[begin..end].iter().copied().collect();
        for c in removed.into_iter().flatten() {
            self.node_mut(c).parent = None;
        }
        self.node_mut(parent).children.drain(begin..end);
    }

    /// Replaces the whole child list.
    pub fn replace_children(&mut self, parent: NodeId, children: Vec<Option<NodeId>>) {
        let n = self.node(parent).children.len();
        self.remove_children(parent, 0, n);
        for c in children {
            self.append_child_slot(parent, c);
        }
    }

    /// Replaces `old` with `new` in whatever slot of `parent` holds it.
    /// Returns false if `old` is not a child of `parent`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> bool {
        let idx = self
            .node(parent)
            .children
            .iter()
            .position(|c| *c == Some(old));
        match idx {
            Some(i) => {
                self.set_child(parent, i, Some(new));
                true
            }
            None => false,
        }
    }

    fn adopt(&mut self, parent: NodeId, child: NodeId) {
        let parent_loc = self.node(parent).meta.location.clone();
        let c = self.node_mut(child);
        if !c.meta.location.is_set() && parent_loc.is_set() {
            c.meta.location = parent_loc;
        }
        c.parent = Some(parent);
    }

    // ===== Cloning =====

    /// Shallow clone: duplicates the node itself, sharing its children.
    /// Identity is always fresh on clone; the clone starts detached.
    pub fn clone_shallow(&mut self, id: NodeId) -> NodeId {
        let mut node = self.node(id).clone();
        node.parent = None;
        node.scope = None;
        let nid = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        nid
    }

    /// Deep clone: recursively clones children, producing an isomorphic
    /// subtree with fresh identity on every interior node.
    pub fn clone_deep(&mut self, id: NodeId) -> NodeId {
        let nid = self.clone_shallow(id);
        let slots: SmallVec<[Option<NodeId>; 4]> =
            self.node(nid).children.iter().copied().collect();
        self.node_mut(nid).children.clear();
        for slot in slots {
            let cloned = slot.map(|c| self.clone_deep(c));
            self.append_child_slot(nid, cloned);
        }
        nid
    }

    // ===== Errors =====

    /// Attaches a normal-priority error at the node's own location.
    pub fn add_error(&mut self, id: NodeId, msg: impl Into<String>) {
        let loc = self.location(id);
        self.add_error_with(id, msg, loc, ErrorPriority::Normal, Vec::new());
    }

    /// Attaches an error with an explicit priority at the node's own location.
    pub fn add_error_prio(
        &mut self,
        id: NodeId,
        msg: impl Into<String>,
        priority: ErrorPriority,
    ) {
        let loc = self.location(id);
        self.add_error_with(id, msg, loc, priority, Vec::new());
    }

    /// Attaches an error with context lines.
    pub fn add_error_ctx(
        &mut self,
        id: NodeId,
        msg: impl Into<String>,
        context: Vec<String>,
    ) {
        let loc = self.location(id);
        self.add_error_with(id, msg, loc, ErrorPriority::Normal, context);
    }

    pub fn add_error_with(
        &mut self,
        id: NodeId,
        msg: impl Into<String>,
        location: Location,
        priority: ErrorPriority,
        context: Vec<String>,
    ) {
        self.node_mut(id).errors.push(
            AstError::new(msg)
                .with_location(location)
                .with_priority(priority)
                .with_context(context),
        );
    }

    pub fn has_errors(&self, id: NodeId) -> bool {
        !self.node(id).errors.is_empty()
    }

    pub fn clear_errors(&mut self, id: NodeId) {
        self.node_mut(id).errors.clear();
    }

    // ===== Scopes =====

    /// Returns the node's scope, creating it if not present yet.
    pub fn get_or_create_scope(&mut self, id: NodeId) -> &mut Scope {
        let node = self.node_mut(id);
        node.scope.get_or_insert_with(|| Box::new(Scope::new()))
    }

    pub fn scope(&self, id: NodeId) -> Option<&Scope> {
        self.node(id).scope.as_deref()
    }

    pub fn clear_scope(&mut self, id: NodeId) {
        self.node_mut(id).scope = None;
    }
}

impl std::ops::Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.node(id)
    }
}

impl std::ops::IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_mut(id)
    }
}

#[cfg(test)]
#[path = "tests/arena.rs"]
mod tests;
