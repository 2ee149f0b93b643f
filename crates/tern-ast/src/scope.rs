//! Lexical scopes and identifier lookup.
//!
//! A scope maps unqualified identifiers to sets of declaration nodes and is
//! attached to scope-introducing nodes. Lookup is hierarchical: starting from
//! a node, we walk up the parent chain consulting each scope we encounter.
//! Nodes with `inherit_scope == false` make lookup jump directly to the
//! enclosing module scope, with one-level leniency when the non-inheriting
//! node is the type payload of a type declaration (so the declaration's own
//! scope is still consulted).
//!
//! Qualified identifiers descend through module, imported-module, and type
//! declarations one component at a time; crossing an import edge marks the
//! result external, which restricts it to `Public` declarations.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tern_common::Id;

use crate::arena::{NodeArena, NodeId};
use crate::decl::{self, DeclData, DeclKind, Linkage};
use crate::node::NodeKind;

/// A mapping from unqualified identifier to a set of declaration handles.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    items: IndexMap<String, SmallVec<[NodeId; 1]>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            items: IndexMap::new(),
        }
    }

    /// Registers a declaration under its local id.
    pub fn insert(&mut self, id: &Id, decl: NodeId) {
        let key = id.local().as_str().to_string();
        let entry = self.items.entry(key).or_default();
        if !entry.contains(&decl) {
            entry.push(decl);
        }
    }

    /// All declarations registered under a name.
    pub fn lookup_all(&self, name: &str) -> &[NodeId] {
        self.items.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterates over `(name, declarations)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NodeId])> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// A successful lookup.
#[derive(Clone, Debug)]
pub struct LookupResult {
    /// The declaration the id refers to.
    pub decl: NodeId,
    /// The canonical id of the declaration, if assigned; the input id
    /// otherwise.
    pub qualified: Id,
    /// True if the lookup crossed a module boundary.
    pub external: bool,
}

/// A failed lookup.
#[derive(Clone, Debug)]
pub struct LookupError {
    pub message: String,
    /// True if the id crosses an import edge that isn't resolved yet; the
    /// caller should retry in a later pass instead of reporting.
    pub pending: bool,
}

impl LookupError {
    fn new(message: impl Into<String>) -> Self {
        LookupError {
            message: message.into(),
            pending: false,
        }
    }

    fn pending(id: &Id) -> Self {
        LookupError {
            message: format!("import providing '{id}' has not been resolved yet"),
            pending: true,
        }
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Looks up an id from a node's position, following the scoping and
/// visibility rules. Expects the id to resolve to exactly one declaration
/// satisfying `expect`; `what` describes the expectation for error messages.
pub fn lookup_id(
    arena: &NodeArena,
    from: NodeId,
    id: &Id,
    what: &str,
    expect: impl Fn(&DeclData) -> bool,
) -> Result<LookupResult, LookupError> {
    if id.is_empty() {
        tern_common::internal_error!("lookup_id() called with empty ID");
    }

    let mut n = Some(from);

    while let Some(cur) = n {
        if arena.scope(cur).is_some() {
            match lookup_in_node(arena, cur, id, false) {
                Some(Ok(found)) => {
                    let Some(d) = decl::decl(arena, found.decl) else {
                        return Err(LookupError::new(format!(
                            "ID '{id}' does not resolve to a declaration"
                        )));
                    };
                    if !expect(d) {
                        return Err(LookupError::new(format!(
                            "ID '{id}' does not resolve to a {what} (but to a {})",
                            d.display_name()
                        )));
                    }
                    return Ok(found);
                }
                Some(Err(e)) => return Err(e),
                None => {}
            }
        }

        // If the node does not inherit its scope, skip everything up to the
        // enclosing module — except that the type payload of a type
        // declaration still gets the declaration's own scope checked in the
        // next round.
        let mut skip_to_module = false;

        match arena.kind(cur) {
            NodeKind::Type(_) if !arena.node(cur).inherit_scope => {
                let parent_is_type_decl = arena.parent(cur).and_then(|p| {
                    let qt_parent = arena.parent(p)?;
                    Some(
                        matches!(arena.kind(qt_parent), NodeKind::Decl(d) if matches!(d.kind, DeclKind::Type)),
                    )
                });
                if parent_is_type_decl != Some(true) {
                    skip_to_module = true;
                }
            }
            NodeKind::Decl(d) if matches!(d.kind, DeclKind::Type) => {
                let payload = arena
                    .child(cur, decl::TYPE_DECL_TYPE)
                    .and_then(|qt| crate::types::unqualified(arena, qt));
                if let Some(t) = payload {
                    if !arena.node(t).inherit_scope {
                        skip_to_module = true;
                    }
                }
            }
            _ => {}
        }

        if skip_to_module {
            let mut p = arena.parent(cur);
            while let Some(x) = p {
                if matches!(
                    arena.node(x).as_decl().map(|d| &d.kind),
                    Some(DeclKind::Module { .. })
                ) {
                    break;
                }
                p = arena.parent(x);
            }
            n = p;
        } else {
            n = arena.parent(cur);
        }
    }

    Err(LookupError::new(format!("unknown ID '{id}'")))
}

/// Collects all function candidates visible from a node under a callee name,
/// walking the whole scope chain. Reports whether each candidate was found
/// across a module boundary.
pub fn lookup_all_functions(
    arena: &NodeArena,
    from: NodeId,
    name: &Id,
) -> Vec<(NodeId, bool)> {
    let mut out = Vec::new();
    let key = name.local();
    let mut n = Some(from);

    while let Some(cur) = n {
        if let Some(scope) = arena.scope(cur) {
            for &d in scope.lookup_all(key.as_str()) {
                if !out.iter().any(|(x, _)| *x == d) {
                    out.push((d, false));
                }
            }
        }
        n = arena.parent(cur);
    }

    out
}

/// Resolves an id against one node's scope, descending through namespaces
/// for qualified ids. Returns `None` when the id is simply not found here.
fn lookup_in_node(
    arena: &NodeArena,
    scope_node: NodeId,
    id: &Id,
    external: bool,
) -> Option<Result<LookupResult, LookupError>> {
    let scope = arena.scope(scope_node)?;
    let first = id.first();
    let candidates = scope.lookup_all(first.as_str());

    if candidates.is_empty() {
        return None;
    }

    if !id.is_qualified() {
        if candidates.len() > 1 {
            // Multiple function declarations under one name are overloads;
            // call resolution disambiguates them. Anything else is an error.
            let all_functions = candidates.iter().all(|&c| {
                matches!(
                    decl::decl(arena, c).map(|d| &d.kind),
                    Some(DeclKind::Function)
                )
            });
            if !all_functions {
                return Some(Err(LookupError::new(format!("ID '{id}' is ambiguous"))));
            }
        }

        let found = candidates[0];
        let d = decl::decl(arena, found)?;

        if external && d.linkage != Linkage::Public {
            return Some(Err(LookupError::new(format!(
                "'{id}' has not been declared public"
            ))));
        }

        let qualified = d.canonical_id.clone().unwrap_or_else(|| id.clone());
        return Some(Ok(LookupResult {
            decl: found,
            qualified,
            external,
        }));
    }

    // Qualified: resolve the first component to a namespace-like
    // declaration, then descend with the remainder.
    let ns_decl = candidates[0];
    let rest = id.rest();
    let d = decl::decl(arena, ns_decl)?;

    match &d.kind {
        DeclKind::Module { .. } => {
            // Descending into a module we are not inside of makes the result
            // external.
            let crossing = !is_ancestor(arena, ns_decl, scope_node);
            lookup_in_node(arena, ns_decl, &rest, external || crossing)
        }

        DeclKind::ImportedModule { module_node, .. } => match module_node {
            Some(m) => lookup_in_node(arena, *m, &rest, true),
            // Import not resolved yet; a later resolver round will retry.
            None => Some(Err(LookupError::pending(id))),
        },

        DeclKind::Type => {
            // Type declarations expose their members (enum labels, statics)
            // through the declaration node's scope.
            lookup_in_node(arena, ns_decl, &rest, external)
        }

        _ => Some(Err(LookupError::new(format!(
            "ID '{first}' does not resolve to a namespace"
        )))),
    }
}

fn is_ancestor(arena: &NodeArena, ancestor: NodeId, mut node: NodeId) -> bool {
    loop {
        if node == ancestor {
            return true;
        }
        match arena.parent(node) {
            Some(p) => node = p,
            None => return false,
        }
    }
}

#[cfg(test)]
#[path = "tests/scope.rs"]
mod tests;
