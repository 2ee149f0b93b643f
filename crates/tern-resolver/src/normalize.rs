//! The normalizer.
//!
//! Two jobs ahead of resolution proper:
//! - Assign canonical IDs: globally unique, stable textual names for every
//!   declaration, used to key side tables.
//! - Infer `Struct` linkage for functions whose namespaced id refers to a
//!   record type.

use rustc_hash::FxHashMap;
use tern_ast::arena::NodeId;
use tern_ast::context::AstContext;
use tern_ast::decl::{self, DeclKind, Linkage};
use tern_ast::node::NodeKind;
use tern_ast::types::{self, TypeKind};
use tern_ast::{scope, traversal};
use tern_common::Id;
use tracing::debug;

pub fn normalize(ctx: &mut AstContext) -> bool {
    let mut modified = false;
    modified |= assign_canonical_ids(ctx);
    modified |= infer_struct_linkage(ctx);
    modified
}

/// Walks every declaration and derives its canonical ID from the enclosing
/// declaration chain, rooted in the module's UID text. Duplicate locals get
/// a numeric suffix so the IDs stay unique.
fn assign_canonical_ids(ctx: &mut AstContext) -> bool {
    let mut modified = false;
    let mut seen: FxHashMap<Id, u32> = FxHashMap::default();

    for id in traversal::pre_order(&ctx.arena, ctx.root) {
        let Some(d) = ctx.arena.node(id).as_decl() else {
            continue;
        };
        if d.canonical_id.is_some() {
            continue;
        }

        let canonical = match &d.kind {
            DeclKind::Module { uid, .. } => Id::new(uid.text()),
            _ => {
                let local = d.id.local();
                let parent_canonical = enclosing_canonical(ctx, id);
                let base = parent_canonical.join(&local);
                let n = seen.entry(base.clone()).or_insert(0);
                *n += 1;
                if *n == 1 {
                    base
                } else {
                    Id::new(format!("{base}_{n}"))
                }
            }
        };

        debug!(target: "ast-declarations", "canonical ID {canonical} -> {id}");
        if let Some(d) = ctx.arena.node_mut(id).as_decl_mut() {
            d.canonical_id = Some(canonical);
        }
        modified = true;
    }

    modified
}

fn enclosing_canonical(ctx: &AstContext, id: NodeId) -> Id {
    let mut n = ctx.arena.parent(id);
    while let Some(cur) = n {
        if let Some(d) = ctx.arena.node(cur).as_decl() {
            if let Some(c) = &d.canonical_id {
                return c.clone();
            }
        }
        n = ctx.arena.parent(cur);
    }
    Id::default()
}

/// A function declared as `T::f` whose namespace names a record type is a
/// method; rewrite its linkage so later passes link it to the type.
fn infer_struct_linkage(ctx: &mut AstContext) -> bool {
    let mut modified = false;

    for id in traversal::post_order(&ctx.arena, ctx.root) {
        let is_candidate = match ctx.arena.node(id).kind {
            NodeKind::Decl(ref d) => {
                matches!(d.kind, DeclKind::Function)
                    && d.linkage != Linkage::Struct
                    && d.id.is_qualified()
            }
            _ => false,
        };
        if !is_candidate {
            continue;
        }

        let ns = match decl::decl(&ctx.arena, id) {
            Some(d) => d.id.namespace(),
            None => continue,
        };

        let Ok(found) = scope::lookup_id(&ctx.arena, id, &ns, "type", |d| {
            matches!(d.kind, DeclKind::Type)
        }) else {
            continue;
        };

        let is_struct = ctx
            .arena
            .child(found.decl, decl::TYPE_DECL_TYPE)
            .and_then(|qt| types::unqualified(&ctx.arena, qt))
            .and_then(|t| types::type_data(&ctx.arena, t))
            .is_some_and(|d| matches!(d.kind, TypeKind::Struct { .. }));

        if is_struct {
            debug!(target: "resolver", "setting linkage of {id} to 'struct'");
            if let Some(d) = ctx.arena.node_mut(id).as_decl_mut() {
                d.linkage = Linkage::Struct;
            }
            modified = true;
        }
    }

    modified
}
