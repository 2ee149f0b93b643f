//! The scope builder.
//!
//! Attaches local scopes to scope-introducing nodes and populates them with
//! the declarations each node makes visible. The pass is idempotent: the
//! pipeline clears existing scopes before a rebuild, and insertion
//! de-duplicates.

use tern_ast::arena::NodeId;
use tern_ast::builder::Builder;
use tern_ast::context::AstContext;
use tern_ast::decl::{self, DeclKind, Linkage};
use tern_ast::expr::{self, Keyword};
use tern_ast::node::NodeKind;
use tern_ast::stmt::{self, StmtKind};
use tern_ast::types::{self, TypeKind};
use tern_ast::{attribute, scope, traversal};
use tern_common::Id;

/// Builds all scopes under the AST root. Never reports modification: scope
/// contents are derived state.
pub fn build_scopes(ctx: &mut AstContext) -> bool {
    for id in traversal::post_order(&ctx.arena, ctx.root) {
        let kind = ctx.arena.node(id).kind.clone();
        match &kind {
            NodeKind::Decl(d) => match &d.kind {
                DeclKind::Module { .. } => build_module(ctx, id),
                DeclKind::Function => build_function(ctx, id),
                DeclKind::Type => build_type_decl(ctx, id),
                _ => {}
            },

            NodeKind::Type(t) => match &t.kind {
                TypeKind::Struct { .. } | TypeKind::Union => build_record(ctx, id),
                _ => {}
            },

            NodeKind::Stmt(s) => match &s.kind {
                StmtKind::Declaration => {
                    // A block containing a declaration statement introduces a
                    // scope holding it.
                    if let (Some(parent), Some(d)) =
                        (ctx.arena.parent(id), ctx.arena.child(id, 0))
                    {
                        insert(ctx, parent, d);
                    }
                }
                StmtKind::For => {
                    if let Some(local) = ctx.arena.child(id, stmt::FOR_LOCAL) {
                        insert(ctx, id, local);
                    }
                }
                StmtKind::If => {
                    if let Some(init) = ctx.arena.child(id, stmt::IF_INIT) {
                        insert(ctx, id, init);
                    }
                }
                StmtKind::While => {
                    if let Some(init) = ctx.arena.child(id, stmt::WHILE_INIT) {
                        insert(ctx, id, init);
                    }
                }
                StmtKind::Switch => {
                    if let Some(cond) = ctx.arena.child(id, stmt::SWITCH_CONDITION) {
                        insert(ctx, id, cond);
                    }
                }
                StmtKind::Catch => {
                    if let Some(param) = ctx.arena.child(id, stmt::CATCH_PARAMETER) {
                        insert(ctx, id, param);
                    }
                }
                _ => {}
            },

            NodeKind::Expr(e) => {
                if matches!(e.kind, expr::ExprKind::ListComprehension) {
                    if let Some(local) = ctx.arena.child(id, expr::COMPREHENSION_LOCAL) {
                        insert(ctx, id, local);
                    }
                }
            }

            _ => {}
        }
    }

    false
}

fn insert(ctx: &mut AstContext, scope_node: NodeId, decl_node: NodeId) {
    let Some(id) = decl::decl(&ctx.arena, decl_node).map(|d| d.id.clone()) else {
        return;
    };
    ctx.arena
        .get_or_create_scope(scope_node)
        .insert(&id, decl_node);
}

fn build_module(ctx: &mut AstContext, module: NodeId) {
    // The module itself goes into the global scope for cross-module lookup.
    let root = ctx.root;
    insert(ctx, root, module);

    for d in decl::module_declarations(&ctx.arena, module) {
        insert(ctx, module, d);
    }
}

fn build_function(ctx: &mut AstContext, func: NodeId) {
    let params = ctx
        .arena
        .child(func, decl::FUNCTION_TYPE)
        .and_then(|qt| types::unqualified(&ctx.arena, qt))
        .map(|ft| types::function_parameters(&ctx.arena, ft))
        .unwrap_or_default();

    for p in params {
        insert(ctx, func, p);
    }

    // Methods see `self` and their record's type parameters.
    let (linkage, id) = match decl::decl(&ctx.arena, func) {
        Some(d) => (d.linkage, d.id.clone()),
        None => return,
    };

    if linkage == Linkage::Struct && id.is_qualified() {
        let ns = id.namespace();
        if let Ok(found) = scope::lookup_id(&ctx.arena, func, &ns, "type", |d| {
            matches!(d.kind, DeclKind::Type)
        }) {
            let payload = ctx
                .arena
                .child(found.decl, decl::TYPE_DECL_TYPE)
                .and_then(|qt| types::unqualified(&ctx.arena, qt));

            if let Some(struct_ty) = payload {
                if matches!(
                    types::type_data(&ctx.arena, struct_ty).map(|d| &d.kind),
                    Some(TypeKind::Struct { .. })
                ) {
                    let self_decl = make_self(ctx, found.decl, ns);
                    ctx.arena
                        .get_or_create_scope(func)
                        .insert(&Id::new("self"), self_decl);

                    for p in type_parameters(ctx, struct_ty) {
                        insert(ctx, func, p);
                    }
                }
            }
        }
    }
}

fn build_record(ctx: &mut AstContext, record: NodeId) {
    // Only named records get a `self`: it needs the type declaration to
    // refer back to.
    let type_decl = ctx
        .arena
        .parent(record)
        .and_then(|qt| ctx.arena.parent(qt))
        .filter(|&d| {
            matches!(
                decl::decl(&ctx.arena, d).map(|x| &x.kind),
                Some(DeclKind::Type)
            )
        });

    if let Some(td) = type_decl {
        let is_struct = matches!(
            types::type_data(&ctx.arena, record).map(|d| &d.kind),
            Some(TypeKind::Struct { .. })
        );
        if is_struct {
            let ns = decl::decl(&ctx.arena, td)
                .map(|d| d.id.clone())
                .unwrap_or_default();
            let self_decl = make_self(ctx, td, ns);
            ctx.arena
                .get_or_create_scope(record)
                .insert(&Id::new("self"), self_decl);
        }
    }

    for p in type_parameters(ctx, record) {
        insert(ctx, record, p);
    }

    // Static members are mirrored one level above, into the declaration's
    // scope.
    if let Some(td) = type_decl {
        for f in types::record_fields(&ctx.arena, record, None) {
            let attrs = ctx.arena.child(f, decl::FIELD_ATTRIBUTES);
            if attribute::find_on(&ctx.arena, attrs, attribute::STATIC).is_some() {
                insert(ctx, td, f);
            }
        }
    }
}

fn build_type_decl(ctx: &mut AstContext, tdecl: NodeId) {
    let payload = ctx
        .arena
        .child(tdecl, decl::TYPE_DECL_TYPE)
        .and_then(|qt| types::unqualified(&ctx.arena, qt));
    let Some(ty) = payload else {
        return;
    };

    let data = match types::type_data(&ctx.arena, ty) {
        Some(d) => d,
        None => return,
    };

    // Enum labels become constants in the enclosing module scope, plus the
    // declaration's own scope for qualified access. This waits for the
    // resolver to have assigned a type ID to the enum.
    if matches!(data.kind, TypeKind::Enum { .. }) && data.type_id.is_some() {
        let labels: Vec<NodeId> =
            ctx.arena.children(ty).iter().copied().flatten().collect();
        let module = decl::enclosing_module(&ctx.arena, tdecl);

        for label in labels {
            insert(ctx, tdecl, label);
            if let Some(m) = module {
                insert(ctx, m, label);
            }
        }
    }
}

/// A `self` alias: an expression declaration holding a `self` keyword typed
/// as a value reference to the declared type.
fn make_self(ctx: &mut AstContext, type_decl: NodeId, ns: Id) -> NodeId {
    let mut b = Builder::new(ctx);
    let name_ty = b.type_name(ns);
    let name_qt = b.qualified_type(name_ty, false);
    let ref_ty = b.type_value_ref(name_qt);
    let ref_qt = b.qualified_type(ref_ty, false);
    let kw = b.expression_keyword(Keyword::Self_);
    b.arena_mut().set_child(kw, 0, Some(ref_qt));
    let d = b.declaration_expression("self", kw);

    // Point the name at its declaration right away; it is already known.
    if let Some(t) = ctx.arena.node_mut(name_ty).as_type_mut() {
        if let TypeKind::Name { decl, .. } = &mut t.kind {
            *decl = Some(type_decl);
        }
    }

    d
}

fn type_parameters(ctx: &AstContext, record: NodeId) -> Vec<NodeId> {
    ctx.arena
        .children(record)
        .iter()
        .copied()
        .flatten()
        .filter(|&c| {
            matches!(
                decl::decl(&ctx.arena, c).map(|d| &d.kind),
                Some(DeclKind::Parameter {
                    is_type_param: true,
                    ..
                })
            )
        })
        .collect()
}
