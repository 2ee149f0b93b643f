//! Scope builder behavior: population, idempotence, and late insertions.

mod common;

use tern_ast::builder::Builder;
use tern_ast::decl::Linkage;
use tern_ast::decl::ParameterKind;
use tern_ast::traversal;
use tern_common::Id;
use tern_resolver::scope_builder;

/// Snapshot of every scope's contents, for comparing rebuilds.
fn snapshot(ctx: &tern_ast::AstContext) -> Vec<(u32, Vec<(String, usize)>)> {
    let mut out = Vec::new();
    for id in traversal::pre_order(&ctx.arena, ctx.root) {
        if let Some(scope) = ctx.arena.scope(id) {
            let entries: Vec<(String, usize)> = scope
                .iter()
                .map(|(k, v)| (k.to_string(), v.len()))
                .collect();
            out.push((id.0, entries));
        }
    }
    out
}

#[test]
fn module_declarations_are_visible() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let five = b.ctor_sint(5, 64);
    let five = b.expression_ctor(five);
    let konst = b.declaration_constant("x", None, five, Linkage::Private);
    common::add_decl(&mut ctx, m, konst);

    scope_builder::build_scopes(&mut ctx);

    let scope = ctx.arena.scope(m).unwrap();
    assert_eq!(scope.lookup_all("x"), &[konst]);

    // The module itself lands in the root scope.
    let root_scope = ctx.arena.scope(ctx.root).unwrap();
    assert_eq!(root_scope.lookup_all("M"), &[m]);
}

#[test]
fn function_parameters_are_in_function_scope() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let pt = b.type_sint(32);
    let pt = b.qualified_type(pt, true);
    let param = b.declaration_parameter("a", pt, ParameterKind::In, None);
    let result = b.type_void();
    let result = b.qualified_type(result, true);
    let ftype = b.type_function(result, vec![param]);
    let ftype = b.qualified_type(ftype, false);
    let body = b.statement_block(vec![]);
    let f = b.declaration_function("f", ftype, Some(body), Linkage::Private);
    common::add_decl(&mut ctx, m, f);

    scope_builder::build_scopes(&mut ctx);

    let scope = ctx.arena.scope(f).unwrap();
    assert_eq!(scope.lookup_all("a"), &[param]);
}

#[test]
fn blocks_with_declarations_introduce_scopes() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let one = b.ctor_sint(1, 64);
    let one = b.expression_ctor(one);
    let local = b.declaration_local_variable("v", None, Some(one));
    let decl_stmt = b.statement_declaration(local);
    let block = b.statement_block(vec![decl_stmt]);
    let result = b.type_void();
    let result = b.qualified_type(result, true);
    let ftype = b.type_function(result, vec![]);
    let ftype = b.qualified_type(ftype, false);
    let f = b.declaration_function("f", ftype, Some(block), Linkage::Private);
    common::add_decl(&mut ctx, m, f);

    scope_builder::build_scopes(&mut ctx);

    let scope = ctx.arena.scope(block).unwrap();
    assert_eq!(scope.lookup_all("v"), &[local]);
}

#[test]
fn rebuilding_scopes_is_idempotent() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let five = b.ctor_sint(5, 64);
    let five = b.expression_ctor(five);
    let konst = b.declaration_constant("x", None, five, Linkage::Private);
    common::add_decl(&mut ctx, m, konst);

    scope_builder::build_scopes(&mut ctx);
    let first = snapshot(&ctx);

    // Clear and rebuild, as the driver does each round.
    for id in traversal::pre_order(&ctx.arena, ctx.root) {
        ctx.arena.clear_scope(id);
    }
    scope_builder::build_scopes(&mut ctx);
    let second = snapshot(&ctx);

    assert_eq!(first, second);
}

#[test]
fn enum_labels_reach_module_scope_after_processing() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let e = b
        .type_enum(vec![(Id::new("Red"), None), (Id::new("Green"), None)])
        .unwrap();
    let e_qt = b.qualified_type(e, false);
    let tdecl = b.declaration_type("Color", e_qt, None, Linkage::Private);
    common::add_decl(&mut ctx, m, tdecl);

    let plugins = common::plugins();
    common::run(&mut ctx, &plugins).unwrap();

    let scope = ctx.arena.scope(m).unwrap();
    assert_eq!(scope.lookup_all("Red").len(), 1);
    assert_eq!(scope.lookup_all("Green").len(), 1);
    assert_eq!(scope.lookup_all("Undef").len(), 1);

    // Qualified access through the type declaration works as well.
    let tscope = ctx.arena.scope(tdecl).unwrap();
    assert_eq!(tscope.lookup_all("Red").len(), 1);
}

#[test]
fn for_loop_local_is_scoped_to_the_loop() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let local = b.declaration_local_variable("i", None, None);
    let one = b.ctor_sint(1, 64);
    let one = b.expression_ctor(one);
    let seq = b.ctor_list(vec![one]);
    let seq = b.expression_ctor(seq);
    let body = b.statement_block(vec![]);
    let for_stmt = b.statement_for(local, seq, body);
    let outer = b.statement_block(vec![for_stmt]);
    let result = b.type_void();
    let result = b.qualified_type(result, true);
    let ftype = b.type_function(result, vec![]);
    let ftype = b.qualified_type(ftype, false);
    let f = b.declaration_function("f", ftype, Some(outer), Linkage::Private);
    common::add_decl(&mut ctx, m, f);

    scope_builder::build_scopes(&mut ctx);

    let scope = ctx.arena.scope(for_stmt).unwrap();
    assert_eq!(scope.lookup_all("i"), &[local]);
    assert!(ctx.arena.scope(outer).is_none());
}
