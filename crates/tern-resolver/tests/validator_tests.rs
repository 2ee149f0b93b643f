//! Validator behavior: structural checks, priority tiers, de-duplication.

mod common;

use tern_ast::builder::Builder;
use tern_ast::decl::Linkage;
use tern_common::{ErrorPriority, Location, Span};
use tern_resolver::validator;

#[test]
fn highest_priority_tier_wins() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let a = b.expression_name("a");
    let c = b.ctor_bool(true);
    let c = b.expression_ctor(c);
    let d1 = b.declaration_expression("e1", a);
    let d2 = b.declaration_expression("e2", c);
    common::add_decl(&mut ctx, m, d1);
    common::add_decl(&mut ctx, m, d2);

    ctx.arena.add_error_prio(d1, "low issue", ErrorPriority::Low);
    ctx.arena
        .add_error_prio(d2, "normal issue", ErrorPriority::Normal);
    ctx.arena.add_error_prio(a, "high issue", ErrorPriority::High);

    let reported = validator::report(&ctx).unwrap_err();

    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].message, "high issue");
    assert_eq!(reported[0].priority, ErrorPriority::High);
}

#[test]
fn duplicate_errors_are_reported_once() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let a = b.expression_name("a");
    let c = b.expression_name("b");
    let d1 = b.declaration_expression("e1", a);
    let d2 = b.declaration_expression("e2", c);
    common::add_decl(&mut ctx, m, d1);
    common::add_decl(&mut ctx, m, d2);

    let loc = Location::new("m.tn", Span::new(1, 2));
    ctx.arena.add_error_with(
        a,
        "same problem",
        loc.clone(),
        ErrorPriority::Normal,
        vec![],
    );
    ctx.arena
        .add_error_with(c, "same problem", loc, ErrorPriority::Normal, vec![]);

    let reported = validator::report(&ctx).unwrap_err();
    assert_eq!(reported.len(), 1);
}

#[test]
fn child_errors_suppress_parent_cascades() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let a = b.expression_name("a");
    let d = b.declaration_expression("e", a);
    common::add_decl(&mut ctx, m, d);

    // The child carries the cause; the parent repeats it at the same
    // priority and must stay silent.
    ctx.arena
        .add_error_prio(a, "the cause", ErrorPriority::Normal);
    ctx.arena
        .add_error_prio(d, "follow-on noise", ErrorPriority::Normal);

    let reported = validator::report(&ctx).unwrap_err();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].message, "the cause");
}

#[test]
fn errors_inherit_the_closest_location() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");
    ctx.arena.node_mut(m).meta.location = Location::new("m.tn", Span::new(10, 20));

    let mut b = Builder::new(&mut ctx);
    let a = b.expression_name("a");
    let d = b.declaration_expression("e", a);
    common::add_decl(&mut ctx, m, d);

    // No location of its own; the module's should be inherited.
    ctx.arena.node_mut(a).meta.location = Location::default();
    ctx.arena.node_mut(d).meta.location = Location::default();
    ctx.arena.node_mut(a).errors.push(
        tern_common::AstError::new("problem").with_priority(ErrorPriority::Normal),
    );

    let reported = validator::report(&ctx).unwrap_err();
    assert_eq!(reported[0].location, Location::new("m.tn", Span::new(10, 20)));
}

#[test]
fn prune_walk_hides_subtree_errors() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let a = b.expression_name("a");
    let d = b.declaration_expression("e", a);
    common::add_decl(&mut ctx, m, d);

    ctx.arena.add_error_prio(a, "hidden", ErrorPriority::High);
    ctx.arena.node_mut(d).prune_walk = true;

    assert!(validator::report(&ctx).is_ok());
}

#[test]
fn pre_validation_checks_init_child_kinds() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    // An `if` whose init slot holds a constant instead of a local variable.
    let one = b.ctor_sint(1, 64);
    let one = b.expression_ctor(one);
    let bad_init = b.declaration_constant("c", None, one, Linkage::Private);
    let cond = b.ctor_bool(true);
    let cond = b.expression_ctor(cond);
    let body = b.statement_block(vec![]);
    let if_stmt = b.statement_if(Some(bad_init), cond, body, None);
    let outer = b.statement_block(vec![if_stmt]);
    let rt = b.type_void();
    let rt = b.qualified_type(rt, true);
    let ftype = b.type_function(rt, vec![]);
    let ftype = b.qualified_type(ftype, false);
    let f = b.declaration_function("f", ftype, Some(outer), Linkage::Private);
    common::add_decl(&mut ctx, m, f);

    validator::validate_pre(&mut ctx);
    let reported = validator::report(&ctx).unwrap_err();

    assert!(reported.iter().any(|e| {
        e.priority == ErrorPriority::High && e.message.contains("'if' init")
    }));
}

#[test]
fn struct_linkage_functions_need_a_namespace() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let rt = b.type_void();
    let rt = b.qualified_type(rt, true);
    let ftype = b.type_function(rt, vec![]);
    let ftype = b.qualified_type(ftype, false);
    let f = b.declaration_function("method", ftype, None, Linkage::Struct);
    common::add_decl(&mut ctx, m, f);

    validator::validate_pre(&mut ctx);
    let reported = validator::report(&ctx).unwrap_err();

    assert!(reported
        .iter()
        .any(|e| e.message.contains("method lacks a type namespace")));
}

#[test]
fn post_validation_flags_leftover_unresolved_nodes() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let unknown = b.expression_name("no_such_thing");
    let d = b.declaration_expression("e", unknown);
    common::add_decl(&mut ctx, m, d);

    let plugins = common::plugins();
    let errors = common::run(&mut ctx, &plugins).unwrap_err();

    // The resolver's concrete diagnosis wins over the generic completeness
    // error.
    assert!(errors
        .iter()
        .any(|e| e.message.contains("unknown ID 'no_such_thing'")));
    assert!(errors.iter().all(|e| e.priority == ErrorPriority::High));
}
