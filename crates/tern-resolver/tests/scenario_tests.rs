//! End-to-end resolution scenarios over programmatically built modules.

mod common;

use tern_ast::builder::Builder;
use tern_ast::ctor::{self, CtorKind};
use tern_ast::decl::{self, Linkage, ParameterKind};
use tern_ast::expr::{self, ExprKind};
use tern_ast::operator::Kind;
use tern_ast::types::{self, TypeKind};
use tern_common::Id;
use tern_resolver::coercion::{self, CoercionStyle};

/// `module M { const x: int<32> = 5; }`: the literal narrows to the declared
/// type.
#[test]
fn constant_with_declared_type_narrows_its_literal() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let t = b.type_sint(32);
    let t = b.qualified_type(t, true);
    let five = b.ctor_sint(5, 64);
    let five = b.expression_ctor(five);
    let x = b.declaration_constant("x", Some(t), five, Linkage::Private);
    common::add_decl(&mut ctx, m, x);

    let plugins = common::plugins();
    common::run(&mut ctx, &plugins).unwrap();

    let value = ctx.arena.child(x, decl::CONSTANT_VALUE).unwrap();
    assert_ne!(value, five, "literal must have been rewritten");
    assert_eq!(common::sint_width_of(&ctx, value), Some(32));

    let d = decl::decl(&ctx.arena, x).unwrap();
    assert_eq!(d.linkage, Linkage::Private);
    assert!(decl::decl_is_constant(&ctx.arena, x));
}

/// `module M { function f(auto a) { return a + 1; } global g = f(7); }`:
/// the parameter and result types are inferred from the call site.
#[test]
fn auto_parameter_and_result_infer_from_call_site() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);

    let pt = b.qualified_type_auto();
    let param = b.declaration_parameter("a", pt, ParameterKind::In, None);
    let rt = b.qualified_type_auto();

    let a_ref = b.expression_name("a");
    let one = b.ctor_sint(1, 64);
    let one = b.expression_ctor(one);
    let sum = b.expression_unresolved_operator(Kind::Sum, vec![a_ref, one]);
    let ret = b.statement_return(Some(sum));
    let body = b.statement_block(vec![ret]);

    let ftype = b.type_function(rt, vec![param]);
    let ftype = b.qualified_type(ftype, false);
    let f = b.declaration_function("f", ftype, Some(body), Linkage::Private);
    b.arena_mut().add_child(m, f);

    let callee = b.expression_name("f");
    let seven = b.ctor_sint(7, 64);
    let seven = b.expression_ctor(seven);
    let args = b.ctor_tuple(vec![seven]);
    let args = b.expression_ctor(args);
    let call = b.expression_unresolved_operator(Kind::Call, vec![callee, args]);
    let g = b.declaration_global_variable("g", None, Some(call), Linkage::Private);
    common::add_decl(&mut ctx, m, g);

    let plugins = common::plugins();
    common::run(&mut ctx, &plugins).unwrap();

    // The parameter adopted the argument's type.
    let param_ty = decl::decl_type(&ctx.arena, param).unwrap();
    assert!(!types::is_auto(&ctx.arena, param_ty));
    let pt = types::unqualified(&ctx.arena, param_ty).unwrap();
    assert!(matches!(
        types::type_data(&ctx.arena, pt).unwrap().kind,
        TypeKind::SignedInteger { width: 64 }
    ));

    // The call was rewritten, and g has f's inferred result type.
    let init = ctx.arena.child(g, decl::VARIABLE_INIT).unwrap();
    assert!(matches!(
        expr::expr(&ctx.arena, init).map(|e| &e.kind),
        Some(ExprKind::ResolvedOperator { kind: Kind::Call, .. })
    ));
    assert_eq!(common::sint_width_of(&ctx, init), Some(64));
}

/// `type T = struct { field x: int<32>; }; global t: T = [$x=1];`: the
/// struct literal coerces to the named record type.
#[test]
fn struct_literal_coerces_to_named_record() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);

    let ft = b.type_sint(32);
    let ft = b.qualified_type(ft, false);
    let field = b.declaration_field("x", ft, None, None, None);
    let s = b.type_struct(vec![field]);
    let s_qt = b.qualified_type(s, false);
    let tdecl = b.declaration_type("T", s_qt, None, Linkage::Private);
    b.arena_mut().add_child(m, tdecl);

    let one = b.ctor_sint(1, 32);
    let one = b.expression_ctor(one);
    let lit = b.ctor_struct(vec![(Id::new("x"), one)]);
    let lit = b.expression_ctor(lit);
    let t_name = b.type_name("T");
    let t_name = b.qualified_type(t_name, false);
    let t = b.declaration_global_variable("t", Some(t_name), Some(lit), Linkage::Private);
    common::add_decl(&mut ctx, m, t);

    let plugins = common::plugins();
    common::run(&mut ctx, &plugins).unwrap();

    // `[$x=1]` alone is accepted because T has only that one field, and the
    // initializer now carries T's identity.
    let init = ctx.arena.child(t, decl::VARIABLE_INIT).unwrap();
    let qt = expr::expr_type(&ctx.arena, init).unwrap();
    let ty = types::unqualified(&ctx.arena, qt).unwrap();
    let ty = types::strip_names(&ctx.arena, ty);
    let data = types::type_data(&ctx.arena, ty).unwrap();
    assert!(matches!(data.kind, TypeKind::Struct { .. }));
    assert!(
        data.type_id.as_ref().is_some_and(|i| i.as_str().ends_with("::T")),
        "{:?}",
        data.type_id
    );
}

/// A struct literal missing a non-omissible field is rejected.
#[test]
fn struct_literal_missing_required_field_fails() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);

    let ft1 = b.type_sint(32);
    let ft1 = b.qualified_type(ft1, false);
    let f1 = b.declaration_field("x", ft1, None, None, None);
    let ft2 = b.type_sint(32);
    let ft2 = b.qualified_type(ft2, false);
    let f2 = b.declaration_field("y", ft2, None, None, None);
    let s = b.type_struct(vec![f1, f2]);
    let s_qt = b.qualified_type(s, false);
    let tdecl = b.declaration_type("T", s_qt, None, Linkage::Private);
    b.arena_mut().add_child(m, tdecl);

    let one = b.ctor_sint(1, 32);
    let one = b.expression_ctor(one);
    let lit = b.ctor_struct(vec![(Id::new("x"), one)]);
    let lit = b.expression_ctor(lit);
    let t_name = b.type_name("T");
    let t_name = b.qualified_type(t_name, false);
    let t = b.declaration_global_variable("t", Some(t_name), Some(lit), Linkage::Private);
    common::add_decl(&mut ctx, m, t);

    let plugins = common::plugins();
    let errors = common::run(&mut ctx, &plugins).unwrap_err();

    assert!(errors.iter().any(|e| e.message.contains("cannot coerce")));
}

/// An omitted field with `&optional` is fine.
#[test]
fn struct_literal_may_omit_optional_fields() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);

    let ft1 = b.type_sint(32);
    let ft1 = b.qualified_type(ft1, false);
    let f1 = b.declaration_field("x", ft1, None, None, None);

    let optional = b.attribute(tern_ast::attribute::OPTIONAL, None);
    let attrs = b.attribute_set(vec![optional]);
    let ft2 = b.type_sint(32);
    let ft2 = b.qualified_type(ft2, false);
    let f2 = b.declaration_field("y", ft2, Some(attrs), None, None);

    let s = b.type_struct(vec![f1, f2]);
    let s_qt = b.qualified_type(s, false);
    let tdecl = b.declaration_type("T", s_qt, None, Linkage::Private);
    b.arena_mut().add_child(m, tdecl);

    let one = b.ctor_sint(1, 32);
    let one = b.expression_ctor(one);
    let lit = b.ctor_struct(vec![(Id::new("x"), one)]);
    let lit = b.expression_ctor(lit);
    let t_name = b.type_name("T");
    let t_name = b.qualified_type(t_name, false);
    let t = b.declaration_global_variable("t", Some(t_name), Some(lit), Linkage::Private);
    common::add_decl(&mut ctx, m, t);

    let plugins = common::plugins();
    common::run(&mut ctx, &plugins).unwrap();
}

/// `global a: optional<int<32>> = 5;`: assignment wraps the literal into a
/// coercion expression.
#[test]
fn optional_destination_wraps_the_literal() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let inner = b.type_sint(32);
    let inner = b.qualified_type(inner, true);
    let opt = b.type_optional(inner);
    let opt = b.qualified_type(opt, false);
    let five = b.ctor_sint(5, 64);
    let five = b.expression_ctor(five);
    let a = b.declaration_global_variable("a", Some(opt), Some(five), Linkage::Private);
    common::add_decl(&mut ctx, m, a);

    let plugins = common::plugins();
    common::run(&mut ctx, &plugins).unwrap();

    let init = ctx.arena.child(a, decl::VARIABLE_INIT).unwrap();
    assert!(matches!(
        expr::expr(&ctx.arena, init).map(|e| &e.kind),
        Some(ExprKind::Coerced)
    ));
    assert_eq!(common::type_variant_of(&ctx, init), Some("optional"));
}

/// `type E = enum { A, B }; global b: bool = A;`: without contextual
/// conversion the coercion is refused; with it, `A` converts to true.
#[test]
fn enum_to_bool_requires_contextual_conversion() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let e = b
        .type_enum(vec![(Id::new("A"), None), (Id::new("B"), None)])
        .unwrap();
    let e_qt = b.qualified_type(e, false);
    let tdecl = b.declaration_type("E", e_qt, None, Linkage::Private);
    b.arena_mut().add_child(m, tdecl);

    let bool_t = b.type_bool();
    let bool_t = b.qualified_type(bool_t, true);
    let a_ref = b.expression_name("A");
    let bdecl =
        b.declaration_global_variable("b", Some(bool_t), Some(a_ref), Linkage::Private);
    common::add_decl(&mut ctx, m, bdecl);

    let plugins = common::plugins();
    let errors = common::run(&mut ctx, &plugins).unwrap_err();
    assert!(errors.iter().any(|e| e.message.contains("cannot coerce")));
}

#[test]
fn enum_label_converts_contextually() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);
    let e = b
        .type_enum(vec![(Id::new("A"), None), (Id::new("B"), None)])
        .unwrap();
    let e_qt = b.qualified_type(e, false);
    let tdecl = b.declaration_type("E", e_qt, None, Linkage::Private);
    common::add_decl(&mut ctx, m, tdecl);

    let plugins = common::plugins();
    common::run(&mut ctx, &plugins).unwrap();

    // Fetch the label A's ctor and coerce it contextually.
    let enum_ty = ctx
        .arena
        .child(tdecl, decl::TYPE_DECL_TYPE)
        .and_then(|qt| types::unqualified(&ctx.arena, qt))
        .unwrap();
    let label_a = ctx.arena.children(enum_ty)[0].unwrap();
    let a_value = ctx.arena.child(label_a, decl::CONSTANT_VALUE).unwrap();
    let a_ctor = ctx.arena.child(a_value, 0).unwrap();

    let mut b = Builder::new(&mut ctx);
    let bool_t = b.type_bool();
    let dst = b.qualified_type(bool_t, true);

    // Without the flag: refused.
    assert!(
        coercion::coerce_ctor(&mut b, a_ctor, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT)
            .is_none()
    );

    // With it: `A != Undef`, so the result is true.
    let nc = coercion::coerce_ctor(
        &mut b,
        a_ctor,
        dst,
        CoercionStyle::TRY_ALL_FOR_ASSIGNMENT | CoercionStyle::CONTEXTUAL_CONVERSION,
    )
    .unwrap();
    assert!(matches!(
        ctor::ctor(b.arena(), nc).map(|c| &c.kind),
        Some(CtorKind::Bool { value: true })
    ));
}

/// No parameter keeps `auto` once a call site provided a resolved argument.
/// A second call site conflicting with the recorded inference ends up
/// unmatched once the parameter's type is fixed.
#[test]
fn inconsistent_auto_inference_leaves_conflicting_call_unmatched() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");

    let mut b = Builder::new(&mut ctx);

    let pt = b.qualified_type_auto();
    let param = b.declaration_parameter("a", pt, ParameterKind::In, None);
    let rt = b.type_void();
    let rt = b.qualified_type(rt, true);
    let ftype = b.type_function(rt, vec![param]);
    let ftype = b.qualified_type(ftype, false);
    let body = b.statement_block(vec![]);
    let f = b.declaration_function("f", ftype, Some(body), Linkage::Private);
    b.arena_mut().add_child(m, f);

    // Two call sites with conflicting argument types.
    for value in [0_i64, 1] {
        let callee = b.expression_name("f");
        let arg = if value == 0 {
            let c = b.ctor_sint(7, 64);
            b.expression_ctor(c)
        } else {
            let c = b.ctor_string("s");
            b.expression_ctor(c)
        };
        let args = b.ctor_tuple(vec![arg]);
        let args = b.expression_ctor(args);
        let call = b.expression_unresolved_operator(Kind::Call, vec![callee, args]);
        let name = if value == 0 { "g0" } else { "g1" };
        let g = b.declaration_global_variable(name, None, Some(call), Linkage::Private);
        b.arena_mut().add_child(m, g);
    }

    let plugins = common::plugins();
    let errors = common::run(&mut ctx, &plugins).unwrap_err();

    assert!(
        errors
            .iter()
            .any(|e| e.message.contains("no matching operator found")),
        "{errors:?}"
    );

    // The first call site's inference stuck.
    let param_ty = decl::decl_type(&ctx.arena, param).unwrap();
    assert!(!types::is_auto(&ctx.arena, param_ty));
}
