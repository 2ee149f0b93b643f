use tern_ast::arena::NodeId;
use tern_ast::builder::Builder;
use tern_ast::context::{AstContext, CompilerOptions};
use tern_ast::{expr, types};

use super::*;

fn ctx() -> AstContext {
    AstContext::new(CompilerOptions::default())
}

fn sint_qt(b: &mut Builder<'_>, width: u32, is_const: bool) -> NodeId {
    let t = b.type_sint(width);
    b.qualified_type(t, is_const)
}

fn uint_qt(b: &mut Builder<'_>, width: u32, is_const: bool) -> NodeId {
    let t = b.type_uint(width);
    b.qualified_type(t, is_const)
}

#[test]
fn identical_types_always_coerce() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);
    let a = sint_qt(&mut b, 32, true);
    let c = sint_qt(&mut b, 32, true);

    assert!(coerce_type(&mut b, a, c, CoercionStyle::TRY_EXACT_MATCH).is_some());
}

#[test]
fn integer_widening_only() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);
    let style = CoercionStyle::TRY_ALL_FOR_ASSIGNMENT;

    let i16_ = sint_qt(&mut b, 16, true);
    let i32_ = sint_qt(&mut b, 32, true);
    let i64_ = sint_qt(&mut b, 64, true);

    assert!(coerce_type(&mut b, i16_, i32_, style).is_some());
    assert!(coerce_type(&mut b, i32_, i64_, style).is_some());
    assert!(coerce_type(&mut b, i64_, i32_, style).is_none());
}

#[test]
fn unsigned_into_wider_signed_only() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);
    let style = CoercionStyle::TRY_ALL_FOR_ASSIGNMENT;

    let u16_ = uint_qt(&mut b, 16, true);
    let u32_ = uint_qt(&mut b, 32, true);
    let i32_ = sint_qt(&mut b, 32, true);

    assert!(coerce_type(&mut b, u16_, i32_, style).is_some());
    assert!(coerce_type(&mut b, u32_, i32_, style).is_none());
}

#[test]
fn coercion_transitivity_over_assignment_rules() {
    // For the declared chains int<16> -> int<32> -> int<64> and
    // bytes -> stream, src->mid and mid->dst imply src->dst.
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);
    let style = CoercionStyle::TRY_ALL_FOR_ASSIGNMENT;

    let i16_ = sint_qt(&mut b, 16, true);
    let i32_ = sint_qt(&mut b, 32, true);
    let i64_ = sint_qt(&mut b, 64, true);

    assert!(coerce_type(&mut b, i16_, i32_, style).is_some());
    assert!(coerce_type(&mut b, i32_, i64_, style).is_some());
    assert!(coerce_type(&mut b, i16_, i64_, style).is_some());
}

#[test]
fn bytes_stream_requires_assignment_or_call() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let bytes_t = b.type_bytes();
    let bytes = b.qualified_type(bytes_t, true);
    let stream_t = b.type_stream();
    let stream = b.qualified_type(stream_t, true);

    assert!(
        coerce_type(&mut b, bytes, stream, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).is_some()
    );
    assert!(
        coerce_type(&mut b, bytes, stream, CoercionStyle::TRY_ALL_FOR_MATCHING).is_none()
    );
}

#[test]
fn null_coerces_into_optional_and_references() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);
    let style = CoercionStyle::TRY_ALL_FOR_ASSIGNMENT;

    let null_t = b.type_null();
    let null = b.qualified_type(null_t, true);

    let inner = sint_qt(&mut b, 32, true);
    let opt_t = b.type_optional(inner);
    let opt = b.qualified_type(opt_t, false);

    let inner2 = sint_qt(&mut b, 32, true);
    let sref_t = b.type_strong_ref(inner2);
    let sref = b.qualified_type(sref_t, false);

    assert!(coerce_type(&mut b, null, opt, style).is_some());
    assert!(coerce_type(&mut b, null, sref, style).is_some());
}

#[test]
fn error_coerces_into_result() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let err_t = b.type_error();
    let err = b.qualified_type(err_t, true);
    let inner = sint_qt(&mut b, 32, true);
    let res_t = b.type_result(inner);
    let res = b.qualified_type(res_t, false);

    assert!(coerce_type(&mut b, err, res, CoercionStyle::TRY_EXACT_MATCH).is_some());
}

#[test]
fn anything_wraps_into_optional_under_assignment() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let src = sint_qt(&mut b, 32, true);
    let inner = sint_qt(&mut b, 32, true);
    let opt_t = b.type_optional(inner);
    let opt = b.qualified_type(opt_t, false);

    let out =
        coerce_type(&mut b, src, opt, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).unwrap();
    let out_t = types::unqualified(b.arena(), out).unwrap();
    assert!(matches!(
        types::type_data(b.arena(), out_t).unwrap().kind,
        types::TypeKind::Optional
    ));
}

#[test]
fn wildcard_parameter_keeps_source_type() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let elem = sint_qt(&mut b, 32, true);
    let src_t = b.type_list(elem);
    let src = b.qualified_type(src_t, true);
    let dst_t = b.type_list_wildcard();
    let dst = b.qualified_type(dst_t, true);

    let out = coerce_type(&mut b, src, dst, CoercionStyle::TRY_EXACT_MATCH).unwrap();
    assert_eq!(out, src);
}

#[test]
fn list_elements_coerce_recursively() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);
    let style = CoercionStyle::TRY_ALL_FOR_ASSIGNMENT;

    let e1 = sint_qt(&mut b, 16, true);
    let src_t = b.type_list(e1);
    let src = b.qualified_type(src_t, true);

    let e2 = sint_qt(&mut b, 32, true);
    let dst_t = b.type_set(e2);
    let dst = b.qualified_type(dst_t, false);

    assert!(coerce_type(&mut b, src, dst, style).is_some());
}

#[test]
fn contextual_bool_for_enum_requires_flag() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let e = b
        .type_enum(vec![(tern_common::Id::new("A"), None)])
        .unwrap();
    // Enums need an identity before they resolve.
    b.arena_mut().node_mut(e).as_type_mut().unwrap().type_id =
        Some(tern_common::Id::new("M::E"));
    if let Some(t) = b.arena_mut().node_mut(e).as_type_mut() {
        if let types::TypeKind::Enum { initialized } = &mut t.kind {
            *initialized = true;
        }
    }
    let src = b.qualified_type(e, true);

    let bool_t = b.type_bool();
    let dst = b.qualified_type(bool_t, true);

    assert!(coerce_type(&mut b, src, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).is_none());
    assert!(
        coerce_type(
            &mut b,
            src,
            dst,
            CoercionStyle::TRY_ALL_FOR_ASSIGNMENT | CoercionStyle::CONTEXTUAL_CONVERSION
        )
        .is_some()
    );
}

#[test]
fn assignment_into_const_destination_fails() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    // A non-const value of the same type into a const destination, under
    // plain assignment with no const promotion. A ctor would itself be
    // constant, so use a variable-backed name as the non-const source.
    let dst = sint_qt(&mut b, 32, true);
    let style = CoercionStyle::TRY_EXACT_MATCH | CoercionStyle::ASSIGNMENT;

    let t = b.type_sint(32);
    let var_ty = b.qualified_type(t, false);
    let var = b.declaration_local_variable("v", Some(var_ty), None);
    let name = b.expression_name("v");
    if let Some(e) = b.arena_mut().node_mut(name).as_expr_mut() {
        if let tern_ast::expr::ExprKind::Name { decl, .. } = &mut e.kind {
            *decl = Some(var);
        }
    }

    assert!(coerce_expression(&mut b, name, dst, style).is_err());
}

#[test]
fn constant_never_matches_mutable_non_const_operand() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    // bytes is mutable; a constant expression must not match a non-const
    // bytes operand.
    let c = b.ctor_bytes(vec![1, 2]);
    let e = b.expression_ctor(c);
    let dst_t = b.type_bytes();
    let dst = b.qualified_type(dst_t, false);

    let style = CoercionStyle::TRY_DIRECT_FOR_MATCHING;
    assert!(coerce_expression(&mut b, e, dst, style).is_err());
}

#[test]
fn literal_narrowing_rewrites_ctor() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let c = b.ctor_sint(5, 64);
    let e = b.expression_ctor(c);
    let dst = sint_qt(&mut b, 32, true);

    let x = coerce_expression(&mut b, e, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT)
        .unwrap();
    assert!(x.new_expression);

    let t = expr::expr_type(b.arena(), x.expr).unwrap();
    let t = types::unqualified(b.arena(), t).unwrap();
    assert!(matches!(
        types::type_data(b.arena(), t).unwrap().kind,
        types::TypeKind::SignedInteger { width: 32 }
    ));
}

#[test]
fn out_of_range_literal_fails() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let c = b.ctor_sint(300, 64);
    let e = b.expression_ctor(c);
    let t = b.type_sint(8);
    let dst = b.qualified_type(t, true);

    assert!(
        coerce_expression(&mut b, e, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).is_err()
    );
}

#[test]
fn negative_literal_never_coerces_unsigned() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let c = b.ctor_sint(-1, 64);
    let e = b.expression_ctor(c);
    let t = b.type_uint(32);
    let dst = b.qualified_type(t, true);

    assert!(
        coerce_expression(&mut b, e, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).is_err()
    );
}

#[test]
fn int_to_real_requires_lossless_round_trip() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let ok = b.ctor_sint(1 << 20, 64);
    let ok_e = b.expression_ctor(ok);
    let bad = b.ctor_sint(i64::MAX - 1, 64);
    let bad_e = b.expression_ctor(bad);

    let t1 = b.type_real();
    let dst1 = b.qualified_type(t1, true);
    let t2 = b.type_real();
    let dst2 = b.qualified_type(t2, true);

    assert!(
        coerce_expression(&mut b, ok_e, dst1, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT)
            .is_ok()
    );
    assert!(
        coerce_expression(&mut b, bad_e, dst2, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT)
            .is_err()
    );
}

#[test]
fn optional_wrap_produces_coercion_expression() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let c = b.ctor_sint(5, 32);
    let e = b.expression_ctor(c);

    let inner = sint_qt(&mut b, 32, true);
    let opt_t = b.type_optional(inner);
    let dst = b.qualified_type(opt_t, false);

    let x = coerce_expression(&mut b, e, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT)
        .unwrap();
    assert!(x.new_expression);
    assert!(matches!(
        expr::expr(b.arena(), x.expr).unwrap().kind,
        tern_ast::expr::ExprKind::Coerced
    ));
}

#[test]
fn operand_defaults_fill_missing_arguments() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let p0_t = sint_qt(&mut b, 32, true);
    let default_ctor = b.ctor_sint(42, 32);
    let default_expr = b.expression_ctor(default_ctor);
    let operands = vec![
        types::Operand::new(p0_t),
        {
            let t = sint_qt(&mut b, 32, true);
            types::Operand::named("extra", t).with_default(default_expr)
        },
    ];

    let arg = b.ctor_sint(1, 32);
    let arg = b.expression_ctor(arg);

    let (changed, exprs) = coerce_operands(
        &mut b,
        &[arg],
        &operands,
        CoercionStyle::TRY_DIRECT_MATCH_FOR_FUNCTION_CALL,
    )
    .unwrap();

    assert!(changed);
    assert_eq!(exprs.len(), 2);
}

#[test]
fn missing_argument_without_default_is_stray() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let p0 = sint_qt(&mut b, 32, true);
    let p1 = sint_qt(&mut b, 32, true);
    let operands = vec![types::Operand::new(p0), types::Operand::new(p1)];

    let arg = b.ctor_sint(1, 32);
    let arg = b.expression_ctor(arg);

    let err = coerce_operands(
        &mut b,
        &[arg],
        &operands,
        CoercionStyle::TRY_DIRECT_MATCH_FOR_FUNCTION_CALL,
    )
    .unwrap_err();
    assert!(err.contains("stray"), "{err}");
}

#[test]
fn style_display_lists_flags() {
    let style = CoercionStyle::TRY_EXACT_MATCH | CoercionStyle::ASSIGNMENT;
    let s = style.to_string();
    assert!(s.contains("try-exact-match"));
    assert!(s.contains("assignment"));
}
