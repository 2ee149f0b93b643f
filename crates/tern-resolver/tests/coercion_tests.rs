//! Constructor-level coercions across the literal table.

mod common;

use tern_ast::builder::Builder;
use tern_ast::ctor::{self, CtorKind};
use tern_ast::expr;
use tern_ast::types::{self, TypeKind};
use tern_resolver::coercion::{coerce_ctor, coerce_expression, CoercionStyle};

#[test]
fn list_literal_coerces_into_vector_with_element_coercion() {
    let mut ctx = common::context();
    let mut b = Builder::new(&mut ctx);

    let e1 = b.ctor_sint(1, 64);
    let e1 = b.expression_ctor(e1);
    let e2 = b.ctor_sint(2, 64);
    let e2 = b.expression_ctor(e2);
    let list = b.ctor_list(vec![e1, e2]);

    let elem = b.type_sint(32);
    let elem = b.qualified_type(elem, true);
    let vec_t = b.type_vector(elem);
    let dst = b.qualified_type(vec_t, false);

    let nc = coerce_ctor(&mut b, list, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).unwrap();
    assert!(matches!(
        ctor::ctor(b.arena(), nc).map(|c| &c.kind),
        Some(CtorKind::Vector)
    ));

    // Every element was narrowed to the destination element type.
    for v in ctor::ctor_values(b.arena(), nc) {
        let t = expr::expr_type(b.arena(), v).unwrap();
        let t = types::unqualified(b.arena(), t).unwrap();
        assert!(matches!(
            types::type_data(b.arena(), t).unwrap().kind,
            TypeKind::SignedInteger { width: 32 }
        ));
    }
}

#[test]
fn list_literal_coerces_into_set() {
    let mut ctx = common::context();
    let mut b = Builder::new(&mut ctx);

    let e1 = b.ctor_sint(1, 64);
    let e1 = b.expression_ctor(e1);
    let list = b.ctor_list(vec![e1]);

    let elem = b.type_sint(64);
    let elem = b.qualified_type(elem, true);
    let set_t = b.type_set(elem);
    let dst = b.qualified_type(set_t, false);

    let nc = coerce_ctor(&mut b, list, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).unwrap();
    assert!(matches!(
        ctor::ctor(b.arena(), nc).map(|c| &c.kind),
        Some(CtorKind::Set)
    ));
}

#[test]
fn incompatible_list_elements_refuse() {
    let mut ctx = common::context();
    let mut b = Builder::new(&mut ctx);

    let e1 = b.ctor_string("s");
    let e1 = b.expression_ctor(e1);
    let list = b.ctor_list(vec![e1]);

    let elem = b.type_sint(32);
    let elem = b.qualified_type(elem, true);
    let vec_t = b.type_vector(elem);
    let dst = b.qualified_type(vec_t, false);

    assert!(coerce_ctor(&mut b, list, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).is_none());
}

#[test]
fn tuple_literal_coerces_element_wise() {
    let mut ctx = common::context();
    let mut b = Builder::new(&mut ctx);

    let e1 = b.ctor_sint(1, 64);
    let e1 = b.expression_ctor(e1);
    let e2 = b.ctor_string("x");
    let e2 = b.expression_ctor(e2);
    let tup = b.ctor_tuple(vec![e1, e2]);

    let t1 = b.type_sint(32);
    let t1 = b.qualified_type(t1, true);
    let t2 = b.type_string();
    let t2 = b.qualified_type(t2, true);
    let dst_t = b.type_tuple(vec![t1, t2]);
    let dst = b.qualified_type(dst_t, true);

    let nc = coerce_ctor(&mut b, tup, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).unwrap();
    assert!(matches!(
        ctor::ctor(b.arena(), nc).map(|c| &c.kind),
        Some(CtorKind::Tuple)
    ));

    // Arity mismatches refuse.
    let e3 = b.ctor_sint(1, 64);
    let e3 = b.expression_ctor(e3);
    let short = b.ctor_tuple(vec![e3]);
    assert!(
        coerce_ctor(&mut b, short, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).is_none()
    );
}

#[test]
fn map_literal_coerces_pairwise() {
    let mut ctx = common::context();
    let mut b = Builder::new(&mut ctx);

    let k = b.ctor_string("a");
    let k = b.expression_ctor(k);
    let v = b.ctor_sint(1, 64);
    let v = b.expression_ctor(v);

    let kt_t = b.type_string();
    let kt = b.qualified_type(kt_t, true);
    let vt_t = b.type_sint(64);
    let vt = b.qualified_type(vt_t, true);
    let map = b.ctor_map(kt, vt, vec![(k, v)]);

    let dkt = b.type_string();
    let dkt = b.qualified_type(dkt, true);
    let dvt = b.type_sint(64);
    let dvt = b.qualified_type(dvt, true);
    let dst_t = b.type_map(dkt, dvt);
    let dst = b.qualified_type(dst_t, false);

    let nc = coerce_ctor(&mut b, map, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).unwrap();
    assert!(matches!(
        ctor::ctor(b.arena(), nc).map(|c| &c.kind),
        Some(CtorKind::Map)
    ));
    assert_eq!(ctor::ctor_map_entries(b.arena(), nc).len(), 1);
}

#[test]
fn null_becomes_typed_absence() {
    let mut ctx = common::context();
    let mut b = Builder::new(&mut ctx);

    let null = b.ctor_null();
    let inner = b.type_sint(32);
    let inner = b.qualified_type(inner, true);
    let opt_t = b.type_optional(inner);
    let dst = b.qualified_type(opt_t, false);

    let nc = coerce_ctor(&mut b, null, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).unwrap();
    assert!(matches!(
        ctor::ctor(b.arena(), nc).map(|c| &c.kind),
        Some(CtorKind::Optional)
    ));
    // The optional carries no value.
    assert!(b.arena().child(nc, ctor::CTOR_FIRST_VALUE).is_none());
}

#[test]
fn null_becomes_weak_reference() {
    let mut ctx = common::context();
    let mut b = Builder::new(&mut ctx);

    let null = b.ctor_null();
    let inner = b.type_bool();
    let inner = b.qualified_type(inner, false);
    let wref = b.type_weak_ref(inner);
    let dst = b.qualified_type(wref, false);

    let nc = coerce_ctor(&mut b, null, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).unwrap();
    assert!(matches!(
        ctor::ctor(b.arena(), nc).map(|c| &c.kind),
        Some(CtorKind::WeakReference)
    ));
}

#[test]
fn real_literal_to_integer_is_lossless_only() {
    let mut ctx = common::context();
    let mut b = Builder::new(&mut ctx);

    let exact = b.ctor_real(42.0);
    let t = b.type_sint(32);
    let dst = b.qualified_type(t, true);
    let nc = coerce_ctor(&mut b, exact, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).unwrap();
    assert!(matches!(
        ctor::ctor(b.arena(), nc).map(|c| &c.kind),
        Some(CtorKind::SignedInteger { value: 42, .. })
    ));

    let inexact = b.ctor_real(1.5);
    let t = b.type_sint(32);
    let dst = b.qualified_type(t, true);
    assert!(
        coerce_ctor(&mut b, inexact, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).is_none()
    );
}

#[test]
fn unsigned_literal_to_signed_checks_range() {
    let mut ctx = common::context();
    let mut b = Builder::new(&mut ctx);

    let ok = b.ctor_uint(100, 64);
    let t = b.type_sint(8);
    let dst = b.qualified_type(t, true);
    assert!(coerce_ctor(&mut b, ok, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).is_some());

    let too_big = b.ctor_uint(300, 64);
    let t = b.type_sint(8);
    let dst = b.qualified_type(t, true);
    assert!(
        coerce_ctor(&mut b, too_big, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).is_none()
    );
}

#[test]
fn coerced_literal_keeps_the_original_around() {
    let mut ctx = common::context();
    let mut b = Builder::new(&mut ctx);

    let c = b.ctor_sint(5, 64);
    let e = b.expression_ctor(c);
    let t = b.type_sint(32);
    let dst = b.qualified_type(t, true);

    let x = coerce_expression(&mut b, e, dst, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT)
        .unwrap();
    let wrapper = b.arena().child(x.expr, 0).unwrap();
    assert!(matches!(
        ctor::ctor(b.arena(), wrapper).map(|w| &w.kind),
        Some(CtorKind::Coerced)
    ));
    assert_eq!(b.arena().child(wrapper, ctor::COERCED_ORIGINAL), Some(c));
}
