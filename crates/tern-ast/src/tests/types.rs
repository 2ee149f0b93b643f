use tern_common::Id;

use super::*;
use crate::builder::Builder;
use crate::context::{AstContext, CompilerOptions};

fn ctx() -> AstContext {
    AstContext::new(CompilerOptions::default())
}

#[test]
fn structural_equality_of_containers() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let e1 = b.type_sint(32);
    let q1 = b.qualified_type(e1, true);
    let l1 = b.type_list(q1);

    let e2 = b.type_sint(32);
    let q2 = b.qualified_type(e2, true);
    let l2 = b.type_list(q2);

    let e3 = b.type_sint(64);
    let q3 = b.qualified_type(e3, true);
    let l3 = b.type_list(q3);

    assert!(same_type(b.arena(), l1, l2));
    assert!(!same_type(b.arena(), l1, l3));
}

#[test]
fn type_id_wins_over_structure() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let t1 = b.type_bool();
    let t2 = b.type_string();
    b.arena_mut().node_mut(t1).as_type_mut().unwrap().type_id = Some(Id::new("M::T"));
    b.arena_mut().node_mut(t2).as_type_mut().unwrap().type_id = Some(Id::new("M::T"));

    assert!(same_type(b.arena(), t1, t2));
}

#[test]
fn anonymous_structs_equal_only_to_themselves() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let s1 = b.type_struct(vec![]);
    let s2 = b.type_struct(vec![]);

    assert!(same_type(b.arena(), s1, s1));
    assert!(!same_type(b.arena(), s1, s2));
}

#[test]
fn qualified_equality_considers_constness() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let t1 = b.type_bool();
    let q1 = b.qualified_type(t1, true);
    let t2 = b.type_bool();
    let q2 = b.qualified_type(t2, false);

    assert!(!same_qualified_type(b.arena(), q1, q2));
    assert!(same_type_except_constness(b.arena(), q1, q2));
}

#[test]
fn auto_and_unknown_are_unresolved() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let auto = b.type_auto();
    let unknown = b.type_unknown();
    let bool_ = b.type_bool();

    assert!(!is_resolved(b.arena(), auto));
    assert!(!is_resolved(b.arena(), unknown));
    assert!(is_resolved(b.arena(), bool_));
}

#[test]
fn container_resolution_recurses() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let auto = b.qualified_type_auto();
    let unresolved_list = b.type_list(auto);
    assert!(!is_resolved(b.arena(), unresolved_list));

    let t = b.type_sint(32);
    let q = b.qualified_type(t, true);
    let resolved_list = b.type_list(q);
    assert!(is_resolved(b.arena(), resolved_list));
}

#[test]
fn recursive_struct_resolution_terminates() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    // type T = struct { field next: strong_ref<T>; } with the reference
    // pointing back at the struct through a resolved name.
    let s = b.type_struct(vec![]);
    let name = b.type_name("T");
    let name_q = b.qualified_type(name, false);
    let ref_t = b.type_strong_ref(name_q);
    let ref_q = b.qualified_type(ref_t, false);
    let field = b.declaration_field("next", ref_q, None, None, None);
    b.arena_mut().add_child(s, field);

    let s_q = b.qualified_type(s, false);
    let decl = b.declaration_type("T", s_q, None, crate::decl::Linkage::Private);

    // Point the name back at the declaration, closing the cycle.
    if let Some(d) = b.arena_mut().node_mut(name).as_type_mut() {
        if let TypeKind::Name { decl: slot, .. } = &mut d.kind {
            *slot = Some(decl);
        }
    }

    // Must terminate and report resolved.
    assert!(is_resolved(b.arena(), s));
}

#[test]
fn wildcards_are_resolved() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let l = b.type_list_wildcard();
    assert!(is_resolved(b.arena(), l));
}

#[test]
fn predicate_tables() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let int32 = b.type_sint(32);
    let bytes = b.type_bytes();
    let elem = b.qualified_type(int32, true);
    let vec_t = b.type_vector(elem);
    let sref_inner = b.type_bool();
    let sref_q = b.qualified_type(sref_inner, false);
    let sref = b.type_strong_ref(sref_q);

    assert!(is_allocable(b.arena(), int32));
    assert!(is_sortable(b.arena(), int32));
    assert!(!is_mutable(b.arena(), int32));
    assert!(is_mutable(b.arena(), bytes));
    assert!(is_iterable(b.arena(), vec_t));
    assert!(is_parameterized(b.arena(), vec_t));
    assert!(is_reference_type(b.arena(), sref));
    assert!(is_runtime_non_trivial(b.arena(), bytes));
    assert!(!is_runtime_non_trivial(b.arena(), int32));
}

#[test]
fn enum_labels_are_normalized() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let e = b
        .type_enum(vec![
            (Id::new("A"), None),
            (Id::new("B"), Some(10)),
            (Id::new("C"), None),
        ])
        .unwrap();

    let labels: Vec<(Id, i64)> = b
        .arena()
        .children(e)
        .iter()
        .copied()
        .flatten()
        .map(|d| {
            let data = crate::decl::decl(b.arena(), d).unwrap();
            let value = crate::ctor::ctor(
                b.arena(),
                b.arena().child(b.arena().child(d, 1).unwrap(), 0).unwrap(),
            )
            .map(|c| match &c.kind {
                crate::ctor::CtorKind::Enum { value, .. } => *value,
                _ => panic!("expected enum ctor"),
            })
            .unwrap();
            (data.id.clone(), value)
        })
        .collect();

    assert_eq!(
        labels,
        vec![
            (Id::new("A"), 11),
            (Id::new("B"), 10),
            (Id::new("C"), 12),
            (Id::new("Undef"), -1),
        ]
    );
}

#[test]
fn reserved_undef_label_rejected() {
    let mut ctx = ctx();
    let mut b = Builder::new(&mut ctx);

    let r = b.type_enum(vec![(Id::new("undef"), None)]);
    assert!(r.is_err());
}
