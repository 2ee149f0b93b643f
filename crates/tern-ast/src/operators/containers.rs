//! Operators on containers (list, vector, set, map).

use super::{bool_result, compare, member_call, size_of, spec, void_result};
use crate::arena::NodeId;
use crate::builder::Builder;
use crate::operator::{Kind, OperatorDef, Priority, ResultSpec, SignatureSpec};
use crate::types::Operand;

fn list(b: &mut Builder<'_>) -> NodeId {
    b.type_list_wildcard()
}

fn vector(b: &mut Builder<'_>) -> NodeId {
    b.type_vector_wildcard()
}

fn set(b: &mut Builder<'_>) -> NodeId {
    b.type_set_wildcard()
}

fn map(b: &mut Builder<'_>) -> NodeId {
    b.type_map_wildcard()
}

fn begin_end(b: &mut Builder<'_>, mk: fn(&mut Builder<'_>) -> NodeId) -> SignatureSpec {
    let t0 = mk(b);
    let q0 = b.qualified_type(t0, true);
    let r = void_result(b);
    spec(vec![Operand::new(q0)], r, ResultSpec::IteratorOf(0))
}

fn contains(b: &mut Builder<'_>, mk: fn(&mut Builder<'_>) -> NodeId) -> SignatureSpec {
    let t0 = b.type_any();
    let q0 = b.qualified_type(t0, true);
    let t1 = mk(b);
    let q1 = b.qualified_type(t1, true);
    let r = bool_result(b);
    spec(vec![Operand::new(q0), Operand::new(q1)], r, ResultSpec::Type)
}

fn def(
    name: &'static str,
    kind: Kind,
    ns: &'static str,
    doc: &'static str,
    signature: fn(&mut Builder<'_>) -> SignatureSpec,
) -> OperatorDef {
    OperatorDef {
        name,
        kind,
        priority: Priority::Normal,
        ns,
        doc,
        signature,
    }
}

pub(super) fn defs() -> Vec<OperatorDef> {
    vec![
        // list
        def("list::Equal", Kind::Equal, "list", "Compares the two lists element-wise.", |b| {
            compare(b, list)
        }),
        def("list::Size", Kind::Size, "list", "Returns the number of elements in the list.", |b| {
            size_of(b, list)
        }),
        def("list::Begin", Kind::Begin, "list", "Returns an iterator to the start of the list.", |b| {
            begin_end(b, list)
        }),
        def("list::End", Kind::End, "list", "Returns an iterator to the end of the list.", |b| {
            begin_end(b, list)
        }),
        // vector
        def(
            "vector::Equal",
            Kind::Equal,
            "vector",
            "Compares the two vectors element-wise.",
            |b| compare(b, vector),
        ),
        def(
            "vector::Size",
            Kind::Size,
            "vector",
            "Returns the number of elements in the vector.",
            |b| size_of(b, vector),
        ),
        def(
            "vector::Index",
            Kind::Index,
            "vector",
            "Returns the vector element at the given index.",
            |b| {
                let t0 = vector(b);
                let q0 = b.qualified_type(t0, true);
                let t1 = b.type_uint(64);
                let q1 = b.qualified_type(t1, true);
                let r = void_result(b);
                spec(
                    vec![Operand::new(q0), Operand::new(q1)],
                    r,
                    ResultSpec::ElementOf(0),
                )
            },
        ),
        def(
            "vector::Begin",
            Kind::Begin,
            "vector",
            "Returns an iterator to the start of the vector.",
            |b| begin_end(b, vector),
        ),
        def(
            "vector::End",
            Kind::End,
            "vector",
            "Returns an iterator to the end of the vector.",
            |b| begin_end(b, vector),
        ),
        def(
            "vector::PushBack",
            Kind::MemberCall,
            "vector",
            "Appends an element to the end of the vector.",
            |b| {
                let t = b.type_vector_wildcard();
                let obj = b.qualified_type(t, false);
                let elem_t = b.type_any();
                let elem_q = b.qualified_type(elem_t, true);
                let result = void_result(b);
                member_call(
                    b,
                    obj,
                    "push_back",
                    vec![Operand::named("elem", elem_q)],
                    result,
                    ResultSpec::Type,
                )
            },
        ),
        // set
        def("set::Equal", Kind::Equal, "set", "Compares the two sets.", |b| compare(b, set)),
        def("set::Size", Kind::Size, "set", "Returns the number of elements in the set.", |b| {
            size_of(b, set)
        }),
        def(
            "set::In",
            Kind::In,
            "set",
            "Returns true if an element is a member of the set.",
            |b| contains(b, set),
        ),
        // map
        def(
            "map::In",
            Kind::In,
            "map",
            "Returns true if a key is part of the map.",
            |b| contains(b, map),
        ),
        def("map::Size", Kind::Size, "map", "Returns the number of entries in the map.", |b| {
            size_of(b, map)
        }),
        def(
            "map::Index",
            Kind::Index,
            "map",
            "Returns the value stored under a given key.",
            |b| {
                let t0 = map(b);
                let q0 = b.qualified_type(t0, true);
                let t1 = b.type_any();
                let q1 = b.qualified_type(t1, true);
                let r = void_result(b);
                spec(
                    vec![Operand::new(q0), Operand::new(q1)],
                    r,
                    ResultSpec::ElementOf(0),
                )
            },
        ),
        def(
            "map::IndexAssign",
            Kind::IndexAssign,
            "map",
            "Stores a value under a given key.",
            |b| {
                let t0 = map(b);
                let q0 = b.qualified_type(t0, false);
                let t1 = b.type_any();
                let q1 = b.qualified_type(t1, true);
                let t2 = b.type_any();
                let q2 = b.qualified_type(t2, true);
                let r = void_result(b);
                spec(
                    vec![Operand::new(q0), Operand::new(q1), Operand::new(q2)],
                    r,
                    ResultSpec::Type,
                )
            },
        ),
        def(
            "map::Delete",
            Kind::Delete,
            "map",
            "Removes an entry from the map.",
            |b| {
                let t0 = map(b);
                let q0 = b.qualified_type(t0, false);
                let t1 = b.type_any();
                let q1 = b.qualified_type(t1, true);
                let r = void_result(b);
                spec(vec![Operand::new(q0), Operand::new(q1)], r, ResultSpec::Type)
            },
        ),
    ]
}
