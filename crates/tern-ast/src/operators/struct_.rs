//! Operators on record types.

use super::{bool_result, spec, void_result};
use crate::arena::NodeId;
use crate::builder::Builder;
use crate::operator::{Kind, OperatorDef, Priority, ResultSpec, SignatureSpec};
use crate::types::Operand;

fn member_pair(b: &mut Builder<'_>, object_const: bool) -> (NodeId, NodeId) {
    let t0 = b.type_struct_wildcard();
    let q0 = b.qualified_type(t0, object_const);
    let t1 = b.type_member_wildcard();
    let q1 = b.qualified_type(t1, true);
    (q0, q1)
}

fn def(
    name: &'static str,
    kind: Kind,
    doc: &'static str,
    signature: fn(&mut Builder<'_>) -> SignatureSpec,
) -> OperatorDef {
    OperatorDef {
        name,
        kind,
        priority: Priority::Normal,
        ns: "struct",
        doc,
        signature,
    }
}

pub(super) fn defs() -> Vec<OperatorDef> {
    vec![
        def(
            "struct::Member",
            Kind::Member,
            "Retrieves the value of a record's field.",
            |b| {
                let (q0, q1) = member_pair(b, true);
                let r = void_result(b);
                spec(
                    vec![Operand::new(q0), Operand::new(q1)],
                    r,
                    ResultSpec::MemberOf { object: 0, member: 1 },
                )
            },
        ),
        def(
            "struct::HasMember",
            Kind::HasMember,
            "Returns true if the record's field has a value assigned.",
            |b| {
                let (q0, q1) = member_pair(b, true);
                let r = bool_result(b);
                spec(vec![Operand::new(q0), Operand::new(q1)], r, ResultSpec::Type)
            },
        ),
        def(
            "struct::TryMember",
            Kind::TryMember,
            "Retrieves the value of the record's field if it has one assigned.",
            |b| {
                let (q0, q1) = member_pair(b, true);
                let r = void_result(b);
                spec(
                    vec![Operand::new(q0), Operand::new(q1)],
                    r,
                    ResultSpec::MemberOf { object: 0, member: 1 },
                )
            },
        ),
        def(
            "struct::Unset",
            Kind::Unset,
            "Clears an optional record field.",
            |b| {
                let (q0, q1) = member_pair(b, false);
                let r = void_result(b);
                spec(vec![Operand::new(q0), Operand::new(q1)], r, ResultSpec::Type)
            },
        ),
    ]
}
