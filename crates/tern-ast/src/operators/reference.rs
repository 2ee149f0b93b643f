//! Operators on references.

use super::spec;
use crate::arena::NodeId;
use crate::builder::Builder;
use crate::operator::{Kind, OperatorDef, Priority, ResultSpec, SignatureSpec};
use crate::types::Operand;

fn deref_of(b: &mut Builder<'_>, t0: NodeId) -> SignatureSpec {
    let q0 = b.qualified_type(t0, true);
    let r = super::void_result(b);
    spec(vec![Operand::new(q0)], r, ResultSpec::DereferencedOf(0))
}

pub(super) fn defs() -> Vec<OperatorDef> {
    vec![
        OperatorDef {
            name: "strong_reference::Deref",
            kind: Kind::Deref,
            priority: Priority::Normal,
            ns: "strong_reference",
            doc: "Returns the referenced instance.",
            signature: |b| {
                let t = b.type_strong_ref_wildcard();
                deref_of(b, t)
            },
        },
        OperatorDef {
            name: "weak_reference::Deref",
            kind: Kind::Deref,
            priority: Priority::Normal,
            ns: "weak_reference",
            doc: "Returns the referenced instance, or throws if expired.",
            signature: |b| {
                let t = b.type_weak_ref_wildcard();
                deref_of(b, t)
            },
        },
        OperatorDef {
            name: "value_reference::Deref",
            kind: Kind::Deref,
            priority: Priority::Normal,
            ns: "value_reference",
            doc: "Returns the referenced instance.",
            signature: |b| {
                let t = b.type_value_ref_wildcard();
                deref_of(b, t)
            },
        },
        OperatorDef {
            name: "generic::New",
            kind: Kind::New,
            priority: Priority::Normal,
            ns: "generic",
            doc: "Allocates a new instance on the heap, returning a strong reference.",
            signature: |b| {
                let t0 = b.type_any();
                let q0 = b.qualified_type(t0, true);
                let r = super::void_result(b);
                spec(vec![Operand::new(q0)], r, ResultSpec::StrongRefOf(0))
            },
        },
    ]
}
