//! Operators on enums.

use super::compare;
use crate::builder::Builder;
use crate::operator::{Kind, OperatorDef, Priority, SignatureSpec};

fn enum_(b: &mut Builder<'_>) -> crate::arena::NodeId {
    b.type_enum_wildcard()
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
        ns: "enum",
        doc,
        signature,
    }
}

pub(super) fn defs() -> Vec<OperatorDef> {
    vec![
        def("enum::Equal", Kind::Equal, "Compares the two enum values.", |b| {
            compare(b, enum_)
        }),
        def("enum::Unequal", Kind::Unequal, "Compares the two enum values.", |b| {
            compare(b, enum_)
        }),
    ]
}
