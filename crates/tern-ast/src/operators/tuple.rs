//! Operators on tuples.

use super::compare;
use crate::builder::Builder;
use crate::operator::{Kind, OperatorDef, Priority, SignatureSpec};

fn tuple(b: &mut Builder<'_>) -> crate::arena::NodeId {
    b.type_tuple_wildcard()
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
        ns: "tuple",
        doc,
        signature,
    }
}

pub(super) fn defs() -> Vec<OperatorDef> {
    vec![
        def("tuple::Equal", Kind::Equal, "Compares the two tuples element-wise.", |b| {
            compare(b, tuple)
        }),
        def("tuple::Unequal", Kind::Unequal, "Compares the two tuples element-wise.", |b| {
            compare(b, tuple)
        }),
    ]
}
