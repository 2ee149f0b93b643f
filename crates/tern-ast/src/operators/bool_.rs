//! Operators on booleans.

use super::{binary_same, compare};
use crate::builder::Builder;
use crate::operator::{Kind, OperatorDef, Priority, SignatureSpec};

fn bool_(b: &mut Builder<'_>) -> crate::arena::NodeId {
    b.type_bool()
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
        ns: "bool",
        doc,
        signature,
    }
}

pub(super) fn defs() -> Vec<OperatorDef> {
    vec![
        def("bool::Equal", Kind::Equal, "Compares the two boolean values.", |b| {
            compare(b, bool_)
        }),
        def("bool::Unequal", Kind::Unequal, "Compares the two boolean values.", |b| {
            compare(b, bool_)
        }),
        def(
            "bool::BitAnd",
            Kind::BitAnd,
            "Computes the logical 'and' of the two boolean values.",
            |b| binary_same(b, bool_, true),
        ),
        def(
            "bool::BitOr",
            Kind::BitOr,
            "Computes the logical 'or' of the two boolean values.",
            |b| binary_same(b, bool_, true),
        ),
        def(
            "bool::BitXor",
            Kind::BitXor,
            "Computes the logical 'xor' of the two boolean values.",
            |b| binary_same(b, bool_, true),
        ),
    ]
}
