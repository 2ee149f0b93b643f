//! Operators on real numbers.

use super::{binary_same, compare, unary_same};
use crate::builder::Builder;
use crate::operator::{Kind, OperatorDef, Priority, SignatureSpec};

fn real(b: &mut Builder<'_>) -> crate::arena::NodeId {
    b.type_real()
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
        // Low priority so that integer operators win when both sides are
        // integer literals that would also coerce to real.
        priority: Priority::Low,
        ns: "real",
        doc,
        signature,
    }
}

pub(super) fn defs() -> Vec<OperatorDef> {
    vec![
        def("real::Sum", Kind::Sum, "Computes the sum of the values.", |b| {
            binary_same(b, real, true)
        }),
        def(
            "real::Difference",
            Kind::Difference,
            "Computes the difference between the two values.",
            |b| binary_same(b, real, true),
        ),
        def("real::Multiple", Kind::Multiple, "Multiplies the two values.", |b| {
            binary_same(b, real, true)
        }),
        def(
            "real::Division",
            Kind::Division,
            "Divides the first value by the second.",
            |b| binary_same(b, real, true),
        ),
        def(
            "real::Power",
            Kind::Power,
            "Computes the first value raised to the power of the second.",
            |b| binary_same(b, real, true),
        ),
        def("real::SignNeg", Kind::SignNeg, "Inverts the sign of the value.", |b| {
            unary_same(b, real, true)
        }),
        def("real::Equal", Kind::Equal, "Compares the two values.", |b| compare(b, real)),
        def("real::Unequal", Kind::Unequal, "Compares the two values.", |b| {
            compare(b, real)
        }),
        def("real::Lower", Kind::Lower, "Compares the two values.", |b| compare(b, real)),
        def("real::LowerEqual", Kind::LowerEqual, "Compares the two values.", |b| {
            compare(b, real)
        }),
        def("real::Greater", Kind::Greater, "Compares the two values.", |b| {
            compare(b, real)
        }),
        def("real::GreaterEqual", Kind::GreaterEqual, "Compares the two values.", |b| {
            compare(b, real)
        }),
    ]
}
