//! Operators on signed and unsigned integers.

use super::{binary_same, compare, unary_same};
use crate::builder::Builder;
use crate::operator::{Kind, OperatorDef, Priority};

fn sint(b: &mut Builder<'_>) -> crate::arena::NodeId {
    b.type_sint_wildcard()
}

fn uint(b: &mut Builder<'_>) -> crate::arena::NodeId {
    b.type_uint_wildcard()
}

fn sdef(
    name: &'static str,
    kind: Kind,
    doc: &'static str,
    signature: fn(&mut Builder<'_>) -> crate::operator::SignatureSpec,
) -> OperatorDef {
    OperatorDef {
        name,
        kind,
        priority: Priority::Normal,
        ns: "signed_integer",
        doc,
        signature,
    }
}

fn udef(
    name: &'static str,
    kind: Kind,
    doc: &'static str,
    signature: fn(&mut Builder<'_>) -> crate::operator::SignatureSpec,
) -> OperatorDef {
    OperatorDef {
        name,
        kind,
        priority: Priority::Normal,
        ns: "unsigned_integer",
        doc,
        signature,
    }
}

pub(super) fn defs() -> Vec<OperatorDef> {
    vec![
        // Signed arithmetic.
        sdef("signed_integer::Sum", Kind::Sum, "Computes the sum of the integers.", |b| {
            binary_same(b, sint, true)
        }),
        sdef(
            "signed_integer::Difference",
            Kind::Difference,
            "Computes the difference between the two integers.",
            |b| binary_same(b, sint, true),
        ),
        sdef(
            "signed_integer::Multiple",
            Kind::Multiple,
            "Multiplies the two integers.",
            |b| binary_same(b, sint, true),
        ),
        sdef(
            "signed_integer::Division",
            Kind::Division,
            "Divides the first integer by the second.",
            |b| binary_same(b, sint, true),
        ),
        sdef(
            "signed_integer::Modulo",
            Kind::Modulo,
            "Computes the modulus of the first integer divided by the second.",
            |b| binary_same(b, sint, true),
        ),
        sdef(
            "signed_integer::Power",
            Kind::Power,
            "Computes the first integer raised to the power of the second.",
            |b| binary_same(b, sint, true),
        ),
        sdef(
            "signed_integer::SignNeg",
            Kind::SignNeg,
            "Inverts the sign of the integer.",
            |b| unary_same(b, sint, true),
        ),
        // Signed comparison.
        sdef("signed_integer::Equal", Kind::Equal, "Compares the two integers.", |b| {
            compare(b, sint)
        }),
        sdef(
            "signed_integer::Unequal",
            Kind::Unequal,
            "Compares the two integers.",
            |b| compare(b, sint),
        ),
        sdef("signed_integer::Lower", Kind::Lower, "Compares the two integers.", |b| {
            compare(b, sint)
        }),
        sdef(
            "signed_integer::LowerEqual",
            Kind::LowerEqual,
            "Compares the two integers.",
            |b| compare(b, sint),
        ),
        sdef(
            "signed_integer::Greater",
            Kind::Greater,
            "Compares the two integers.",
            |b| compare(b, sint),
        ),
        sdef(
            "signed_integer::GreaterEqual",
            Kind::GreaterEqual,
            "Compares the two integers.",
            |b| compare(b, sint),
        ),
        // Signed compound assignment and increment/decrement.
        sdef(
            "signed_integer::SumAssign",
            Kind::SumAssign,
            "Increments the first integer by the second.",
            |b| binary_same(b, sint, false),
        ),
        sdef(
            "signed_integer::DifferenceAssign",
            Kind::DifferenceAssign,
            "Decrements the first integer by the second.",
            |b| binary_same(b, sint, false),
        ),
        sdef(
            "signed_integer::IncrPrefix",
            Kind::IncrPrefix,
            "Increments the integer, returning the new value.",
            |b| unary_same(b, sint, false),
        ),
        sdef(
            "signed_integer::IncrPostfix",
            Kind::IncrPostfix,
            "Increments the integer, returning the old value.",
            |b| unary_same(b, sint, false),
        ),
        sdef(
            "signed_integer::DecrPrefix",
            Kind::DecrPrefix,
            "Decrements the integer, returning the new value.",
            |b| unary_same(b, sint, false),
        ),
        sdef(
            "signed_integer::DecrPostfix",
            Kind::DecrPostfix,
            "Decrements the integer, returning the old value.",
            |b| unary_same(b, sint, false),
        ),
        // Unsigned arithmetic.
        udef("unsigned_integer::Sum", Kind::Sum, "Computes the sum of the integers.", |b| {
            binary_same(b, uint, true)
        }),
        udef(
            "unsigned_integer::Difference",
            Kind::Difference,
            "Computes the difference between the two integers.",
            |b| binary_same(b, uint, true),
        ),
        udef(
            "unsigned_integer::Multiple",
            Kind::Multiple,
            "Multiplies the two integers.",
            |b| binary_same(b, uint, true),
        ),
        udef(
            "unsigned_integer::Division",
            Kind::Division,
            "Divides the first integer by the second.",
            |b| binary_same(b, uint, true),
        ),
        udef(
            "unsigned_integer::Modulo",
            Kind::Modulo,
            "Computes the modulus of the first integer divided by the second.",
            |b| binary_same(b, uint, true),
        ),
        udef(
            "unsigned_integer::Power",
            Kind::Power,
            "Computes the first integer raised to the power of the second.",
            |b| binary_same(b, uint, true),
        ),
        // Unsigned bit operations.
        udef(
            "unsigned_integer::BitAnd",
            Kind::BitAnd,
            "Computes the bit-wise 'and' of the two integers.",
            |b| binary_same(b, uint, true),
        ),
        udef(
            "unsigned_integer::BitOr",
            Kind::BitOr,
            "Computes the bit-wise 'or' of the two integers.",
            |b| binary_same(b, uint, true),
        ),
        udef(
            "unsigned_integer::BitXor",
            Kind::BitXor,
            "Computes the bit-wise 'xor' of the two integers.",
            |b| binary_same(b, uint, true),
        ),
        udef(
            "unsigned_integer::ShiftLeft",
            Kind::ShiftLeft,
            "Shifts the integer to the left by the given number of bits.",
            |b| binary_same(b, uint, true),
        ),
        udef(
            "unsigned_integer::ShiftRight",
            Kind::ShiftRight,
            "Shifts the integer to the right by the given number of bits.",
            |b| binary_same(b, uint, true),
        ),
        udef(
            "unsigned_integer::Negate",
            Kind::Negate,
            "Computes the bit-wise negation of the integer.",
            |b| unary_same(b, uint, true),
        ),
        // Unsigned comparison.
        udef("unsigned_integer::Equal", Kind::Equal, "Compares the two integers.", |b| {
            compare(b, uint)
        }),
        udef(
            "unsigned_integer::Unequal",
            Kind::Unequal,
            "Compares the two integers.",
            |b| compare(b, uint),
        ),
        udef("unsigned_integer::Lower", Kind::Lower, "Compares the two integers.", |b| {
            compare(b, uint)
        }),
        udef(
            "unsigned_integer::LowerEqual",
            Kind::LowerEqual,
            "Compares the two integers.",
            |b| compare(b, uint),
        ),
        udef(
            "unsigned_integer::Greater",
            Kind::Greater,
            "Compares the two integers.",
            |b| compare(b, uint),
        ),
        udef(
            "unsigned_integer::GreaterEqual",
            Kind::GreaterEqual,
            "Compares the two integers.",
            |b| compare(b, uint),
        ),
        // Unsigned compound assignment and increment/decrement.
        udef(
            "unsigned_integer::SumAssign",
            Kind::SumAssign,
            "Increments the first integer by the second.",
            |b| binary_same(b, uint, false),
        ),
        udef(
            "unsigned_integer::DifferenceAssign",
            Kind::DifferenceAssign,
            "Decrements the first integer by the second.",
            |b| binary_same(b, uint, false),
        ),
        udef(
            "unsigned_integer::IncrPrefix",
            Kind::IncrPrefix,
            "Increments the integer, returning the new value.",
            |b| unary_same(b, uint, false),
        ),
        udef(
            "unsigned_integer::IncrPostfix",
            Kind::IncrPostfix,
            "Increments the integer, returning the old value.",
            |b| unary_same(b, uint, false),
        ),
        udef(
            "unsigned_integer::DecrPrefix",
            Kind::DecrPrefix,
            "Decrements the integer, returning the new value.",
            |b| unary_same(b, uint, false),
        ),
        udef(
            "unsigned_integer::DecrPostfix",
            Kind::DecrPostfix,
            "Decrements the integer, returning the old value.",
            |b| unary_same(b, uint, false),
        ),
    ]
}
