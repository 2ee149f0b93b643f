//! Operators on bytes values.

use super::{binary_same, compare, member_call, size_of, spec, string_result, uint64_result};
use crate::builder::Builder;
use crate::operator::{Kind, OperatorDef, Priority, ResultSpec, SignatureSpec};
use crate::types::Operand;

fn bytes(b: &mut Builder<'_>) -> crate::arena::NodeId {
    b.type_bytes()
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
        ns: "bytes",
        doc,
        signature,
    }
}

pub(super) fn defs() -> Vec<OperatorDef> {
    vec![
        def("bytes::Sum", Kind::Sum, "Concatenates the two bytes values.", |b| {
            binary_same(b, bytes, true)
        }),
        def(
            "bytes::SumAssign",
            Kind::SumAssign,
            "Appends the second bytes value to the first.",
            |b| binary_same(b, bytes, false),
        ),
        def("bytes::Equal", Kind::Equal, "Compares the two bytes values.", |b| {
            compare(b, bytes)
        }),
        def("bytes::Unequal", Kind::Unequal, "Compares the two bytes values.", |b| {
            compare(b, bytes)
        }),
        def("bytes::Lower", Kind::Lower, "Compares the two bytes values.", |b| {
            compare(b, bytes)
        }),
        def("bytes::Greater", Kind::Greater, "Compares the two bytes values.", |b| {
            compare(b, bytes)
        }),
        def("bytes::Size", Kind::Size, "Returns the number of bytes in the value.", |b| {
            size_of(b, bytes)
        }),
        def(
            "bytes::In",
            Kind::In,
            "Returns true if the first value occurs within the second.",
            |b| {
                let t0 = bytes(b);
                let q0 = b.qualified_type(t0, true);
                let t1 = bytes(b);
                let q1 = b.qualified_type(t1, true);
                let r = super::bool_result(b);
                spec(vec![Operand::new(q0), Operand::new(q1)], r, ResultSpec::Type)
            },
        ),
        def("bytes::Begin", Kind::Begin, "Returns an iterator to the start of the value.", |b| {
            let t0 = bytes(b);
            let q0 = b.qualified_type(t0, true);
            let r = super::void_result(b);
            spec(vec![Operand::new(q0)], r, ResultSpec::IteratorOf(0))
        }),
        def("bytes::End", Kind::End, "Returns an iterator to the end of the value.", |b| {
            let t0 = bytes(b);
            let q0 = b.qualified_type(t0, true);
            let r = super::void_result(b);
            spec(vec![Operand::new(q0)], r, ResultSpec::IteratorOf(0))
        }),
        def(
            "bytes::ToUInt",
            Kind::MemberCall,
            "Interprets the data as representing an unsigned decimal number.",
            |b| {
                let t = b.type_bytes();
                let obj = b.qualified_type(t, true);
                let result = uint64_result(b);
                member_call(b, obj, "to_uint", vec![], result, ResultSpec::Type)
            },
        ),
        def(
            "bytes::Decode",
            Kind::MemberCall,
            "Interprets the bytes value as text and returns it as a string.",
            |b| {
                let t = b.type_bytes();
                let obj = b.qualified_type(t, true);
                let result = string_result(b);
                member_call(b, obj, "decode", vec![], result, ResultSpec::Type)
            },
        ),
    ]
}
