//! Operators on strings.

use super::{binary_same, compare, member_call, size_of, spec, string_result};
use crate::builder::Builder;
use crate::operator::{Kind, OperatorDef, Priority, ResultSpec, SignatureSpec};
use crate::types::Operand;

fn string(b: &mut Builder<'_>) -> crate::arena::NodeId {
    b.type_string()
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
        ns: "string",
        doc,
        signature,
    }
}

pub(super) fn defs() -> Vec<OperatorDef> {
    vec![
        def("string::Sum", Kind::Sum, "Concatenates the two strings.", |b| {
            binary_same(b, string, true)
        }),
        def(
            "string::SumAssign",
            Kind::SumAssign,
            "Appends the second string to the first.",
            |b| binary_same(b, string, false),
        ),
        def("string::Equal", Kind::Equal, "Compares two strings lexicographically.", |b| {
            compare(b, string)
        }),
        def(
            "string::Unequal",
            Kind::Unequal,
            "Compares two strings lexicographically.",
            |b| compare(b, string),
        ),
        def("string::Size", Kind::Size, "Returns the number of characters in the string.", |b| {
            size_of(b, string)
        }),
        def(
            "string::Encode",
            Kind::MemberCall,
            "Converts the string into a binary representation.",
            |b| {
                let t = b.type_string();
                let obj = b.qualified_type(t, true);
                let bytes_t = b.type_bytes();
                let result = b.qualified_type(bytes_t, false);
                member_call(b, obj, "encode", vec![], result, ResultSpec::Type)
            },
        ),
        def(
            "string::Split",
            Kind::MemberCall,
            "Splits the string at each occurrence of the separator.",
            |b| {
                let t = b.type_string();
                let obj = b.qualified_type(t, true);

                let sep_t = b.type_string();
                let sep_q = b.qualified_type(sep_t, true);
                let sep_default_ctor = b.ctor_string(" ");
                let sep_default = b.expression_ctor(sep_default_ctor);
                let sep = Operand::named("sep", sep_q).with_default(sep_default);

                let elem_t = b.type_string();
                let elem_q = b.qualified_type(elem_t, true);
                let vec_t = b.type_vector(elem_q);
                let result = b.qualified_type(vec_t, false);

                member_call(b, obj, "split", vec![sep], result, ResultSpec::Type)
            },
        ),
        def(
            "string::Modulo",
            Kind::Modulo,
            "Formats the string with the given arguments.",
            |b| {
                let t0 = string(b);
                let q0 = b.qualified_type(t0, true);
                let t1 = b.type_any();
                let q1 = b.qualified_type(t1, true);
                let r = string_result(b);
                spec(vec![Operand::new(q0), Operand::new(q1)], r, ResultSpec::Type)
            },
        ),
    ]
}
