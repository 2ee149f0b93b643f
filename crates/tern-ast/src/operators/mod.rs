//! The built-in operator catalog.
//!
//! Each submodule contributes the definitions for one type family;
//! `catalog()` collects them all for registration. Definitions are plain
//! data: shape helpers below build the recurring signature forms.

use crate::arena::NodeId;
use crate::builder::Builder;
use crate::operator::{OperatorDef, ResultSpec, SignatureSpec};
use crate::types::Operand;

mod bool_;
mod bytes;
mod containers;
mod enum_;
mod integer;
mod optional;
mod real;
mod reference;
mod string;
mod struct_;
mod tuple;

/// All built-in operator definitions.
pub fn catalog() -> Vec<OperatorDef> {
    let mut defs = Vec::new();
    defs.extend(integer::defs());
    defs.extend(real::defs());
    defs.extend(bool_::defs());
    defs.extend(string::defs());
    defs.extend(bytes::defs());
    defs.extend(enum_::defs());
    defs.extend(tuple::defs());
    defs.extend(optional::defs());
    defs.extend(reference::defs());
    defs.extend(containers::defs());
    defs.extend(struct_::defs());
    defs
}

// ===== Shared signature shapes =====

pub(crate) fn spec(
    operands: Vec<Operand>,
    result: NodeId,
    result_spec: ResultSpec,
) -> SignatureSpec {
    SignatureSpec {
        operands,
        result,
        result_spec,
    }
}

pub(crate) fn bool_result(b: &mut Builder<'_>) -> NodeId {
    let t = b.type_bool();
    b.qualified_type(t, true)
}

pub(crate) fn uint64_result(b: &mut Builder<'_>) -> NodeId {
    let t = b.type_uint(64);
    b.qualified_type(t, true)
}

pub(crate) fn void_result(b: &mut Builder<'_>) -> NodeId {
    let t = b.type_void();
    b.qualified_type(t, true)
}

pub(crate) fn string_result(b: &mut Builder<'_>) -> NodeId {
    let t = b.type_string();
    b.qualified_type(t, true)
}

/// A binary signature over one operand type; result is the first operand's
/// type.
pub(crate) fn binary_same(
    b: &mut Builder<'_>,
    mk: fn(&mut Builder<'_>) -> NodeId,
    is_const: bool,
) -> SignatureSpec {
    let t0 = mk(b);
    let q0 = b.qualified_type(t0, is_const);
    let t1 = mk(b);
    let q1 = b.qualified_type(t1, true);
    let r = void_result(b);
    spec(
        vec![Operand::new(q0), Operand::new(q1)],
        r,
        ResultSpec::Operand(0),
    )
}

/// A comparison signature over one operand type; result is `bool`.
pub(crate) fn compare(
    b: &mut Builder<'_>,
    mk: fn(&mut Builder<'_>) -> NodeId,
) -> SignatureSpec {
    let t0 = mk(b);
    let q0 = b.qualified_type(t0, true);
    let t1 = mk(b);
    let q1 = b.qualified_type(t1, true);
    let r = bool_result(b);
    spec(vec![Operand::new(q0), Operand::new(q1)], r, ResultSpec::Type)
}

/// A unary signature; result is the operand's type.
pub(crate) fn unary_same(
    b: &mut Builder<'_>,
    mk: fn(&mut Builder<'_>) -> NodeId,
    is_const: bool,
) -> SignatureSpec {
    let t0 = mk(b);
    let q0 = b.qualified_type(t0, is_const);
    let r = void_result(b);
    spec(vec![Operand::new(q0)], r, ResultSpec::Operand(0))
}

/// A `|x|` signature; result is `uint<64>`.
pub(crate) fn size_of(
    b: &mut Builder<'_>,
    mk: fn(&mut Builder<'_>) -> NodeId,
) -> SignatureSpec {
    let t0 = mk(b);
    let q0 = b.qualified_type(t0, true);
    let r = uint64_result(b);
    spec(vec![Operand::new(q0)], r, ResultSpec::Type)
}

/// A member-call signature: `object.method(args...)`.
pub(crate) fn member_call(
    b: &mut Builder<'_>,
    object: NodeId,
    method: &str,
    args: Vec<Operand>,
    result: NodeId,
    result_spec: ResultSpec,
) -> SignatureSpec {
    let member_t = b.type_member(method);
    let member_q = b.qualified_type(member_t, true);
    let args_t = b.type_operand_list(args);
    let args_q = b.qualified_type(args_t, true);
    spec(
        vec![
            Operand::new(object),
            Operand::new(member_q),
            Operand::new(args_q),
        ],
        result,
        result_spec,
    )
}
