//! Operators on optional values.

use super::spec;
use crate::builder::Builder;
use crate::operator::{Kind, OperatorDef, Priority, ResultSpec, SignatureSpec};
use crate::types::Operand;

fn deref(b: &mut Builder<'_>) -> SignatureSpec {
    let t0 = b.type_optional_wildcard();
    let q0 = b.qualified_type(t0, true);
    let r = super::void_result(b);
    spec(vec![Operand::new(q0)], r, ResultSpec::DereferencedOf(0))
}

pub(super) fn defs() -> Vec<OperatorDef> {
    vec![OperatorDef {
        name: "optional::Deref",
        kind: Kind::Deref,
        priority: Priority::Normal,
        ns: "optional",
        doc: "Returns the optional's value, or throws if unset.",
        signature: deref,
    }]
}
