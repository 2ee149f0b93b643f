//! Declaration attributes.
//!
//! Attributes are string-keyed tags with an optional expression value,
//! grouped under `AttributeSet` nodes attached to declarations.

use crate::arena::{NodeArena, NodeId};
use crate::ctor::CtorKind;
use crate::expr::ExprKind;

// Tags recognized by the core.
pub const CXXNAME: &str = "&cxxname";
pub const ON_HEAP: &str = "&on-heap";
pub const OPTIONAL: &str = "&optional";
pub const DEFAULT: &str = "&default";
pub const INTERNAL: &str = "&internal";
pub const STATIC: &str = "&static";
pub const NO_EMIT: &str = "&no-emit";
pub const NOSUB: &str = "&nosub";
pub const ALIAS: &str = "&alias";

/// Payload of an `Attribute` node. The value, if any, is child 0.
#[derive(Clone, Debug)]
pub struct AttributeData {
    /// Name of the attribute, including the leading `&`.
    pub tag: String,
}

pub fn attribute<'a>(arena: &'a NodeArena, id: NodeId) -> Option<&'a AttributeData> {
    match &arena.node(id).kind {
        crate::node::NodeKind::Attribute(a) => Some(a),
        _ => None,
    }
}

/// Whether the attribute carries a value expression.
pub fn has_value(arena: &NodeArena, id: NodeId) -> bool {
    arena.child(id, 0).is_some()
}

/// The attribute's value as an expression node.
pub fn value_as_expression(arena: &NodeArena, id: NodeId) -> Result<NodeId, String> {
    match arena.child(id, 0) {
        Some(v) if arena.node(v).as_expr().is_some() => Ok(v),
        Some(_) => Err(format!(
            "attribute '{}' value is not an expression",
            attribute(arena, id).map(|a| a.tag.as_str()).unwrap_or("?")
        )),
        None => Err(format!(
            "attribute '{}' requires an argument",
            attribute(arena, id).map(|a| a.tag.as_str()).unwrap_or("?")
        )),
    }
}

/// The attribute's value as a string; the value must be a string ctor
/// expression.
pub fn value_as_string(arena: &NodeArena, id: NodeId) -> Result<String, String> {
    let v = value_as_expression(arena, id)?;
    if let Some(e) = arena.node(v).as_expr() {
        if matches!(e.kind, ExprKind::Ctor) {
            if let Some(c) = arena.child(v, 0).and_then(|c| arena.node(c).as_ctor()) {
                if let CtorKind::String { value } = &c.kind {
                    return Ok(value.clone());
                }
            }
        }
    }
    Err("attribute value must be a string constant".to_string())
}

/// The attribute's value as an integer; the value must be an integer ctor
/// expression.
pub fn value_as_integer(arena: &NodeArena, id: NodeId) -> Result<i64, String> {
    let v = value_as_expression(arena, id)?;
    if let Some(c) = arena.child(v, 0).and_then(|c| arena.node(c).as_ctor()) {
        match &c.kind {
            CtorKind::SignedInteger { value, .. } => return Ok(*value),
            CtorKind::UnsignedInteger { value, .. } => {
                return i64::try_from(*value)
                    .map_err(|_| "attribute value out of range".to_string());
            }
            _ => {}
        }
    }
    Err("attribute value must be an integer constant".to_string())
}

/// Finds an attribute with the given tag inside an `AttributeSet` node.
pub fn find(arena: &NodeArena, set: NodeId, tag: &str) -> Option<NodeId> {
    arena
        .children(set)
        .iter()
        .copied()
        .flatten()
        .find(|&a| attribute(arena, a).is_some_and(|d| d.tag == tag))
}

/// Finds an attribute by tag on an optional attribute set.
pub fn find_on(arena: &NodeArena, set: Option<NodeId>, tag: &str) -> Option<NodeId> {
    set.and_then(|s| find(arena, s, tag))
}
