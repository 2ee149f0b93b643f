//! Constructor (literal) nodes.
//!
//! A ctor is a runtime literal: its first child slot holds the qualified type
//! it constructs, which starts out as `auto`/`unknown` for literals whose
//! type must be inferred (lists, tuples, structs) and is filled in by the
//! resolver or rewritten by ctor coercion.

use tern_common::Id;

use crate::arena::{NodeArena, NodeId};

/// Constructor variants and their child slot layouts.
#[derive(Clone, Debug)]
pub enum CtorKind {
    /// Children: `[type]`.
    Bool { value: bool },
    /// Children: `[type]`.
    SignedInteger { value: i64, width: u32 },
    /// Children: `[type]`.
    UnsignedInteger { value: u64, width: u32 },
    /// Children: `[type]`.
    Real { value: f64 },
    /// Children: `[type]`.
    String { value: String },
    /// Children: `[type]`.
    Bytes { value: Vec<u8> },
    /// Children: `[type]`. The enum type is a weak back-reference, attached
    /// once the resolver has initialized the enum's labels.
    Enum {
        label: Id,
        value: i64,
        enum_type: Option<NodeId>,
    },
    /// Children: `[type]`.
    Null,
    /// Children: `[type, value?]`.
    Optional,
    /// Children: `[type, value?]`.
    Result_,
    /// Children: `[type]`.
    Error { message: String },
    /// Children: `[type, elements...]`.
    List,
    /// Children: `[type, elements...]`.
    Set,
    /// Children: `[type, elements...]`.
    Vector,
    /// Children: `[type, k1, v1, k2, v2, ...]`.
    Map,
    /// Children: `[type, elements...]`.
    Tuple,
    /// Children: `[type, field_values...]`, parallel to `field_ids`.
    Struct { field_ids: Vec<Id> },
    /// Children: `[type, init?]`.
    StrongReference,
    /// Children: `[type, init?]`.
    WeakReference,
    /// Children: `[type, init?]`.
    ValueReference,
    /// A ctor rewritten by coercion; keeps the original around.
    /// Children: `[original, coerced]`.
    Coerced,
    /// Default-constructed instance. Children: `[type, args...]`.
    Default,
}

#[derive(Clone, Debug)]
pub struct CtorData {
    pub kind: CtorKind,
}

impl CtorData {
    pub fn new(kind: CtorKind) -> Self {
        CtorData { kind }
    }
}

pub const CTOR_TYPE: usize = 0;
pub const CTOR_FIRST_VALUE: usize = 1;
pub const COERCED_ORIGINAL: usize = 0;
pub const COERCED_NEW: usize = 1;

pub fn ctor<'a>(arena: &'a NodeArena, id: NodeId) -> Option<&'a CtorData> {
    arena.node(id).as_ctor()
}

/// The qualified type a ctor constructs.
pub fn ctor_type(arena: &NodeArena, id: NodeId) -> Option<NodeId> {
    match &ctor(arena, id)?.kind {
        CtorKind::Coerced => {
            let new = arena.child(id, COERCED_NEW)?;
            ctor_type(arena, new)
        }
        _ => arena.child(id, CTOR_TYPE),
    }
}

/// The value expressions of a sequence ctor (list/set/vector/tuple).
pub fn ctor_values(arena: &NodeArena, id: NodeId) -> Vec<NodeId> {
    arena.children(id)[CTOR_FIRST_VALUE.min(arena.children(id).len())..]
        .iter()
        .copied()
        .flatten()
        .collect()
}

/// Key/value pairs of a map ctor.
pub fn ctor_map_entries(arena: &NodeArena, id: NodeId) -> Vec<(NodeId, NodeId)> {
    let vals = ctor_values(arena, id);
    vals.chunks_exact(2).map(|p| (p[0], p[1])).collect()
}

/// Field id/value pairs of a struct ctor.
pub fn ctor_struct_fields(arena: &NodeArena, id: NodeId) -> Vec<(Id, NodeId)> {
    match &ctor(arena, id).map(|c| &c.kind) {
        Some(CtorKind::Struct { field_ids }) => field_ids
            .iter()
            .cloned()
            .zip(ctor_values(arena, id))
            .collect(),
        _ => Vec::new(),
    }
}
