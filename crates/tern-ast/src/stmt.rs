//! Statement nodes.

use crate::arena::{NodeArena, NodeId};

/// Statement variants and their child slot layouts.
#[derive(Clone, Debug)]
pub enum StmtKind {
    /// Children: statements.
    Block,
    /// A declaration in statement position. Children: `[decl]`.
    Declaration,
    /// Children: `[expr]`.
    Expression,
    /// Children: `[init_decl?, condition, true_block, else_block?]`.
    If,
    /// Children: `[init_decl?, condition, body, else_block?]`.
    While,
    /// Children: `[local_decl, sequence, body]`.
    For,
    /// Children: `[expr?]`.
    Return,
    /// Children: `[condition_decl, cases...]`.
    Switch,
    /// Children: `[body, expressions...]`.
    SwitchCase { default: bool },
    /// Children: `[body, catches...]`.
    Try,
    /// Children: `[parameter?, body]`.
    Catch,
    /// Children: `[expr?]`.
    Throw,
    /// Children: `[condition, message?]`.
    Assert { expects_exception: bool },
    Break,
    Continue,
}

#[derive(Clone, Debug)]
pub struct StmtData {
    pub kind: StmtKind,
}

impl StmtData {
    pub fn new(kind: StmtKind) -> Self {
        StmtData { kind }
    }
}

// Child slot indices.
pub const IF_INIT: usize = 0;
pub const IF_CONDITION: usize = 1;
pub const IF_TRUE: usize = 2;
pub const IF_ELSE: usize = 3;
pub const WHILE_INIT: usize = 0;
pub const WHILE_CONDITION: usize = 1;
pub const WHILE_BODY: usize = 2;
pub const WHILE_ELSE: usize = 3;
pub const FOR_LOCAL: usize = 0;
pub const FOR_SEQUENCE: usize = 1;
pub const FOR_BODY: usize = 2;
pub const SWITCH_CONDITION: usize = 0;
pub const CATCH_PARAMETER: usize = 0;
pub const CATCH_BODY: usize = 1;
pub const TRY_BODY: usize = 0;

pub fn stmt<'a>(arena: &'a NodeArena, id: NodeId) -> Option<&'a StmtData> {
    arena.node(id).as_stmt()
}

/// True if a block contains at least one declaration statement, which makes
/// it scope-introducing.
pub fn block_has_declarations(arena: &NodeArena, block: NodeId) -> bool {
    arena.children(block).iter().copied().flatten().any(|s| {
        matches!(
            stmt(arena, s).map(|d| &d.kind),
            Some(StmtKind::Declaration)
        )
    })
}
