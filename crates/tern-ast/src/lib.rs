//! AST core of the Tern compiler.
//!
//! This crate provides:
//! - `NodeArena` / `NodeId` - Arena-backed polymorphic node graph with parent
//!   links, metadata, per-node errors, and lexical scopes
//! - The type system: type variants, predicates, and resolution state
//! - Declarations, expressions, statements, constructors, and attributes
//! - `Scope` and hierarchical identifier lookup
//! - The per-context operator `Registry` with the built-in catalog
//! - `Builder` - The node construction API
//! - `AstContext` - Compilation context with module import and dependency
//!   tracking
//! - `Plugin` / `PluginRegistry` - The parse/hook surface the pipeline calls

pub mod arena;
pub mod attribute;
pub mod builder;
pub mod context;
pub mod ctor;
pub mod decl;
pub mod expr;
pub mod module;
pub mod node;
pub mod operator;
pub mod operators;
pub mod plugin;
pub mod print;
pub mod registry;
pub mod scope;
pub mod stmt;
pub mod traversal;
pub mod types;

pub use arena::{NodeArena, NodeId};
pub use builder::Builder;
pub use context::{AstContext, CompilerOptions};
pub use module::ModuleUid;
pub use node::{Meta, Node, NodeKind};
pub use plugin::{Plugin, PluginRegistry};
pub use registry::Registry;
pub use scope::{LookupError, LookupResult, Scope};
