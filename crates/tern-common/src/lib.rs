//! Shared leaf types for the Tern compiler.
//!
//! This crate provides:
//! - `Span` / `Location` - Source location tracking for AST nodes and diagnostics
//! - `Id` - Hierarchical (`::`-separated) identifiers
//! - `AstError` / `ErrorPriority` - Error records attached to AST nodes
//! - `internal_error!` - The abort channel for compiler-internal failures

pub mod error;
pub mod id;
pub mod span;

pub use error::{AstError, ErrorPriority};
pub use id::Id;
pub use span::{Location, Span};

/// Aborts on a compiler-internal failure.
///
/// User-visible errors are never routed through here; they are attached to
/// nodes as `AstError` records. This macro is for conditions that indicate a
/// bug in the compiler itself (non-terminating fixed point, impossible
/// variant), matching the single dedicated abort channel the pipeline uses.
#[macro_export]
macro_rules! internal_error {
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        tracing::error!(target: "compiler", "internal error: {msg}");
        panic!("internal error: {msg}");
    }};
}
