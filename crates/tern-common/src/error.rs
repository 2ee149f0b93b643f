//! Error records attached to AST nodes.
//!
//! Errors are data, not control flow: passes attach them to nodes, and the
//! validator later collects, filters and reports them. Reporting is tiered by
//! priority so that a single high-priority failure suppresses the cascade of
//! follow-on diagnostics it would otherwise cause.

use serde::{Deserialize, Serialize};

use crate::span::Location;

/// Importance of reporting an error, relative to others.
///
/// `NoError` is a comparison floor used while folding priorities over a
/// subtree; no actual error carries it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorPriority {
    /// Place-holder for comparison if no error was encountered.
    #[default]
    NoError = 0,
    /// Reported only if there are no higher priority errors.
    Low = 1,
    /// Reported only if there are no high priority errors.
    Normal = 2,
    /// Always reported.
    High = 3,
}

/// Error information associated with a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstError {
    /// Main error message to report.
    pub message: String,
    /// Location associated with the error.
    pub location: Location,
    /// Additional lines to print along with the error as context.
    pub context: Vec<String>,
    /// Priority of the error.
    pub priority: ErrorPriority,
}

impl AstError {
    pub fn new(message: impl Into<String>) -> Self {
        AstError {
            message: message.into(),
            location: Location::default(),
            context: Vec::new(),
            priority: ErrorPriority::Normal,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_priority(mut self, priority: ErrorPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }

    /// Key used to de-duplicate reported errors.
    pub fn dedup_key(&self) -> (&str, &Location) {
        (&self.message, &self.location)
    }
}

// Ordering considers message & location only, so reported sets can be
// uniqued on those two.
impl PartialOrd for AstError {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AstError {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.message, &self.location).cmp(&(&other.message, &other.location))
    }
}

impl std::fmt::Display for AstError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.location.is_set() {
            write!(f, "{}: {}", self.location, self.message)?;
        } else {
            f.write_str(&self.message)?;
        }

        for line in &self.context {
            write!(f, "\n  {line}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/error.rs"]
mod tests;
