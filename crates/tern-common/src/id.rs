//! Hierarchical identifiers.
//!
//! An `Id` is a `::`-separated path such as `Mod::Type::member`. The last
//! component is the *local* part; everything before it is the *namespace*.
//! Scope lookup splits qualified ids one component at a time, and canonical
//! ids are built by joining.

use serde::{Deserialize, Serialize};

/// Separator between path components.
pub const SEPARATOR: &str = "::";

/// A hierarchical identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Id(String);

impl Id {
    pub fn new(s: impl Into<String>) -> Self {
        Id(s.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path component.
    pub fn local(&self) -> Id {
        match self.0.rfind(SEPARATOR) {
            Some(i) => Id(self.0[i + SEPARATOR.len()..].to_string()),
            None => self.clone(),
        }
    }

    /// Everything before the last path component; empty if unqualified.
    pub fn namespace(&self) -> Id {
        match self.0.rfind(SEPARATOR) {
            Some(i) => Id(self.0[..i].to_string()),
            None => Id::default(),
        }
    }

    /// True if the id has more than one component.
    pub fn is_qualified(&self) -> bool {
        self.0.contains(SEPARATOR)
    }

    /// The first path component.
    pub fn first(&self) -> Id {
        match self.0.find(SEPARATOR) {
            Some(i) => Id(self.0[..i].to_string()),
            None => self.clone(),
        }
    }

    /// Everything after the first path component; empty if unqualified.
    pub fn rest(&self) -> Id {
        match self.0.find(SEPARATOR) {
            Some(i) => Id(self.0[i + SEPARATOR.len()..].to_string()),
            None => Id::default(),
        }
    }

    /// Appends a component, returning the joined id.
    pub fn join(&self, other: &Id) -> Id {
        if self.is_empty() {
            other.clone()
        } else if other.is_empty() {
            self.clone()
        } else {
            Id(format!("{}{}{}", self.0, SEPARATOR, other.0))
        }
    }

    /// All path components, in order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id(s)
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "tests/id.rs"]
mod tests;
