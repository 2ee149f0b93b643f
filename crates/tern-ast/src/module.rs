//! Module identity.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use tern_common::Id;

/// Globally unique ID for a module that can be used to name it unambiguously.
///
/// Equality and hashing use all four fields. `path` is synthetic when the
/// module has no on-disk source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleUid {
    /// Module name.
    pub id: Id,
    /// Path to the module's source code on disk; a unique place-holder if no
    /// file exists.
    pub path: PathBuf,
    /// Language extension determining how to *parse* this module, usually
    /// derived from the file name.
    pub parse_extension: String,
    /// Language extension determining how to process this module *after*
    /// parsing.
    pub process_extension: String,
}

impl ModuleUid {
    /// UID for a module with an on-disk source.
    pub fn from_path(id: Id, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ext = extension_of(&path);
        ModuleUid {
            id,
            path,
            parse_extension: ext.clone(),
            process_extension: ext,
        }
    }

    /// UID for a module without an on-disk source; `counter` must be unique
    /// within the process (the compilation context provides it).
    pub fn synthetic(
        id: Id,
        parse_extension: impl Into<String>,
        process_extension: impl Into<String>,
        counter: u64,
    ) -> Self {
        let parse_extension = parse_extension.into();
        let process_extension = process_extension.into();
        let path = PathBuf::from(format!(
            "/tmp/tern/{id}.{counter}.{process_extension}.{parse_extension}"
        ));
        ModuleUid {
            id,
            path,
            parse_extension,
            process_extension,
        }
    }

    fn hash_value(&self) -> u64 {
        let mut h = std::hash::DefaultHasher::new();
        self.hash(&mut h);
        h.finish()
    }

    /// Textual form used in error messages and debug streams; unique enough.
    pub fn text(&self) -> String {
        format!("{}_{:x}", self.id, self.hash_value() % 0xfff)
    }
}

impl std::fmt::Display for ModuleUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}

/// The extension of a path including the leading dot, or empty.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}
