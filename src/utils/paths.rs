//! Path Validation
//!
//! Confines all file access to a configured root directory.
//! Every path handed to the I/O layer goes through [`PathValidator`] first;
//! validation is purely lexical and touches no filesystem state.

use std::path::{Component, Path, PathBuf};

use crate::models::file::FileType;
use crate::utils::error::{BankError, BankResult};

/// Get the user's home directory
pub fn home_dir() -> BankResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| BankError::internal("Could not determine home directory"))
}

/// Get the default memory bank root (~/.memory-bank/)
pub fn memory_bank_dir() -> BankResult<PathBuf> {
    Ok(home_dir()?.join(".memory-bank"))
}

/// Validates requested identifiers against a configured root directory.
///
/// Produces absolute paths guaranteed to resolve inside the root. Rejects
/// parent-directory segments, absolute prefixes, and embedded NUL bytes
/// before joining, then normalizes the combined path and re-checks that it
/// still starts with the normalized root.
#[derive(Debug, Clone)]
pub struct PathValidator {
    root: PathBuf,
}

impl PathValidator {
    /// Create a validator for the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: normalize(&root.into()),
        }
    }

    /// The normalized root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the fixed relative path of a known file type
    pub fn resolve_type(&self, file_type: FileType) -> BankResult<PathBuf> {
        self.resolve_relative(file_type.relative_path())
    }

    /// Resolve an arbitrary relative identifier inside the root
    pub fn resolve_relative(&self, relative: &str) -> BankResult<PathBuf> {
        if relative.is_empty() {
            return Err(BankError::invalid_path("empty identifier"));
        }
        if relative.contains('\0') {
            return Err(BankError::invalid_path(format!(
                "identifier contains NUL byte: {:?}",
                relative
            )));
        }

        let requested = Path::new(relative);
        if requested.is_absolute() {
            return Err(BankError::invalid_path(format!(
                "absolute paths are not allowed: {}",
                relative
            )));
        }
        for component in requested.components() {
            match component {
                Component::ParentDir => {
                    return Err(BankError::invalid_path(format!(
                        "parent directory segments are not allowed: {}",
                        relative
                    )));
                }
                Component::Prefix(_) | Component::RootDir => {
                    return Err(BankError::invalid_path(format!(
                        "absolute paths are not allowed: {}",
                        relative
                    )));
                }
                Component::CurDir | Component::Normal(_) => {}
            }
        }

        let joined = normalize(&self.root.join(requested));
        if !joined.starts_with(&self.root) {
            return Err(BankError::path_escape(format!(
                "{} resolves outside {}",
                relative,
                self.root.display()
            )));
        }

        Ok(joined)
    }
}

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding component without consulting the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(p) => out.push(p.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(Component::ParentDir.as_os_str());
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
