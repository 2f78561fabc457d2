//! Memory Bank File Types
//!
//! The fixed enumeration of known document types and the in-memory
//! representation of one loaded document. Each type maps to exactly one
//! relative path under the memory bank root; the mapping is validated at
//! core construction so a bad table can never reach the I/O layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::error::{BankError, BankResult};

/// Known memory bank document types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileType {
    ProjectBrief,
    ProductContext,
    ActiveContext,
    SystemPatterns,
    TechContext,
    ProgressCurrent,
    ProgressHistory,
    DecisionLog,
}

impl FileType {
    /// Every known file type, in load order
    pub const ALL: [FileType; 8] = [
        FileType::ProjectBrief,
        FileType::ProductContext,
        FileType::ActiveContext,
        FileType::SystemPatterns,
        FileType::TechContext,
        FileType::ProgressCurrent,
        FileType::ProgressHistory,
        FileType::DecisionLog,
    ];

    /// Convert to the identifier used by callers and frontmatter headers
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::ProjectBrief => "projectBrief",
            FileType::ProductContext => "productContext",
            FileType::ActiveContext => "activeContext",
            FileType::SystemPatterns => "systemPatterns",
            FileType::TechContext => "techContext",
            FileType::ProgressCurrent => "progressCurrent",
            FileType::ProgressHistory => "progressHistory",
            FileType::DecisionLog => "decisionLog",
        }
    }

    /// Parse from a caller-supplied identifier
    pub fn from_str(s: &str) -> BankResult<Self> {
        match s {
            "projectBrief" => Ok(FileType::ProjectBrief),
            "productContext" => Ok(FileType::ProductContext),
            "activeContext" => Ok(FileType::ActiveContext),
            "systemPatterns" => Ok(FileType::SystemPatterns),
            "techContext" => Ok(FileType::TechContext),
            "progressCurrent" => Ok(FileType::ProgressCurrent),
            "progressHistory" => Ok(FileType::ProgressHistory),
            "decisionLog" => Ok(FileType::DecisionLog),
            _ => Err(BankError::unknown_file_type(s)),
        }
    }

    /// Fixed relative path of this type under the memory bank root
    pub fn relative_path(&self) -> &'static str {
        match self {
            FileType::ProjectBrief => "projectBrief.md",
            FileType::ProductContext => "productContext.md",
            FileType::ActiveContext => "activeContext.md",
            FileType::SystemPatterns => "systemPatterns.md",
            FileType::TechContext => "techContext.md",
            FileType::ProgressCurrent => "progress/current.md",
            FileType::ProgressHistory => "progress/history.md",
            FileType::DecisionLog => "decisions/log.md",
        }
    }

    /// Find the type whose fixed path matches a relative identifier
    pub fn from_relative_path(relative: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.relative_path() == relative)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One loaded memory bank document.
///
/// Owned by the core; replaced, never mutated, on each successful update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryBankFile {
    /// Which known document this is
    pub file_type: FileType,
    /// Relative path under the root, derived from the type
    pub relative_path: String,
    /// Full UTF-8 content
    pub content: String,
    /// Timestamp of the last successful write or load
    pub last_updated: DateTime<Utc>,
}

impl MemoryBankFile {
    /// Build a fresh record for newly loaded or written content
    pub fn new(file_type: FileType, content: impl Into<String>) -> Self {
        Self {
            file_type,
            relative_path: file_type.relative_path().to_string(),
            content: content.into(),
            last_updated: Utc::now(),
        }
    }
}
