//! Metadata Index Types
//!
//! Queryable metadata records derived from document frontmatter, plus the
//! filter type callers use to search them.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::file::FileType;

/// Result of checking a document against its type's schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    Invalid,
    Unknown,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Valid => "valid",
            ValidationStatus::Invalid => "invalid",
            ValidationStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One indexed document, keyed by its relative path.
///
/// Rebuilt whenever the underlying file's content changes. `updated` is
/// monotonic non-decreasing across rebuilds for the same path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Normalized title plus first 12 hex chars of the content SHA-256
    pub id: String,
    /// Relative path under the memory bank root
    pub relative_path: String,
    /// Known document type, if the header (or fixed path) names one
    pub file_type: Option<FileType>,
    /// Document title from the header, first heading, or file stem
    pub title: String,
    /// Tags declared in the header
    pub tags: BTreeSet<String>,
    /// Schema check result for the document's type
    pub validation: ValidationStatus,
    /// Content size in bytes
    pub size_bytes: u64,
    /// When the document was first indexed (or declared in its header)
    pub created: DateTime<Utc>,
    /// When the document last changed
    pub updated: DateTime<Utc>,
}

/// Derived ordering for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Most recently updated first
    RecentFirst,
    /// Largest content first
    LargestFirst,
}

/// Filter for [`MetadataIndex::query`](crate::services::index::MetadataIndex::query).
///
/// All populated fields must match; `tags` requires the entry to carry
/// every requested tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexQuery {
    /// Tags the entry must all carry
    #[serde(default)]
    pub tags: Vec<String>,
    /// Exact document type match
    #[serde(default)]
    pub file_type: Option<FileType>,
    /// Validation status match
    #[serde(default)]
    pub validation: Option<ValidationStatus>,
    /// Result ordering
    #[serde(default)]
    pub sort: Option<SortBy>,
    /// Maximum number of results
    #[serde(default)]
    pub limit: Option<usize>,
}

impl IndexQuery {
    /// Query entries carrying every one of the given tags
    pub fn with_tags(tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Query entries of one known type
    pub fn with_type(file_type: FileType) -> Self {
        Self {
            file_type: Some(file_type),
            ..Default::default()
        }
    }

    /// Derived view: most recently updated first, bounded by `limit`
    pub fn recent(limit: usize) -> Self {
        Self {
            sort: Some(SortBy::RecentFirst),
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Derived view: largest first, bounded by `limit`
    pub fn largest(limit: usize) -> Self {
        Self {
            sort: Some(SortBy::LargestFirst),
            limit: Some(limit),
            ..Default::default()
        }
    }
}
