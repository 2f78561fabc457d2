//! Content Schema Checks
//!
//! Pluggable per-type validation for indexed documents. Validation is
//! advisory: a failing check marks the entry `invalid` but never blocks a
//! read or write.

use crate::models::file::FileType;
use crate::models::metadata::ValidationStatus;

/// Schema check applied while indexing a document.
///
/// Documents of unknown type always validate as `Unknown`, never `Invalid`.
pub trait SchemaCheck: Send + Sync {
    fn check(&self, file_type: Option<FileType>, content: &str) -> ValidationStatus;
}

/// Default rule set: each known type must carry its expected top-level
/// heading and a non-empty body.
#[derive(Debug, Default)]
pub struct HeadingSchemaCheck;

impl HeadingSchemaCheck {
    /// The level-1 heading each known type is expected to carry
    pub fn required_heading(file_type: FileType) -> &'static str {
        match file_type {
            FileType::ProjectBrief => "# Project Brief",
            FileType::ProductContext => "# Product Context",
            FileType::ActiveContext => "# Active Context",
            FileType::SystemPatterns => "# System Patterns",
            FileType::TechContext => "# Tech Context",
            FileType::ProgressCurrent => "# Progress",
            FileType::ProgressHistory => "# Progress History",
            FileType::DecisionLog => "# Decision Log",
        }
    }
}

impl SchemaCheck for HeadingSchemaCheck {
    fn check(&self, file_type: Option<FileType>, content: &str) -> ValidationStatus {
        let Some(file_type) = file_type else {
            return ValidationStatus::Unknown;
        };
        if content.trim().is_empty() {
            return ValidationStatus::Invalid;
        }
        let heading = Self::required_heading(file_type);
        if content.lines().any(|line| line.trim() == heading) {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Invalid
        }
    }
}
