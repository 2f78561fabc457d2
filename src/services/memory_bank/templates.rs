//! Built-in Document Templates
//!
//! Default content used by repair-on-read when a required document is
//! missing from disk. The engine treats templates as opaque strings; a host
//! can swap in its own provider at construction time.

use crate::models::file::FileType;

/// Supplies default content per file type.
///
/// Consumed only during repair-on-read creation.
pub trait TemplateProvider: Send + Sync {
    fn template_for(&self, file_type: FileType) -> String;
}

/// Built-in markdown templates, one per known type.
///
/// Each carries a frontmatter header declaring its type and the heading its
/// schema check expects, so freshly created files index and validate clean.
#[derive(Debug, Default)]
pub struct DefaultTemplates;

impl TemplateProvider for DefaultTemplates {
    fn template_for(&self, file_type: FileType) -> String {
        let body = match file_type {
            FileType::ProjectBrief => {
                "# Project Brief\n\n## Purpose\n\n_What this project is and why it exists._\n\n## Goals\n\n-\n\n## Scope\n\n-\n"
            }
            FileType::ProductContext => {
                "# Product Context\n\n## Problem\n\n_The problem this product solves._\n\n## Users\n\n-\n\n## Experience Goals\n\n-\n"
            }
            FileType::ActiveContext => {
                "# Active Context\n\n## Current Focus\n\n-\n\n## Recent Changes\n\n-\n\n## Next Steps\n\n-\n"
            }
            FileType::SystemPatterns => {
                "# System Patterns\n\n## Architecture\n\n-\n\n## Key Decisions\n\n-\n\n## Component Relationships\n\n-\n"
            }
            FileType::TechContext => {
                "# Tech Context\n\n## Stack\n\n-\n\n## Constraints\n\n-\n\n## Tooling\n\n-\n"
            }
            FileType::ProgressCurrent => {
                "# Progress\n\n## Working\n\n-\n\n## In Flight\n\n-\n\n## Known Issues\n\n-\n"
            }
            FileType::ProgressHistory => {
                "# Progress History\n\n## Milestones\n\n-\n"
            }
            FileType::DecisionLog => {
                "# Decision Log\n\n## Decisions\n\n| Date | Decision | Rationale |\n| ---- | -------- | --------- |\n"
            }
        };

        format!(
            "---\ntitle: {}\ntype: {}\ntags: [memory-bank]\n---\n\n{}",
            title_for(file_type),
            file_type.as_str(),
            body
        )
    }
}

fn title_for(file_type: FileType) -> &'static str {
    match file_type {
        FileType::ProjectBrief => "Project Brief",
        FileType::ProductContext => "Product Context",
        FileType::ActiveContext => "Active Context",
        FileType::SystemPatterns => "System Patterns",
        FileType::TechContext => "Tech Context",
        FileType::ProgressCurrent => "Progress",
        FileType::ProgressHistory => "Progress History",
        FileType::DecisionLog => "Decision Log",
    }
}
