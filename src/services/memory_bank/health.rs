//! Health Reporting
//!
//! Aggregated health state for the memory bank. Problems are collected
//! across every known type and reported together instead of stopping at
//! the first failure.

use serde::{Deserialize, Serialize};

use crate::models::file::FileType;

/// One document that exists but could not be read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthProblem {
    pub file_type: FileType,
    /// Error text from the failed read
    pub detail: String,
}

/// Aggregate health of the memory bank store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// True when every known type is present and loadable
    pub healthy: bool,
    /// How many types were checked
    pub checked: usize,
    /// Types with no file on disk
    pub missing: Vec<FileType>,
    /// Types whose file exists but failed to load
    pub unreadable: Vec<HealthProblem>,
}

impl HealthReport {
    /// Build a report from collected problems
    pub fn new(checked: usize, missing: Vec<FileType>, unreadable: Vec<HealthProblem>) -> Self {
        Self {
            healthy: missing.is_empty() && unreadable.is_empty(),
            checked,
            missing,
            unreadable,
        }
    }

    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        if self.healthy {
            return format!(
                "memory bank healthy: {} files present and loadable",
                self.checked
            );
        }

        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            let names: Vec<&str> = self.missing.iter().map(|t| t.as_str()).collect();
            parts.push(format!("missing: {}", names.join(", ")));
        }
        if !self.unreadable.is_empty() {
            let names: Vec<String> = self
                .unreadable
                .iter()
                .map(|p| format!("{} ({})", p.file_type, p.detail))
                .collect();
            parts.push(format!("unreadable: {}", names.join(", ")));
        }
        format!("memory bank unhealthy: {}", parts.join("; "))
    }
}
