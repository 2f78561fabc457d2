//! Data Models
//!
//! Shared data types for the engine: file types, loaded documents, and
//! index metadata.

pub mod file;
pub mod metadata;

pub use file::{FileType, MemoryBankFile};
pub use metadata::{IndexQuery, MetadataEntry, SortBy, ValidationStatus};
