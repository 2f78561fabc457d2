//! Memory Bank Core - Storage Engine Library
//!
//! This library provides the storage, caching, and indexing engine for a
//! memory bank: a small set of structured knowledge documents persisted
//! under one root directory. It includes:
//! - Path validation confined to the configured root
//! - A retrying file I/O layer with atomic replace
//! - An LRU + staleness-aware content cache with statistics
//! - A metadata index searchable by tag, type, validation state,
//!   recency, and size
//! - The orchestration core with repair-on-read loading and aggregate
//!   health reporting
//!
//! Protocol/tool registration and UI integration live outside this crate
//! and call in through [`MemoryBankCore`].

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use models::file::{FileType, MemoryBankFile};
pub use models::metadata::{IndexQuery, MetadataEntry, SortBy, ValidationStatus};
pub use services::cache::{CacheConfig, CacheStats};
pub use services::index::validation::SchemaCheck;
pub use services::index::MetadataIndex;
pub use services::memory_bank::health::{HealthProblem, HealthReport};
pub use services::memory_bank::templates::{DefaultTemplates, TemplateProvider};
pub use services::memory_bank::{MemoryBankConfig, MemoryBankCore};
pub use storage::{FileOperations, FileStat, RetryPolicy};
pub use utils::error::{BankError, BankResult};
pub use utils::paths::PathValidator;
