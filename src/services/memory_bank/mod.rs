//! Memory Bank Core
//!
//! Orchestration over the validator, file operations, cache, and index.
//! Guarantees every required document exists and is loadable
//! (repair-on-read), serves typed get/update operations, and keeps cache
//! and index in sync with every write so no stale state is observable
//! after an operation returns.
//!
//! The core is an explicitly constructed instance with injected
//! collaborators; it owns no global state and spawns no background tasks.

pub mod health;
pub mod templates;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::file::{FileType, MemoryBankFile};
use crate::models::metadata::{IndexQuery, MetadataEntry};
use crate::services::cache::{CacheConfig, CacheManager, CacheStats};
use crate::services::index::MetadataIndex;
use crate::storage::{FileOperations, RetryPolicy};
use crate::utils::error::{BankError, BankResult};
use crate::utils::paths::PathValidator;
use health::{HealthProblem, HealthReport};
use templates::{DefaultTemplates, TemplateProvider};

/// Standard subdirectories created under the root
const SUBDIRS: [&str; 3] = ["progress", "decisions", "notes"];

/// Construction-time configuration for the engine
#[derive(Debug, Clone)]
pub struct MemoryBankConfig {
    /// Root directory all documents live under
    pub root: PathBuf,
    pub cache: CacheConfig,
    pub retry: RetryPolicy,
}

impl MemoryBankConfig {
    /// Configuration with default cache and retry settings
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: CacheConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// The storage/caching/indexing engine over one memory bank root
pub struct MemoryBankCore {
    validator: PathValidator,
    ops: Arc<FileOperations>,
    cache: CacheManager,
    index: MetadataIndex,
    files: RwLock<HashMap<FileType, MemoryBankFile>>,
    templates: Box<dyn TemplateProvider>,
}

impl MemoryBankCore {
    /// Create an engine with the built-in templates
    pub fn new(config: MemoryBankConfig) -> BankResult<Self> {
        Self::with_templates(config, Box::new(DefaultTemplates))
    }

    /// Create an engine with a caller-supplied template provider.
    ///
    /// The fixed type-to-path table is validated against the root here, so
    /// a bad mapping fails construction instead of a later operation.
    pub fn with_templates(
        config: MemoryBankConfig,
        templates: Box<dyn TemplateProvider>,
    ) -> BankResult<Self> {
        let validator = PathValidator::new(config.root);
        for file_type in FileType::ALL {
            validator.resolve_type(file_type)?;
        }

        let ops = Arc::new(FileOperations::new(config.retry));
        let cache = CacheManager::new(Arc::clone(&ops), config.cache);

        Ok(Self {
            validator,
            ops,
            cache,
            index: MetadataIndex::new(),
            files: RwLock::new(HashMap::new()),
            templates,
        })
    }

    /// The root directory this engine manages
    pub fn root(&self) -> &Path {
        self.validator.root()
    }

    /// Ensure the root and standard subdirectories exist; idempotent
    pub async fn initialize_folders(&self) -> BankResult<()> {
        self.ops.mkdir(self.validator.root()).await?;
        for subdir in SUBDIRS {
            let path = self.validator.resolve_relative(subdir)?;
            self.ops.mkdir(&path).await?;
        }
        Ok(())
    }

    /// Load every known document, creating missing ones from templates.
    ///
    /// Returns the types that had to be created; an empty list means the
    /// store was already complete. The store self-heals here rather than
    /// failing on partial initialization.
    pub async fn load_files(&self) -> BankResult<Vec<FileType>> {
        let mut created = Vec::new();
        let mut loaded = Vec::new();

        for file_type in FileType::ALL {
            let path = self.validator.resolve_type(file_type)?;
            match self.cache.get(&path).await {
                Ok(content) => {
                    self.index.upsert(file_type.relative_path(), &content).await;
                    loaded.push(MemoryBankFile::new(file_type, content));
                }
                Err(BankError::NotFound(_)) => {
                    let content = self.templates.template_for(file_type);
                    self.ops.write(&path, &content).await?;
                    self.cache.put(&path, &content).await?;
                    self.index.upsert(file_type.relative_path(), &content).await;
                    loaded.push(MemoryBankFile::new(file_type, content));
                    created.push(file_type);
                    tracing::info!("created {} from template", file_type);
                }
                Err(err) => return Err(err),
            }
        }

        let mut files = self.files.write().await;
        for file in loaded {
            files.insert(file.file_type, file);
        }
        Ok(created)
    }

    /// Get the in-memory document for a type, if `load_files` has run.
    ///
    /// Deliberately does not lazy-load: callers pay the batch startup cost
    /// once via `load_files`, then query from memory.
    pub async fn get_file(&self, file_type: FileType) -> Option<MemoryBankFile> {
        self.files.read().await.get(&file_type).cloned()
    }

    /// Replace a known document's content.
    ///
    /// Validates the path, writes atomically, then updates cache, index,
    /// and the in-memory arena before returning, so the next `get_file`
    /// sees exactly this content.
    pub async fn update_file(
        &self,
        file_type: FileType,
        content: impl Into<String>,
    ) -> BankResult<MemoryBankFile> {
        let content = content.into();
        let path = self.validator.resolve_type(file_type)?;

        self.ops.write(&path, &content).await?;
        self.cache.put(&path, &content).await?;
        self.index.upsert(file_type.relative_path(), &content).await;

        let file = MemoryBankFile::new(file_type, content);
        self.files.write().await.insert(file_type, file.clone());
        Ok(file)
    }

    /// Write an arbitrary relative path under the root (e.g. ad hoc notes).
    ///
    /// Same write-through discipline as `update_file`. When the path is one
    /// of the fixed type paths, the in-memory document is refreshed too.
    pub async fn write_file_by_path(
        &self,
        relative_path: &str,
        content: impl Into<String>,
    ) -> BankResult<MetadataEntry> {
        let content = content.into();
        let path = self.validator.resolve_relative(relative_path)?;
        let normalized = self.normalized_relative(&path)?;

        self.ops.write(&path, &content).await?;
        self.cache.put(&path, &content).await?;
        let entry = self.index.upsert(&normalized, &content).await;

        if let Some(file_type) = FileType::from_relative_path(&normalized) {
            let file = MemoryBankFile::new(file_type, content);
            self.files.write().await.insert(file_type, file);
        }
        Ok(entry)
    }

    /// Verify every known type is present and loadable.
    ///
    /// Collects all problems into one report instead of stopping at the
    /// first; never repairs (that is `load_files`' job).
    pub async fn check_health(&self) -> BankResult<HealthReport> {
        let mut missing = Vec::new();
        let mut unreadable = Vec::new();

        for file_type in FileType::ALL {
            let path = self.validator.resolve_type(file_type)?;
            match self.ops.stat(&path).await {
                Ok(_) => {
                    if let Err(err) = self.ops.read(&path).await {
                        unreadable.push(HealthProblem {
                            file_type,
                            detail: err.to_string(),
                        });
                    }
                }
                Err(BankError::NotFound(_)) => missing.push(file_type),
                Err(err) => unreadable.push(HealthProblem {
                    file_type,
                    detail: err.to_string(),
                }),
            }
        }

        let report = HealthReport::new(FileType::ALL.len(), missing, unreadable);
        if !report.healthy {
            tracing::warn!("{}", report.summary());
        }
        Ok(report)
    }

    /// Query the metadata index
    pub async fn search(&self, query: &IndexQuery) -> Vec<MetadataEntry> {
        self.index.query(query).await
    }

    /// Look up the index entry for one relative path
    pub async fn metadata(&self, relative_path: &str) -> Option<MetadataEntry> {
        self.index.get(relative_path).await
    }

    /// Rebuild the index from every tracked file on disk.
    ///
    /// Documents that have disappeared drop out of the index; unreadable
    /// ones are skipped with a warning. Returns the number of indexed
    /// documents.
    pub async fn reindex_all(&self) -> BankResult<usize> {
        let mut documents: Vec<(String, String)> = Vec::new();

        let mut paths: Vec<String> = FileType::ALL
            .iter()
            .map(|t| t.relative_path().to_string())
            .collect();
        for entry in self.index.query(&IndexQuery::default()).await {
            if FileType::from_relative_path(&entry.relative_path).is_none() {
                paths.push(entry.relative_path);
            }
        }

        for relative_path in paths {
            let path = self.validator.resolve_relative(&relative_path)?;
            match self.ops.read(&path).await {
                Ok(content) => documents.push((relative_path, content)),
                Err(BankError::NotFound(_)) => {}
                Err(err) => {
                    tracing::warn!("skipping {} during reindex: {}", relative_path, err);
                }
            }
        }

        let count = documents.len();
        self.index.rebuild_all(documents).await;
        Ok(count)
    }

    /// Drop one cached path, or the whole cache
    pub async fn invalidate_cache(&self, relative_path: Option<&str>) -> BankResult<()> {
        match relative_path {
            Some(relative) => {
                let path = self.validator.resolve_relative(relative)?;
                self.cache.invalidate(Some(&path)).await;
            }
            None => self.cache.invalidate(None).await,
        }
        Ok(())
    }

    /// Snapshot the cache counters
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Zero the cache counters
    pub async fn reset_cache_stats(&self) {
        self.cache.reset_stats().await;
    }

    /// Root-relative form of a validated absolute path, with `/` separators
    fn normalized_relative(&self, path: &Path) -> BankResult<String> {
        let relative = path.strip_prefix(self.validator.root()).map_err(|_| {
            BankError::path_escape(format!(
                "{} resolves outside {}",
                path.display(),
                self.validator.root().display()
            ))
        })?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(parts.join("/"))
    }
}
