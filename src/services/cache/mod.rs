//! Content Cache
//!
//! LRU cache of file content keyed by absolute path, with mtime-based
//! staleness detection, optional TTL, and hit/miss/eviction statistics.
//!
//! Every call takes the single internal lock for its whole duration,
//! including the I/O it triggers, so interleaved callers cannot observe a
//! torn entry or an inconsistent counter, and a write that completed before
//! a get is always visible to it.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::storage::FileOperations;
use crate::utils::error::{BankError, BankResult};

/// Cache sizing and freshness configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries before LRU eviction kicks in
    pub max_size: usize,
    /// Entries untouched for longer than this reload on next access,
    /// even when the on-disk mtime is unchanged
    pub max_age: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 64,
            max_age: None,
        }
    }
}

/// Aggregate cache counters.
///
/// Reset only by an explicit [`CacheManager::reset_stats`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub reloads: u64,
    /// Distinct paths loaded since the last stats reset
    pub total_files: u64,
    /// Entries currently held
    pub current_size: usize,
    pub max_size: usize,
    /// hits / (hits + misses); 0.0 when there have been no accesses
    pub hit_rate: f64,
    pub last_reset: DateTime<Utc>,
}

/// One cached file
#[derive(Debug, Clone)]
struct CacheEntry {
    content: String,
    /// On-disk mtime observed at the most recent successful read
    mtime_ms: i64,
    /// LRU ordinal; larger means more recently accessed
    last_accessed: u64,
    access_count: u64,
    /// Wall-clock moment of the last access, for TTL expiry
    touched_at: Instant,
}

#[derive(Debug)]
struct CacheInner {
    entries: HashMap<PathBuf, CacheEntry>,
    /// Distinct paths loaded since the last reset
    seen: HashSet<PathBuf>,
    hits: u64,
    misses: u64,
    evictions: u64,
    reloads: u64,
    /// Logical clock backing the LRU ordering
    clock: u64,
    last_reset: DateTime<Utc>,
}

impl CacheInner {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            seen: HashSet::new(),
            hits: 0,
            misses: 0,
            evictions: 0,
            reloads: 0,
            clock: 0,
            last_reset: Utc::now(),
        }
    }
}

/// Staleness-aware LRU cache in front of the file operations layer
pub struct CacheManager {
    inner: Mutex<CacheInner>,
    ops: Arc<FileOperations>,
    config: CacheConfig,
}

impl CacheManager {
    /// Create a cache over the given file operations layer
    pub fn new(ops: Arc<FileOperations>, config: CacheConfig) -> Self {
        Self {
            inner: Mutex::new(CacheInner::new()),
            ops,
            config,
        }
    }

    /// Get a file's content, loading or reloading from disk as needed.
    ///
    /// A missing entry records a miss and loads the file. An existing entry
    /// is served as a hit only when the on-disk mtime still matches the
    /// recorded one and the TTL (if configured) has not lapsed; otherwise
    /// the content is reloaded and the entry refreshed.
    pub async fn get(&self, path: &Path) -> BankResult<String> {
        let mut inner = self.inner.lock().await;
        inner.clock += 1;
        let ordinal = inner.clock;

        if inner.entries.contains_key(path) {
            let stat = match self.ops.stat(path).await {
                Ok(stat) => stat,
                Err(err) => {
                    // The backing file is gone or unreadable; the entry is
                    // no longer trustworthy.
                    inner.entries.remove(path);
                    return Err(err);
                }
            };

            let (fresh, expired) = {
                let entry = inner.entries.get(path).ok_or_else(|| {
                    BankError::cache_inconsistency(format!(
                        "entry vanished during get for {}",
                        path.display()
                    ))
                })?;
                let expired = self
                    .config
                    .max_age
                    .map(|age| entry.touched_at.elapsed() > age)
                    .unwrap_or(false);
                (entry.mtime_ms == stat.mtime_ms, expired)
            };

            if fresh && !expired {
                inner.hits += 1;
                let entry = inner.entries.get_mut(path).ok_or_else(|| {
                    BankError::cache_inconsistency(format!(
                        "entry vanished during get for {}",
                        path.display()
                    ))
                })?;
                entry.last_accessed = ordinal;
                entry.access_count += 1;
                entry.touched_at = Instant::now();
                tracing::debug!("cache hit: {}", path.display());
                return Ok(entry.content.clone());
            }

            let content = match self.ops.read(path).await {
                Ok(content) => content,
                Err(err) => {
                    inner.entries.remove(path);
                    return Err(err);
                }
            };
            inner.reloads += 1;
            let entry = inner.entries.get_mut(path).ok_or_else(|| {
                BankError::cache_inconsistency(format!(
                    "entry vanished during reload for {}",
                    path.display()
                ))
            })?;
            entry.content = content.clone();
            entry.mtime_ms = stat.mtime_ms;
            entry.last_accessed = ordinal;
            entry.access_count += 1;
            entry.touched_at = Instant::now();
            tracing::debug!("cache reload: {}", path.display());
            return Ok(content);
        }

        inner.misses += 1;
        let stat = self.ops.stat(path).await?;
        let content = self.ops.read(path).await?;
        inner.seen.insert(path.to_path_buf());
        inner.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                content: content.clone(),
                mtime_ms: stat.mtime_ms,
                last_accessed: ordinal,
                access_count: 1,
                touched_at: Instant::now(),
            },
        );
        evict_to_cap(&mut inner, self.config.max_size);
        tracing::debug!("cache miss: {}", path.display());
        Ok(content)
    }

    /// Store content that was just written to disk.
    ///
    /// Records the file's current mtime so the next `get` is a hit, then
    /// enforces the size cap.
    pub async fn put(&self, path: &Path, content: &str) -> BankResult<()> {
        let mut inner = self.inner.lock().await;
        inner.clock += 1;
        let ordinal = inner.clock;

        let stat = self.ops.stat(path).await?;
        inner.seen.insert(path.to_path_buf());
        let access_count = inner
            .entries
            .get(path)
            .map(|entry| entry.access_count)
            .unwrap_or(0);
        inner.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                content: content.to_string(),
                mtime_ms: stat.mtime_ms,
                last_accessed: ordinal,
                access_count,
                touched_at: Instant::now(),
            },
        );
        evict_to_cap(&mut inner, self.config.max_size);
        Ok(())
    }

    /// Drop one entry, or all entries when no path is given.
    ///
    /// Clearing everything touches only the current size; counters and
    /// `total_files` are left alone.
    pub async fn invalidate(&self, path: Option<&Path>) {
        let mut inner = self.inner.lock().await;
        match path {
            Some(path) => {
                inner.entries.remove(path);
            }
            None => inner.entries.clear(),
        }
    }

    /// Snapshot the aggregate counters
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().await;
        let accesses = inner.hits + inner.misses;
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            reloads: inner.reloads,
            total_files: inner.seen.len() as u64,
            current_size: inner.entries.len(),
            max_size: self.config.max_size,
            hit_rate: if accesses == 0 {
                0.0
            } else {
                inner.hits as f64 / accesses as f64
            },
            last_reset: inner.last_reset,
        }
    }

    /// Zero every counter and stamp the reset time; entries are kept
    pub async fn reset_stats(&self) {
        let mut inner = self.inner.lock().await;
        inner.hits = 0;
        inner.misses = 0;
        inner.evictions = 0;
        inner.reloads = 0;
        inner.seen.clear();
        inner.last_reset = Utc::now();
    }
}

/// Evict least-recently-used entries until the cache fits the cap
fn evict_to_cap(inner: &mut CacheInner, max_size: usize) {
    while inner.entries.len() > max_size {
        let oldest = inner
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(path, _)| path.clone());
        match oldest {
            Some(path) => {
                inner.entries.remove(&path);
                inner.evictions += 1;
                tracing::debug!("cache evict: {}", path.display());
            }
            None => break,
        }
    }
}
