//! Cache Statistics Integration Tests
//!
//! Exercises the LRU eviction scenario and the statistics contract through
//! the public cache and core APIs.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use memory_bank_core::services::cache::CacheManager;
use memory_bank_core::{CacheConfig, FileOperations, MemoryBankConfig, MemoryBankCore, RetryPolicy};

async fn seed(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    FileOperations::default().write(&path, content).await.unwrap();
    path
}

#[tokio::test]
async fn test_lru_scenario_max_size_two() {
    // Root with maxSize=2; loading a, b, c in order evicts a.
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::new(
        Arc::new(FileOperations::default()),
        CacheConfig {
            max_size: 2,
            max_age: None,
        },
    );

    let a = seed(&dir, "a.md", "a").await;
    let b = seed(&dir, "b.md", "b").await;
    let c = seed(&dir, "c.md", "c").await;

    cache.get(&a).await.unwrap();
    cache.get(&b).await.unwrap();
    cache.get(&c).await.unwrap();

    let stats = cache.stats().await;
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.current_size, 2);
    assert_eq!(stats.total_files, 3);
}

#[tokio::test]
async fn test_hit_rate_over_a_get_sequence() {
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::new(Arc::new(FileOperations::default()), CacheConfig::default());
    let path = seed(&dir, "doc.md", "content").await;

    for _ in 0..4 {
        cache.get(&path).await.unwrap();
    }

    let stats = cache.stats().await;
    assert_eq!(stats.hits, 3);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate - 0.75).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_stats_survive_full_invalidation() {
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::new(Arc::new(FileOperations::default()), CacheConfig::default());
    let path = seed(&dir, "doc.md", "content").await;

    cache.get(&path).await.unwrap();
    cache.invalidate(None).await;

    let stats = cache.stats().await;
    assert_eq!(stats.current_size, 0);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.total_files, 1);
}

#[tokio::test]
async fn test_core_invalidate_then_access_is_a_miss() {
    let dir = TempDir::new().unwrap();
    let bank = MemoryBankCore::new(MemoryBankConfig::new(dir.path())).unwrap();
    bank.load_files().await.unwrap();
    bank.reset_cache_stats().await;

    bank.invalidate_cache(None).await.unwrap();
    bank.load_files().await.unwrap();

    let stats = bank.cache_stats().await;
    assert_eq!(stats.hits, 0);
    assert!(stats.misses >= 1);
}

#[tokio::test]
async fn test_core_honors_cache_sizing_config() {
    let dir = TempDir::new().unwrap();
    let config = MemoryBankConfig {
        root: dir.path().to_path_buf(),
        cache: CacheConfig {
            max_size: 2,
            max_age: Some(Duration::from_secs(300)),
        },
        retry: RetryPolicy::default(),
    };
    let bank = MemoryBankCore::new(config).unwrap();

    bank.load_files().await.unwrap();
    let stats = bank.cache_stats().await;

    assert_eq!(stats.max_size, 2);
    assert_eq!(stats.current_size, 2);
    assert!(stats.evictions >= 1);
}
