//! Integration Tests Module
//!
//! End-to-end tests for the memory bank engine. Each test builds an
//! isolated store under a temporary directory and drives it through the
//! public API only.

// Repair-on-read, typed operations, health, and concurrency tests
mod memory_bank_test;

// Cache statistics and eviction behavior tests
mod cache_stats_test;

// Metadata index search tests
mod search_test;
