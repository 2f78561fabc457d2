//! Metadata Index
//!
//! Queryable metadata records derived from document frontmatter, keyed by
//! relative path. Entries carry an id built from the normalized title plus
//! the first 12 hex chars of the content's SHA-256, so a changed document
//! gets a new id while its path stays stable.
//!
//! Indexing never blocks a read or write: documents without a parseable
//! header get a minimal record, and validation failures are recorded, not
//! raised.

pub mod frontmatter;
pub mod validation;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::models::file::FileType;
use crate::models::metadata::{IndexQuery, MetadataEntry, SortBy, ValidationStatus};
use validation::{HeadingSchemaCheck, SchemaCheck};

/// In-memory metadata index over the tracked documents
pub struct MetadataIndex {
    entries: RwLock<HashMap<String, MetadataEntry>>,
    schema: Arc<dyn SchemaCheck>,
}

impl Default for MetadataIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataIndex {
    /// Create an index with the default heading-based schema checks
    pub fn new() -> Self {
        Self::with_schema_check(Arc::new(HeadingSchemaCheck))
    }

    /// Create an index with a caller-supplied schema check
    pub fn with_schema_check(schema: Arc<dyn SchemaCheck>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            schema,
        }
    }

    /// Insert or refresh the entry for one document.
    ///
    /// An existing entry keeps its original `created` timestamp, and
    /// `updated` never moves backwards.
    pub async fn upsert(&self, relative_path: &str, content: &str) -> MetadataEntry {
        let mut entries = self.entries.write().await;
        let previous = entries.get(relative_path);
        let entry = self.build_entry(relative_path, content, previous);
        entries.insert(relative_path.to_string(), entry.clone());
        entry
    }

    /// Drop the entry for a deleted document
    pub async fn remove(&self, relative_path: &str) -> bool {
        self.entries.write().await.remove(relative_path).is_some()
    }

    /// Look up one entry by relative path
    pub async fn get(&self, relative_path: &str) -> Option<MetadataEntry> {
        self.entries.read().await.get(relative_path).cloned()
    }

    /// Number of tracked documents
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the index tracks no documents
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Query entries matching the filter.
    ///
    /// Tag filters require the entry to carry every requested tag. Results
    /// are ordered by the requested sort, or by relative path when no sort
    /// is given, and bounded by the query's limit.
    pub async fn query(&self, query: &IndexQuery) -> Vec<MetadataEntry> {
        let entries = self.entries.read().await;
        let mut matched: Vec<MetadataEntry> = entries
            .values()
            .filter(|entry| {
                query.tags.iter().all(|tag| entry.tags.contains(tag))
                    && query
                        .file_type
                        .map_or(true, |file_type| entry.file_type == Some(file_type))
                    && query
                        .validation
                        .map_or(true, |status| entry.validation == status)
            })
            .cloned()
            .collect();
        drop(entries);

        match query.sort {
            Some(SortBy::RecentFirst) => {
                matched.sort_by(|a, b| b.updated.cmp(&a.updated));
            }
            Some(SortBy::LargestFirst) => {
                matched.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
            }
            None => matched.sort_by(|a, b| a.relative_path.cmp(&b.relative_path)),
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        matched
    }

    /// Replace the whole index.
    ///
    /// The replacement map is fully constructed before being swapped in, so
    /// concurrent queries see either the old index or the new one, never a
    /// partial rebuild. Monotonic `updated` timestamps carry over from the
    /// entries being replaced.
    pub async fn rebuild_all(&self, documents: Vec<(String, String)>) {
        let snapshot = self.entries.read().await.clone();
        let mut fresh = HashMap::with_capacity(documents.len());
        for (relative_path, content) in &documents {
            let previous = snapshot.get(relative_path.as_str());
            let entry = self.build_entry(relative_path, content, previous);
            fresh.insert(relative_path.clone(), entry);
        }

        let mut entries = self.entries.write().await;
        *entries = fresh;
    }

    fn build_entry(
        &self,
        relative_path: &str,
        content: &str,
        previous: Option<&MetadataEntry>,
    ) -> MetadataEntry {
        let header = frontmatter::parse_header(content);

        let file_type = header
            .doc_type
            .as_deref()
            .and_then(|declared| FileType::from_str(declared).ok())
            .or_else(|| FileType::from_relative_path(relative_path));

        let title = header
            .title
            .or_else(|| frontmatter::first_heading(content))
            .unwrap_or_else(|| file_stem(relative_path));

        let now = Utc::now();
        let updated_candidate = header.updated.unwrap_or(now);
        let (created, updated) = match previous {
            Some(previous) => (previous.created, previous.updated.max(updated_candidate)),
            None => (header.created.unwrap_or(now), updated_candidate),
        };

        let validation = self.schema.check(file_type, content);
        if validation == ValidationStatus::Invalid {
            tracing::warn!("{} failed its schema check", relative_path);
        }

        MetadataEntry {
            id: generate_entry_id(&title, &sha256_hex(content)),
            relative_path: relative_path.to_string(),
            file_type,
            title,
            tags: header.tags.into_iter().collect::<BTreeSet<_>>(),
            validation,
            size_bytes: content.len() as u64,
            created,
            updated,
        }
    }
}

/// Compute the SHA-256 of content as a hex string
fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// Entry id: normalized title + "-" + first 12 hex chars of the hash
fn generate_entry_id(title: &str, hash: &str) -> String {
    let normalized = title
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect::<String>();

    let prefix = if hash.len() >= 12 { &hash[..12] } else { hash };
    format!("{}-{}", normalized, prefix)
}

/// Last path segment without its extension, as a title of last resort
fn file_stem(relative_path: &str) -> String {
    let name = relative_path
        .rsplit('/')
        .next()
        .unwrap_or(relative_path);
    name.rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn doc(title: &str, tags: &str, updated: &str) -> String {
        format!(
            "---\ntitle: {}\ntags: [{}]\nupdated: {}\n---\n# {}\n",
            title, tags, updated, title
        )
    }

    #[tokio::test]
    async fn test_upsert_minimal_document() {
        let index = MetadataIndex::new();
        let entry = index.upsert("notes/scratch.md", "no header, no heading").await;

        assert_eq!(entry.file_type, None);
        assert_eq!(entry.validation, ValidationStatus::Unknown);
        assert_eq!(entry.title, "scratch");
        assert!(entry.tags.is_empty());
        assert!(entry.id.starts_with("scratch-"));
    }

    #[tokio::test]
    async fn test_type_inferred_from_fixed_path() {
        let index = MetadataIndex::new();
        let entry = index
            .upsert("progress/current.md", "# Progress\n\n- started")
            .await;
        assert_eq!(entry.file_type, Some(FileType::ProgressCurrent));
        assert_eq!(entry.validation, ValidationStatus::Valid);
    }

    #[tokio::test]
    async fn test_tag_intersection_query() {
        let index = MetadataIndex::new();
        index
            .upsert("a.md", &doc("A", "arch, core", "2026-01-01"))
            .await;
        index.upsert("b.md", &doc("B", "core", "2026-01-02")).await;

        let results = index.query(&IndexQuery::with_tags(["arch"])).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "A");

        let results = index.query(&IndexQuery::with_tags(["core"])).await;
        assert_eq!(results.len(), 2);

        let results = index.query(&IndexQuery::with_tags(["arch", "core"])).await;
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_recent_first_with_limit() {
        let index = MetadataIndex::new();
        index.upsert("a.md", &doc("A", "", "2026-01-01")).await;
        index.upsert("b.md", &doc("B", "", "2026-03-01")).await;
        index.upsert("c.md", &doc("C", "", "2026-02-01")).await;

        let results = index.query(&IndexQuery::recent(2)).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "B");
        assert_eq!(results[1].title, "C");
    }

    #[tokio::test]
    async fn test_largest_first() {
        let index = MetadataIndex::new();
        index.upsert("small.md", "# S\n").await;
        index
            .upsert("large.md", &format!("# L\n{}", "x".repeat(500)))
            .await;

        let results = index.query(&IndexQuery::largest(1)).await;
        assert_eq!(results[0].relative_path, "large.md");
    }

    #[tokio::test]
    async fn test_validation_status_filter() {
        let index = MetadataIndex::new();
        index
            .upsert("projectBrief.md", "# Project Brief\n\ncontent")
            .await;
        index.upsert("techContext.md", "missing its heading").await;

        let query = IndexQuery {
            validation: Some(ValidationStatus::Invalid),
            ..Default::default()
        };
        let results = index.query(&query).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].relative_path, "techContext.md");
    }

    #[tokio::test]
    async fn test_updated_is_monotonic_across_rebuilds() {
        let index = MetadataIndex::new();
        index.upsert("a.md", &doc("A", "", "2030-01-01")).await;

        index
            .rebuild_all(vec![("a.md".to_string(), doc("A", "", "2020-01-01"))])
            .await;

        let entry = index.get("a.md").await.unwrap();
        let floor = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert!(entry.updated >= floor);
    }

    #[tokio::test]
    async fn test_rebuild_drops_deleted_documents() {
        let index = MetadataIndex::new();
        index.upsert("a.md", "# A").await;
        index.upsert("b.md", "# B").await;

        index.rebuild_all(vec![("a.md".to_string(), "# A".to_string())]).await;

        assert_eq!(index.len().await, 1);
        assert!(index.get("b.md").await.is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let index = MetadataIndex::new();
        index.upsert("a.md", "# A").await;
        assert!(index.remove("a.md").await);
        assert!(!index.remove("a.md").await);
        assert!(index.is_empty().await);
    }

    #[test]
    fn test_generate_entry_id() {
        let id = generate_entry_id("Auth Overhaul Plan", "abcdef1234567890");
        assert_eq!(id, "auth-overhaul-plan-abcdef123456");
    }

    #[test]
    fn test_sha256_hex() {
        // Known SHA-256 of "hello world"
        assert_eq!(
            sha256_hex("hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
