//! Metadata Search Integration Tests
//!
//! Seeds a store with frontmatter-tagged documents and queries the index
//! through the core's search surface.

use tempfile::TempDir;

use memory_bank_core::{
    FileType, IndexQuery, MemoryBankConfig, MemoryBankCore, SortBy, ValidationStatus,
};

async fn seeded_bank(dir: &TempDir) -> MemoryBankCore {
    let bank = MemoryBankCore::new(MemoryBankConfig::new(dir.path())).unwrap();
    bank.initialize_folders().await.unwrap();
    bank.load_files().await.unwrap();

    bank.write_file_by_path(
        "notes/architecture.md",
        "---\ntitle: Architecture Notes\ntags: [arch, core]\nupdated: 2026-06-01\n---\n# Architecture Notes\n",
    )
    .await
    .unwrap();
    bank.write_file_by_path(
        "notes/core-only.md",
        "---\ntitle: Core Only\ntags: [core]\nupdated: 2026-07-01\n---\n# Core Only\n",
    )
    .await
    .unwrap();
    bank
}

#[tokio::test]
async fn test_tag_intersection_returns_only_full_matches() {
    let dir = TempDir::new().unwrap();
    let bank = seeded_bank(&dir).await;

    let results = bank.search(&IndexQuery::with_tags(["arch"])).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Architecture Notes");

    let results = bank.search(&IndexQuery::with_tags(["arch", "core"])).await;
    assert_eq!(results.len(), 1);

    let results = bank.search(&IndexQuery::with_tags(["core"])).await;
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_type_filter_matches_exactly_one_document() {
    let dir = TempDir::new().unwrap();
    let bank = seeded_bank(&dir).await;

    let results = bank.search(&IndexQuery::with_type(FileType::ProjectBrief)).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].relative_path, "projectBrief.md");
}

#[tokio::test]
async fn test_recent_view_is_sorted_and_bounded() {
    let dir = TempDir::new().unwrap();
    let bank = seeded_bank(&dir).await;

    let results = bank.search(&IndexQuery::recent(3)).await;
    assert_eq!(results.len(), 3);
    for pair in results.windows(2) {
        assert!(pair[0].updated >= pair[1].updated);
    }
}

#[tokio::test]
async fn test_largest_view_ranks_by_size() {
    let dir = TempDir::new().unwrap();
    let bank = seeded_bank(&dir).await;
    bank.write_file_by_path(
        "notes/big.md",
        &format!("# Big\n\n{}", "lorem ipsum ".repeat(200)),
    )
    .await
    .unwrap();

    let results = bank.search(&IndexQuery::largest(1)).await;
    assert_eq!(results[0].relative_path, "notes/big.md");
}

#[tokio::test]
async fn test_validation_filter_finds_broken_documents() {
    let dir = TempDir::new().unwrap();
    let bank = seeded_bank(&dir).await;

    // A known type missing its required heading indexes as invalid.
    bank.update_file(FileType::TechContext, "stack notes without a heading")
        .await
        .unwrap();

    let query = IndexQuery {
        validation: Some(ValidationStatus::Invalid),
        sort: Some(SortBy::RecentFirst),
        ..Default::default()
    };
    let results = bank.search(&query).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_type, Some(FileType::TechContext));

    // Ad hoc notes have no schema and stay unknown, never invalid.
    let unknowns = bank
        .search(&IndexQuery {
            validation: Some(ValidationStatus::Unknown),
            ..Default::default()
        })
        .await;
    assert!(unknowns
        .iter()
        .all(|entry| entry.file_type.is_none()));
    assert_eq!(unknowns.len(), 2);
}
