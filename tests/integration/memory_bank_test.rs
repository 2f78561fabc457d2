//! Memory Bank Lifecycle Integration Tests
//!
//! Covers repair-on-read initialization, the two-phase load/get contract,
//! write-through visibility under concurrency, and health reporting.

use std::sync::Arc;

use tempfile::TempDir;

use memory_bank_core::{BankError, FileType, MemoryBankConfig, MemoryBankCore};

fn new_bank(dir: &TempDir) -> MemoryBankCore {
    MemoryBankCore::new(MemoryBankConfig::new(dir.path())).unwrap()
}

#[tokio::test]
async fn test_fresh_store_self_heals_on_load() {
    let dir = TempDir::new().unwrap();
    let bank = new_bank(&dir);

    bank.initialize_folders().await.unwrap();
    let created = bank.load_files().await.unwrap();

    assert_eq!(created.len(), FileType::ALL.len());
    for file_type in FileType::ALL {
        let file = bank.get_file(file_type).await.unwrap();
        assert!(!file.content.is_empty());
        assert!(dir.path().join(file_type.relative_path()).exists());
    }

    // A complete store reports nothing to create.
    let created = bank.load_files().await.unwrap();
    assert!(created.is_empty());
}

#[tokio::test]
async fn test_partial_store_only_repairs_the_gap() {
    let dir = TempDir::new().unwrap();
    let bank = new_bank(&dir);
    bank.load_files().await.unwrap();

    std::fs::remove_file(dir.path().join("techContext.md")).unwrap();
    let created = bank.load_files().await.unwrap();

    assert_eq!(created, vec![FileType::TechContext]);
}

#[tokio::test]
async fn test_update_then_get_returns_exact_content() {
    let dir = TempDir::new().unwrap();
    let bank = new_bank(&dir);
    bank.load_files().await.unwrap();

    let content = "# Decision Log\n\n| 2026-08-07 | adopt engine | speed |\n";
    bank.update_file(FileType::DecisionLog, content).await.unwrap();

    let file = bank.get_file(FileType::DecisionLog).await.unwrap();
    assert_eq!(file.content, content);

    // Disk agrees with memory.
    let on_disk = std::fs::read_to_string(dir.path().join("decisions/log.md")).unwrap();
    assert_eq!(on_disk, content);
}

#[tokio::test]
async fn test_concurrent_write_and_get_settle_on_new_content() {
    let dir = TempDir::new().unwrap();
    let bank = Arc::new(new_bank(&dir));
    bank.load_files().await.unwrap();

    let writer = {
        let bank = Arc::clone(&bank);
        tokio::spawn(async move {
            bank.update_file(FileType::ProgressCurrent, "# Progress\n\nX")
                .await
                .unwrap();
        })
    };
    let reader = {
        let bank = Arc::clone(&bank);
        tokio::spawn(async move { bank.get_file(FileType::ProgressCurrent).await })
    };

    writer.await.unwrap();
    reader.await.unwrap();

    let fresh = bank.get_file(FileType::ProgressCurrent).await.unwrap();
    assert_eq!(fresh.content, "# Progress\n\nX");
}

#[tokio::test]
async fn test_write_by_path_round_trips_through_cache() {
    let dir = TempDir::new().unwrap();
    let bank = new_bank(&dir);
    bank.initialize_folders().await.unwrap();

    bank.write_file_by_path("notes/meeting.md", "# Meeting\n\nagenda")
        .await
        .unwrap();

    let on_disk = std::fs::read_to_string(dir.path().join("notes/meeting.md")).unwrap();
    assert_eq!(on_disk, "# Meeting\n\nagenda");
    assert!(bank.metadata("notes/meeting.md").await.is_some());
}

#[tokio::test]
async fn test_traversal_attempts_fail_with_typed_errors() {
    let dir = TempDir::new().unwrap();
    let bank = new_bank(&dir);

    for bad in ["../escape.md", "/etc/passwd", "a/../../b.md"] {
        let err = bank.write_file_by_path(bad, "nope").await.unwrap_err();
        assert!(
            matches!(err, BankError::InvalidPath(_) | BankError::PathEscape(_)),
            "{} was accepted",
            bad
        );
    }
    assert!(!dir.path().join("../escape.md").exists());
}

#[tokio::test]
async fn test_health_reports_problems_without_repairing() {
    let dir = TempDir::new().unwrap();
    let bank = new_bank(&dir);
    bank.load_files().await.unwrap();

    std::fs::remove_file(dir.path().join("projectBrief.md")).unwrap();
    std::fs::remove_file(dir.path().join("progress/history.md")).unwrap();

    let report = bank.check_health().await.unwrap();
    assert!(!report.healthy);
    assert_eq!(report.checked, FileType::ALL.len());
    assert!(report.missing.contains(&FileType::ProjectBrief));
    assert!(report.missing.contains(&FileType::ProgressHistory));

    // The files are still gone; only load_files repairs.
    assert!(!dir.path().join("projectBrief.md").exists());
    let summary = report.summary();
    assert!(summary.contains("projectBrief"));
    assert!(summary.contains("progressHistory"));
}

#[tokio::test]
async fn test_externally_replaced_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    let bank = new_bank(&dir);
    bank.load_files().await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    std::fs::write(
        dir.path().join("activeContext.md"),
        "# Active Context\n\nedited outside the engine",
    )
    .unwrap();

    // load_files reloads through the cache's staleness check.
    bank.load_files().await.unwrap();
    let file = bank.get_file(FileType::ActiveContext).await.unwrap();
    assert!(file.content.contains("edited outside the engine"));
}
