//! Retrying File Operations
//!
//! Async read/write/mkdir/stat over validated absolute paths, with bounded
//! retry for transient failures and typed results.
//!
//! Writes are all-or-nothing: content goes to a temp sibling first and is
//! renamed over the target, so a failed write leaves the prior content
//! untouched. Permanent errors (not-found, permission denied) surface
//! immediately; transient ones burn through the retry budget with
//! exponential backoff before surfacing as `TransientExhausted`.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use crate::utils::error::{BankError, BankResult};

/// Filesystem metadata snapshot for one path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Modification time in milliseconds since the Unix epoch
    pub mtime_ms: i64,
    /// File size in bytes
    pub size_bytes: u64,
}

/// Retry budget and backoff shape for transient failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per operation, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each attempt
    pub base_delay: Duration,
    /// Upper bound on any single backoff delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay before retry number `attempt` (1-based)
    fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// File I/O layer shared by the cache and the core
#[derive(Debug, Clone, Default)]
pub struct FileOperations {
    policy: RetryPolicy,
}

impl FileOperations {
    /// Create a file operations layer with the given retry policy
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Read a file to a UTF-8 string
    pub async fn read(&self, path: &Path) -> BankResult<String> {
        self.with_retry("read", path, || tokio::fs::read_to_string(path))
            .await
    }

    /// Atomically replace a file's content.
    ///
    /// Creates missing parent directories, writes to a `.tmp` sibling, and
    /// renames it over the target.
    pub async fn write(&self, path: &Path, content: &str) -> BankResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.mkdir(parent).await?;
            }
        }

        let tmp = tmp_path(path);
        let tmp_ref: &Path = &tmp;
        self.with_retry("write", path, || async move {
            tokio::fs::write(tmp_ref, content.as_bytes()).await?;
            tokio::fs::rename(tmp_ref, path).await
        })
        .await
    }

    /// Create a directory and any missing ancestors; existing is success
    pub async fn mkdir(&self, path: &Path) -> BankResult<()> {
        self.with_retry("mkdir", path, || async move {
            match tokio::fs::create_dir_all(path).await {
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
                other => other,
            }
        })
        .await
    }

    /// Fetch modification time and size for a path
    pub async fn stat(&self, path: &Path) -> BankResult<FileStat> {
        self.with_retry("stat", path, || async move {
            let meta = tokio::fs::metadata(path).await?;
            let mtime_ms = meta
                .modified()?
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as i64)
                .unwrap_or(0);
            Ok(FileStat {
                mtime_ms,
                size_bytes: meta.len(),
            })
        })
        .await
    }

    /// Run an I/O action under the retry policy.
    ///
    /// Transient errors retry with exponential backoff until the budget is
    /// spent; everything else is classified and returned immediately.
    async fn with_retry<T, F, Fut>(&self, op: &str, path: &Path, mut action: F) -> BankResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = io::Result<T>>,
    {
        let mut attempt = 0u32;
        loop {
            match action().await {
                Ok(value) => return Ok(value),
                Err(err) if is_transient(&err) => {
                    attempt += 1;
                    if attempt >= self.policy.max_attempts {
                        tracing::error!(
                            "{} {} failed after {} attempts: {}",
                            op,
                            path.display(),
                            attempt,
                            err
                        );
                        return Err(BankError::TransientExhausted {
                            attempts: attempt,
                            message: format!("{} {}: {}", op, path.display(), err),
                        });
                    }
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        "{} {} failed (attempt {}/{}), retrying in {:?}: {}",
                        op,
                        path.display(),
                        attempt,
                        self.policy.max_attempts,
                        delay,
                        err
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(classify_permanent(err, path)),
            }
        }
    }
}

/// Temp sibling used for atomic replace: `<name>.tmp` in the same directory
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "file".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Whether an I/O error is worth retrying.
///
/// Covers the kinds the runtime reports for busy resources plus the raw
/// errno values for EAGAIN, EBUSY, ENFILE, and EMFILE.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    ) || matches!(err.raw_os_error(), Some(11) | Some(16) | Some(23) | Some(24))
}

/// Map a non-transient I/O error to its typed variant
fn classify_permanent(err: io::Error, path: &Path) -> BankError {
    match err.kind() {
        io::ErrorKind::NotFound => BankError::not_found(path.display().to_string()),
        io::ErrorKind::PermissionDenied => {
            BankError::permission_denied(path.display().to_string())
        }
        io::ErrorKind::AlreadyExists => BankError::AlreadyExists(path.display().to_string()),
        _ => BankError::Io(err),
    }
}
