//! The migration log seam.

use futures::future::BoxFuture;

use crate::error::Result;
use crate::version::{effective_version, EntryKind, LogEntry};

/// Durable, append-only record of applied migrations and baselines.
///
/// Implementations cache the batch number per instance: the first write
/// computes `current_batch()` and every write through the same instance is
/// tagged `cached + 1`. Two instances writing concurrently may pick the same
/// batch; callers serialize invocations.
pub trait VersionLog: Send + Sync {
    /// Create the log table if it does not exist.
    fn ensure_schema(&self) -> BoxFuture<'_, Result<()>>;

    /// Append an entry to the log.
    fn log_entry<'a>(&'a self, name: &'a str, kind: EntryKind) -> BoxFuture<'a, Result<LogEntry>>;

    /// Delete the migration entry with this name. Missing entries are ignored.
    fn unlog_entry<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<()>>;

    /// All entries of a kind in insertion order.
    fn entries_by_type(&self, kind: EntryKind) -> BoxFuture<'_, Result<Vec<LogEntry>>>;

    /// The most recently inserted entry of a kind.
    fn last_entry(&self, kind: EntryKind) -> BoxFuture<'_, Result<Option<LogEntry>>>;

    /// Highest batch number in the log, or 0.
    fn current_batch(&self) -> BoxFuture<'_, Result<i32>>;

    /// Higher, by name, of the last migration and the last baseline.
    fn current_version(&self) -> BoxFuture<'_, Result<Option<LogEntry>>> {
        Box::pin(async move {
            let migration = self.last_entry(EntryKind::Migration).await?;
            let baseline = self.last_entry(EntryKind::Baseline).await?;
            Ok(effective_version(migration, baseline))
        })
    }
}
