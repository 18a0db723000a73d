//! In-memory migration log.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use futures::future::BoxFuture;
use tokio::sync::OnceCell;

use crate::error::{MuvError, Result};
use crate::store::VersionLog;
use crate::version::{EntryKind, LogEntry};

#[derive(Debug)]
struct LogTable {
    entries: Vec<LogEntry>,
    next_id: i64,
}

/// In-memory `VersionLog` with the same batch semantics as the database store.
///
/// # Example
///
/// ```ignore
/// let store = MemoryVersionStore::new();
/// store.log_entry("1_init", EntryKind::Migration).await?;
///
/// // A second process against the same log picks the next batch.
/// let other = store.instance();
/// assert_eq!(other.log_entry("2_next", EntryKind::Migration).await?.batch, 2);
/// ```
pub struct MemoryVersionStore {
    table: Arc<RwLock<LogTable>>,
    batch: OnceCell<i32>,
    schema_checks: AtomicUsize,
}

impl MemoryVersionStore {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(LogTable {
                entries: Vec::new(),
                next_id: 1,
            })),
            batch: OnceCell::new(),
            schema_checks: AtomicUsize::new(0),
        }
    }

    /// Another store instance over the same log, with its own batch cache.
    pub fn instance(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            batch: OnceCell::new(),
            schema_checks: AtomicUsize::new(0),
        }
    }

    /// Number of `ensure_schema` calls made through this instance.
    pub fn schema_checks(&self) -> usize {
        self.schema_checks.load(Ordering::SeqCst)
    }

    /// Snapshot of every entry in insertion order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.table.read().unwrap().entries.clone()
    }

    fn max_batch(&self) -> i32 {
        self.table
            .read()
            .unwrap()
            .entries
            .iter()
            .map(|e| e.batch)
            .max()
            .unwrap_or(0)
    }
}

impl Default for MemoryVersionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionLog for MemoryVersionStore {
    fn ensure_schema(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.schema_checks.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn log_entry<'a>(&'a self, name: &'a str, kind: EntryKind) -> BoxFuture<'a, Result<LogEntry>> {
        Box::pin(async move {
            if name.is_empty() {
                return Err(MuvError::InvalidArgument(
                    "Cannot log an entry with an empty name".into(),
                ));
            }

            let current = *self
                .batch
                .get_or_init(|| async { self.max_batch() })
                .await;

            let mut table = self.table.write().unwrap();
            let entry = LogEntry {
                id: table.next_id,
                kind,
                name: name.to_string(),
                batch: current + 1,
                migration_time: Utc::now(),
            };
            table.next_id += 1;
            table.entries.push(entry.clone());
            Ok(entry)
        })
    }

    fn unlog_entry<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.table
                .write()
                .unwrap()
                .entries
                .retain(|e| !(e.kind == EntryKind::Migration && e.name == name));
            Ok(())
        })
    }

    fn entries_by_type(&self, kind: EntryKind) -> BoxFuture<'_, Result<Vec<LogEntry>>> {
        Box::pin(async move {
            Ok(self
                .table
                .read()
                .unwrap()
                .entries
                .iter()
                .filter(|e| e.kind == kind)
                .cloned()
                .collect())
        })
    }

    fn last_entry(&self, kind: EntryKind) -> BoxFuture<'_, Result<Option<LogEntry>>> {
        Box::pin(async move {
            Ok(self
                .table
                .read()
                .unwrap()
                .entries
                .iter()
                .rev()
                .find(|e| e.kind == kind)
                .cloned())
        })
    }

    fn current_batch(&self) -> BoxFuture<'_, Result<i32>> {
        Box::pin(async move { Ok(self.max_batch()) })
    }
}
