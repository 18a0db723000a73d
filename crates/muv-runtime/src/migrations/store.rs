//! PostgreSQL-backed migration log.

use futures::future::BoxFuture;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tokio::sync::OnceCell;
use tracing::debug;

use muv_core::config::validate_table_name;
use muv_core::error::{MuvError, Result};
use muv_core::store::VersionLog;
use muv_core::version::{EntryKind, LogEntry};

/// Migration log stored in a single append-only table.
///
/// The batch number is computed once per instance, on the first write, and
/// every write through the instance uses `cached + 1`.
pub struct PgVersionStore {
    pool: PgPool,
    table: String,
    batch: OnceCell<i32>,
}

impl PgVersionStore {
    /// Create a store over `table_name`, which must be a plain identifier.
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Result<Self> {
        let table = table_name.into();
        validate_table_name(&table)?;
        Ok(Self {
            pool,
            table,
            batch: OnceCell::new(),
        })
    }

    /// Name of the log table.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    async fn cached_batch(&self) -> Result<i32> {
        let batch = self
            .batch
            .get_or_try_init(|| async {
                let batch = self.current_batch().await?;
                debug!(table = %self.table, batch, "Computed current batch");
                Ok::<_, MuvError>(batch)
            })
            .await?;
        Ok(*batch)
    }
}

/// SQLSTATE for a relation that does not exist.
const UNDEFINED_TABLE: &str = "42P01";

/// Whether `e` reports that the log table has not been created yet.
///
/// Reads treat a missing table as an empty log, so read-only commands work
/// against a database `ensure_schema` has never touched.
fn is_missing_table(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNDEFINED_TABLE),
        _ => false,
    }
}

fn row_to_entry(row: &PgRow) -> Result<LogEntry> {
    let kind: String = row.try_get("type")?;
    Ok(LogEntry {
        id: row.try_get("id")?,
        kind: kind.parse()?,
        name: row.try_get("name")?,
        batch: row.try_get("batch")?,
        migration_time: row.try_get("migration_time")?,
    })
}

impl VersionLog for PgVersionStore {
    fn ensure_schema(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    MuvError::StorageUnavailable(format!("Database unreachable: {}", e))
                })?;

            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id BIGSERIAL PRIMARY KEY,
                    type VARCHAR(16) NOT NULL CHECK (type IN ('migration', 'baseline')),
                    name VARCHAR(255) NOT NULL CHECK (name <> ''),
                    batch INTEGER NOT NULL,
                    migration_time TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                self.table
            ))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MuvError::StorageUnavailable(format!(
                    "Failed to create migrations table {}: {}",
                    self.table, e
                ))
            })?;

            debug!(table = %self.table, "Migrations table ready");
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

            let batch = self.cached_batch().await? + 1;

            let row = sqlx::query(&format!(
                r#"
                INSERT INTO {} (type, name, batch, migration_time)
                VALUES ($1, $2, $3, NOW())
                RETURNING id, type, name, batch, migration_time
                "#,
                self.table
            ))
            .bind(kind.as_str())
            .bind(name)
            .bind(batch)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                MuvError::StorageUnavailable(format!("Failed to log {} '{}': {}", kind, name, e))
            })?;

            row_to_entry(&row)
        })
    }

    fn unlog_entry<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            sqlx::query(&format!(
                "DELETE FROM {} WHERE type = 'migration' AND name = $1",
                self.table
            ))
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MuvError::StorageUnavailable(format!("Failed to unlog migration '{}': {}", name, e))
            })?;
            Ok(())
        })
    }

    fn entries_by_type(&self, kind: EntryKind) -> BoxFuture<'_, Result<Vec<LogEntry>>> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                r#"
                SELECT id, type, name, batch, migration_time
                FROM {}
                WHERE type = $1
                ORDER BY id ASC
                "#,
                self.table
            ))
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await;

            match rows {
                Ok(rows) => rows.iter().map(row_to_entry).collect(),
                Err(e) if is_missing_table(&e) => Ok(Vec::new()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn last_entry(&self, kind: EntryKind) -> BoxFuture<'_, Result<Option<LogEntry>>> {
        Box::pin(async move {
            let row = sqlx::query(&format!(
                r#"
                SELECT id, type, name, batch, migration_time
                FROM {}
                WHERE type = $1
                ORDER BY id DESC
                LIMIT 1
                "#,
                self.table
            ))
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await;

            match row {
                Ok(row) => row.as_ref().map(row_to_entry).transpose(),
                Err(e) if is_missing_table(&e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn current_batch(&self) -> BoxFuture<'_, Result<i32>> {
        Box::pin(async move {
            let batch = sqlx::query_scalar::<_, i32>(&format!(
                "SELECT COALESCE(MAX(batch), 0) FROM {}",
                self.table
            ))
            .fetch_one(&self.pool)
            .await;

            match batch {
                Ok(batch) => Ok(batch),
                Err(e) if is_missing_table(&e) => Ok(0),
                Err(e) => Err(e.into()),
            }
        })
    }
}
