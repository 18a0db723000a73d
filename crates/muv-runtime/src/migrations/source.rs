//! Migrations loaded from a directory of SQL files.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use futures::future::BoxFuture;
use regex::Regex;
use sqlx::PgPool;
use tracing::{debug, info};

use muv_core::error::{MuvError, Result};
use muv_core::source::{Direction, MigrationSource};
use muv_core::store::VersionLog;
use muv_core::version::EntryKind;

use super::script::{statements, MigrationScript};

/// File extension of migration files.
pub const MIGRATION_EXTENSION: &str = "sql";

fn migration_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+_[A-Za-z0-9_-]+\.sql$").expect("valid pattern"))
}

/// A migration file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Identifier (file stem, e.g. "20170401093232_bootstrap").
    pub name: String,
    /// Full path of the file.
    pub path: PathBuf,
}

/// List migration files in a directory.
///
/// Files should be named like:
/// - `20170401093232_bootstrap.sql`
/// - `20170427093232_add_tags.sql`
///
/// They are sorted by name. Files not matching the pattern are ignored.
pub fn list_migration_files(dir: &Path) -> Result<Vec<MigrationFile>> {
    if !dir.exists() {
        debug!("Migrations directory does not exist: {:?}", dir);
        return Ok(Vec::new());
    }

    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };

        if !path.is_file() || !migration_file_pattern().is_match(file_name) {
            debug!("Skipping non-migration file: {:?}", path);
            continue;
        }

        let name = file_name
            .strip_suffix(&format!(".{}", MIGRATION_EXTENSION))
            .unwrap_or(file_name)
            .to_string();

        files.push(MigrationFile { name, path });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));

    debug!("Found {} migration files in {:?}", files.len(), dir);
    Ok(files)
}

/// Execution collaborator backed by a directory of SQL files.
///
/// Each migration runs in its own transaction on `pool`. Candidates are the
/// files on disk whose names are not logged as migrations in `log`.
pub struct DirectorySource {
    dir: PathBuf,
    pool: PgPool,
    log: Arc<dyn VersionLog>,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, pool: PgPool, log: Arc<dyn VersionLog>) -> Self {
        Self {
            dir: dir.into(),
            pool,
            log,
        }
    }

    fn load(&self, name: &str) -> Result<MigrationScript> {
        let path = self.dir.join(format!("{}.{}", name, MIGRATION_EXTENSION));
        let content = std::fs::read_to_string(&path).map_err(|e| {
            MuvError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read migration {:?}: {}", path, e),
            ))
        })?;
        Ok(MigrationScript::parse(&content))
    }

    async fn run_in_transaction(&self, name: &str, direction: Direction, sql: &str) -> Result<()> {
        let failed = |e: sqlx::Error| MuvError::MigrationExecution {
            name: name.to_string(),
            direction,
            message: e.to_string(),
        };

        let mut tx = self.pool.begin().await.map_err(failed)?;

        for statement in statements(sql) {
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(failed)?;
        }

        tx.commit().await.map_err(failed)?;
        Ok(())
    }
}

impl MigrationSource for DirectorySource {
    fn candidates(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        Box::pin(async move {
            let logged: std::collections::HashSet<String> = self
                .log
                .entries_by_type(EntryKind::Migration)
                .await?
                .into_iter()
                .map(|e| e.name)
                .collect();

            Ok(list_migration_files(&self.dir)?
                .into_iter()
                .map(|f| f.name)
                .filter(|name| !logged.contains(name))
                .collect())
        })
    }

    fn resolve<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            let prefix = name
                .strip_suffix(&format!(".{}", MIGRATION_EXTENSION))
                .unwrap_or(name);
            if prefix.is_empty() {
                return Ok(None);
            }

            Ok(list_migration_files(&self.dir)?
                .into_iter()
                .find(|f| f.name.starts_with(prefix))
                .map(|f| f.name))
        })
    }

    fn apply<'a>(&'a self, name: &'a str, direction: Direction) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let script = self.load(name)?;
            let sql = script
                .sql(direction)
                .ok_or_else(|| MuvError::MigrationExecution {
                    name: name.to_string(),
                    direction,
                    message: "migration is irreversible (no down section)".into(),
                })?;

            debug!(migration = name, %direction, "Running migration");
            self.run_in_transaction(name, direction, sql).await?;
            info!(migration = name, %direction, "Migration finished");
            Ok(())
        })
    }
}
