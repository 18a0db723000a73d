//! Baseline-aware migration orchestration.
//!
//! The migrator computes what `up` and `down` would touch from the log and
//! the source's candidates, then runs that range one migration at a time,
//! logging or unlogging each as soon as it succeeds. A failure stops the
//! batch; migrations that already succeeded stay applied and logged.
//!
//! Targets (`--to`) are name prefixes: `"3"` matches `"3c_add_tags"`. For
//! `up` the first pending match is the last migration applied. For `down`
//! the first executed match (most recent first) is the first migration kept;
//! `"0"` reverts everything above the baseline.

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::{debug, info};

use muv_core::error::{MuvError, Result, SearchSet};
use muv_core::source::{Direction, MigrationSource};
use muv_core::store::VersionLog;
use muv_core::version::{version_higher, version_lower, EntryKind, LogEntry};

use super::source::DirectorySource;
use super::store::PgVersionStore;

/// `down` target that reverts every migration above the baseline.
pub const ROLLBACK_ALL: &str = "0";

/// Everything needed to build a migrator against a database.
#[derive(Debug, Clone)]
pub struct MigratorConfig {
    /// Connection pool.
    pub pool: PgPool,
    /// Directory holding the migration files.
    pub migrations_dir: PathBuf,
    /// Name of the log table.
    pub table_name: String,
}

/// Snapshot of the schema state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub current_version: Option<String>,
    pub baseline: Option<String>,
    pub pending: Vec<String>,
}

/// Migration orchestrator.
pub struct Migrator {
    log: Arc<dyn VersionLog>,
    source: Arc<dyn MigrationSource>,
}

impl Migrator {
    pub fn new(log: Arc<dyn VersionLog>, source: Arc<dyn MigrationSource>) -> Self {
        Self { log, source }
    }

    /// Build a migrator backed by PostgreSQL and a directory of SQL files.
    pub fn from_config(config: MigratorConfig) -> Result<Self> {
        let log: Arc<dyn VersionLog> =
            Arc::new(PgVersionStore::new(config.pool.clone(), config.table_name)?);
        let source = Arc::new(DirectorySource::new(
            config.migrations_dir,
            config.pool,
            Arc::clone(&log),
        ));
        Ok(Self::new(log, source))
    }

    /// Create the log table if needed.
    pub async fn init(&self) -> Result<()> {
        self.log.ensure_schema().await
    }

    /// Name of the effective schema version.
    pub async fn current_version(&self) -> Result<Option<String>> {
        Ok(self.log.current_version().await?.map(|e| e.name))
    }

    /// Name of the last baseline.
    pub async fn current_baseline(&self) -> Result<Option<String>> {
        Ok(self
            .log
            .last_entry(EntryKind::Baseline)
            .await?
            .map(|e| e.name))
    }

    /// Migrations that `up` would run, ascending.
    ///
    /// Candidates at or below the baseline are dropped. Any remaining
    /// candidate not above the current version means the log and the
    /// migration set disagree, and is reported rather than skipped.
    pub async fn pending(&self) -> Result<Vec<String>> {
        let candidates = self.source.candidates().await?;
        let current = self.current_version().await?;
        let baseline = self.current_baseline().await?;

        let mut pending: Vec<String> = candidates
            .into_iter()
            .filter(|name| version_higher(name, &baseline, false))
            .collect();
        pending.sort();

        if let Some(stale) = pending
            .iter()
            .find(|name| !version_higher(*name, &current, false))
        {
            return Err(MuvError::ConsistencyViolation {
                name: stale.clone(),
                current,
            });
        }

        Ok(pending)
    }

    /// Logged migrations above the baseline (`revertible`), or at and below
    /// it, in application order.
    pub async fn executed(&self, revertible: bool) -> Result<Vec<String>> {
        let migrations = self.log.entries_by_type(EntryKind::Migration).await?;
        let baseline = self.log.last_entry(EntryKind::Baseline).await?;

        Ok(migrations
            .into_iter()
            .filter(|m| {
                if revertible {
                    version_higher(m, &baseline, false)
                } else {
                    version_lower(m, &baseline, true)
                }
            })
            .map(|m| m.name)
            .collect())
    }

    /// Range `up` would apply.
    pub async fn uppable(&self, to: Option<&str>) -> Result<Vec<String>> {
        slice_up(self.pending().await?, to)
    }

    /// Range `down` would revert, most recent first.
    pub async fn downable(&self, to: Option<&str>) -> Result<Vec<String>> {
        let mut executed = self.executed(true).await?;
        executed.reverse();
        slice_down(executed, to)
    }

    /// Migrations `up` or `down` would run for `to`, without running them.
    ///
    /// Only reads the log. The log table is not created, so a dry run
    /// against a fresh database leaves it untouched.
    pub async fn plan(&self, direction: Direction, to: Option<&str>) -> Result<Vec<String>> {
        match direction {
            Direction::Up => self.uppable(to).await,
            Direction::Down => self.downable(to).await,
        }
    }

    /// Apply pending migrations up to and including `to`.
    pub async fn up(&self, to: Option<&str>) -> Result<Vec<String>> {
        let migrations = self.uppable(to).await?;
        self.run(Direction::Up, migrations).await
    }

    /// Revert executed migrations down to, but not including, `to`.
    pub async fn down(&self, to: Option<&str>) -> Result<Vec<String>> {
        let migrations = self.downable(to).await?;
        self.run(Direction::Down, migrations).await
    }

    /// Move the baseline to `name`. Baselines cannot be moved back.
    pub async fn baseline(&self, name: &str) -> Result<LogEntry> {
        let resolved = self
            .source
            .resolve(name)
            .await?
            .ok_or_else(|| MuvError::target_not_found(name, SearchSet::Known))?;
        let current = self.current_baseline().await?;

        if !version_higher(&resolved, &current, false) {
            return Err(MuvError::InvalidBaseline {
                name: resolved,
                current,
            });
        }

        let entry = self.log.log_entry(&resolved, EntryKind::Baseline).await?;
        info!(
            baseline = %entry.name,
            previous = current.as_deref().unwrap_or("0"),
            "Baseline moved"
        );
        Ok(entry)
    }

    /// Current version, baseline and pending migrations.
    pub async fn status(&self) -> Result<MigrationStatus> {
        Ok(MigrationStatus {
            current_version: self.current_version().await?,
            baseline: self.current_baseline().await?,
            pending: self.pending().await?,
        })
    }

    async fn run(&self, direction: Direction, migrations: Vec<String>) -> Result<Vec<String>> {
        if migrations.is_empty() {
            debug!(%direction, "Nothing to migrate");
            return Ok(migrations);
        }

        info!(%direction, count = migrations.len(), "Migrating");

        let mut done = Vec::with_capacity(migrations.len());
        for name in migrations {
            self.source.apply(&name, direction).await?;

            match direction {
                Direction::Up => {
                    self.log.log_entry(&name, EntryKind::Migration).await?;
                }
                Direction::Down => {
                    self.log.unlog_entry(&name).await?;
                }
            }

            info!(migration = %name, %direction, "Migrated");
            done.push(name);
        }

        Ok(done)
    }
}

/// Prefix of `pending` ending at the first name starting with `to`.
///
/// Without a target the whole list is returned.
pub fn slice_up(pending: Vec<String>, to: Option<&str>) -> Result<Vec<String>> {
    let Some(to) = to else {
        return Ok(pending);
    };

    let idx = pending
        .iter()
        .position(|name| name.starts_with(to))
        .ok_or_else(|| MuvError::target_not_found(to, SearchSet::Pending))?;

    let mut pending = pending;
    pending.truncate(idx + 1);
    Ok(pending)
}

/// Prefix of `executed` (most recent first) to revert.
///
/// Without a target only the most recent migration is returned;
/// [`ROLLBACK_ALL`] returns the whole list. Otherwise everything before the
/// first name starting with `to` is returned, excluding the match.
pub fn slice_down(executed: Vec<String>, to: Option<&str>) -> Result<Vec<String>> {
    let mut executed = executed;

    match to {
        None => {
            executed.truncate(1);
            Ok(executed)
        }
        Some(ROLLBACK_ALL) => Ok(executed),
        Some(to) => {
            let idx = executed
                .iter()
                .position(|name| name.starts_with(to))
                .ok_or_else(|| MuvError::target_not_found(to, SearchSet::ExecutedAboveBaseline))?;
            executed.truncate(idx);
            Ok(executed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muv_core::testing::{AppliedCall, MemoryVersionStore, MockMigrationSource};
    use muv_core::{assert_err_variant, assert_ok};

    fn list(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// A migrator whose source always offers `unrun`, over a prepared log.
    async fn with_log(unrun: &[&str], log: &[(&str, EntryKind)]) -> Migrator {
        let store = Arc::new(MemoryVersionStore::new());
        for (name, kind) in log {
            store.log_entry(name, *kind).await.unwrap();
        }
        let source = Arc::new(MockMigrationSource::new(unrun.iter().copied()));
        Migrator::new(store, source)
    }

    /// A migrator over an empty log whose source knows `known`.
    fn tracking(known: &[&str]) -> (Migrator, Arc<MemoryVersionStore>, Arc<MockMigrationSource>) {
        let store = Arc::new(MemoryVersionStore::new());
        let source = Arc::new(
            MockMigrationSource::new(known.iter().copied()).tracking(store.clone()),
        );
        let migrator = Migrator::new(store.clone(), source.clone());
        (migrator, store, source)
    }

    // slice_up

    #[test]
    fn test_slice_up_without_target_returns_all() {
        assert_eq!(slice_up(list(&["1", "2"]), None).unwrap(), ["1", "2"]);
        assert!(slice_up(Vec::new(), None).unwrap().is_empty());
    }

    #[test]
    fn test_slice_up_inclusive_exact_target() {
        let pending = list(&["1", "2", "3"]);
        assert_eq!(slice_up(pending.clone(), Some("1")).unwrap(), ["1"]);
        assert_eq!(slice_up(pending.clone(), Some("3")).unwrap(), pending);
    }

    #[test]
    fn test_slice_up_target_is_prefix() {
        let pending = list(&["1a", "2b", "3c", "3d"]);
        assert_eq!(slice_up(pending.clone(), Some("1")).unwrap(), ["1a"]);
        assert_eq!(
            slice_up(pending.clone(), Some("3")).unwrap(),
            ["1a", "2b", "3c"]
        );
        assert_eq!(slice_up(pending.clone(), Some("3d")).unwrap(), pending);
    }

    #[test]
    fn test_slice_up_unknown_target() {
        assert_err_variant!(
            slice_up(Vec::new(), Some("3")),
            MuvError::TargetNotFound {
                set: SearchSet::Pending,
                ..
            }
        );
        assert_err_variant!(
            slice_up(list(&["1", "2", "3"]), Some("5")),
            MuvError::TargetNotFound { .. }
        );
    }

    // slice_down

    #[test]
    fn test_slice_down_defaults_to_last() {
        assert_eq!(slice_down(list(&["3", "2", "1"]), None).unwrap(), ["3"]);
        assert!(slice_down(Vec::new(), None).unwrap().is_empty());
    }

    #[test]
    fn test_slice_down_zero_reverts_everything() {
        assert_eq!(
            slice_down(list(&["3", "2", "1"]), Some("0")).unwrap(),
            ["3", "2", "1"]
        );
        assert!(slice_down(Vec::new(), Some("0")).unwrap().is_empty());
    }

    #[test]
    fn test_slice_down_exclusive_target() {
        let executed = list(&["3", "2", "1"]);
        assert!(slice_down(executed.clone(), Some("3")).unwrap().is_empty());
        assert_eq!(slice_down(executed.clone(), Some("2")).unwrap(), ["3"]);
        assert_eq!(slice_down(executed, Some("1")).unwrap(), ["3", "2"]);
    }

    #[test]
    fn test_slice_down_target_is_prefix() {
        let executed = list(&["3d", "3c", "2b", "1a"]);
        assert!(slice_down(executed.clone(), Some("3")).unwrap().is_empty());
        assert!(slice_down(executed.clone(), Some("3d")).unwrap().is_empty());
        assert_eq!(slice_down(executed.clone(), Some("3c")).unwrap(), ["3d"]);
        assert_eq!(slice_down(executed.clone(), Some("2")).unwrap(), ["3d", "3c"]);
        assert_eq!(
            slice_down(executed, Some("1")).unwrap(),
            ["3d", "3c", "2b"]
        );
    }

    #[test]
    fn test_slice_down_unknown_target() {
        assert_err_variant!(
            slice_down(Vec::new(), Some("5")),
            MuvError::TargetNotFound {
                set: SearchSet::ExecutedAboveBaseline,
                ..
            }
        );
        assert_err_variant!(
            slice_down(list(&["3", "2", "1"]), Some("5")),
            MuvError::TargetNotFound { .. }
        );
    }

    // pending

    #[tokio::test]
    async fn test_pending_without_history_returns_all() {
        let migrator = with_log(&["1", "2"], &[]).await;
        assert_eq!(migrator.pending().await.unwrap(), ["1", "2"]);

        let migrator = with_log(&[], &[]).await;
        assert!(migrator.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pending_cut_above_baseline() {
        let unrun = ["1", "2", "3", "4", "5"];

        let migrator = with_log(&unrun, &[("3", EntryKind::Baseline)]).await;
        assert_eq!(migrator.pending().await.unwrap(), ["4", "5"]);

        let migrator = with_log(&unrun, &[("5", EntryKind::Baseline)]).await;
        assert!(migrator.pending().await.unwrap().is_empty());

        let migrator = with_log(&unrun, &[("9", EntryKind::Baseline)]).await;
        assert!(migrator.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pending_below_current_version_is_a_violation() {
        let unrun = ["1", "2", "3", "4", "5"];

        for current in ["1", "3", "9"] {
            let migrator = with_log(&unrun, &[(current, EntryKind::Migration)]).await;
            assert_err_variant!(
                migrator.pending().await,
                MuvError::ConsistencyViolation { .. }
            );
        }

        // Current version "3", baseline "2": candidate "3" is not above "3"
        let migrator = with_log(
            &unrun,
            &[("3", EntryKind::Migration), ("2", EntryKind::Baseline)],
        )
        .await;
        match migrator.pending().await {
            Err(MuvError::ConsistencyViolation { name, current }) => {
                assert_eq!(name, "3");
                assert_eq!(current.as_deref(), Some("3"));
            }
            other => panic!("expected ConsistencyViolation, got {:?}", other),
        }

        let migrator = with_log(
            &unrun,
            &[("3", EntryKind::Migration), ("3", EntryKind::Baseline)],
        )
        .await;
        assert_eq!(migrator.pending().await.unwrap(), ["4", "5"]);
    }

    // executed

    #[tokio::test]
    async fn test_executed_without_baseline() {
        let log = [("1", EntryKind::Migration), ("2", EntryKind::Migration)];
        let migrator = with_log(&[], &log).await;
        assert_eq!(migrator.executed(true).await.unwrap(), ["1", "2"]);
        assert!(migrator.executed(false).await.unwrap().is_empty());

        let migrator = with_log(&[], &[]).await;
        assert!(migrator.executed(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_executed_split_at_baseline() {
        let mut log: Vec<(&str, EntryKind)> = ["1", "2", "3", "4", "5"]
            .iter()
            .map(|n| (*n, EntryKind::Migration))
            .collect();

        log.push(("3", EntryKind::Baseline));
        let migrator = with_log(&[], &log).await;
        assert_eq!(migrator.executed(true).await.unwrap(), ["4", "5"]);
        assert_eq!(migrator.executed(false).await.unwrap(), ["1", "2", "3"]);

        log.push(("5", EntryKind::Baseline));
        let migrator = with_log(&[], &log).await;
        assert!(migrator.executed(true).await.unwrap().is_empty());
        assert_eq!(migrator.executed(false).await.unwrap().len(), 5);

        log.push(("9", EntryKind::Baseline));
        let migrator = with_log(&[], &log).await;
        assert!(migrator.executed(true).await.unwrap().is_empty());
        assert_eq!(migrator.executed(false).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_executed_keeps_application_order() {
        let log = [
            ("2", EntryKind::Migration),
            ("1", EntryKind::Migration),
            ("3", EntryKind::Migration),
        ];
        let migrator = with_log(&[], &log).await;
        assert_eq!(migrator.executed(true).await.unwrap(), ["2", "1", "3"]);
    }

    // downable

    #[tokio::test]
    async fn test_downable_reverses_application_order() {
        let log = [
            ("1", EntryKind::Migration),
            ("2", EntryKind::Migration),
            ("3", EntryKind::Migration),
        ];
        let migrator = with_log(&[], &log).await;
        assert_eq!(migrator.downable(None).await.unwrap(), ["3"]);
        assert_eq!(migrator.downable(Some("0")).await.unwrap(), ["3", "2", "1"]);
        assert_eq!(migrator.downable(Some("2")).await.unwrap(), ["3"]);
        assert_err_variant!(
            migrator.downable(Some("5")).await,
            MuvError::TargetNotFound { .. }
        );
    }

    // up / down

    #[tokio::test]
    async fn test_up_applies_and_logs_in_one_batch() {
        let (migrator, store, source) = tracking(&["1_a", "2_b", "3_c"]);

        let applied = migrator.up(None).await.unwrap();
        assert_eq!(applied, ["1_a", "2_b", "3_c"]);
        source.assert_applied(&["1_a", "2_b", "3_c"], Direction::Up);

        let entries = store.entries();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.batch == 1));
        assert!(migrator.pending().await.unwrap().is_empty());
        assert_eq!(migrator.current_version().await.unwrap().as_deref(), Some("3_c"));
    }

    #[tokio::test]
    async fn test_up_to_target() {
        let (migrator, _store, source) = tracking(&["1a", "2b", "3c", "3d"]);

        let applied = migrator.up(Some("3")).await.unwrap();
        assert_eq!(applied, ["1a", "2b", "3c"]);
        source.assert_applied(&["1a", "2b", "3c"], Direction::Up);
        assert_eq!(migrator.pending().await.unwrap(), ["3d"]);
    }

    #[tokio::test]
    async fn test_up_with_nothing_pending_has_no_side_effects() {
        let (migrator, store, source) = tracking(&[]);
        assert!(migrator.up(None).await.unwrap().is_empty());
        source.assert_nothing_applied();
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_up_unknown_target_runs_nothing() {
        let (migrator, store, source) = tracking(&["1_a"]);
        assert_err_variant!(
            migrator.up(Some("9")).await,
            MuvError::TargetNotFound { .. }
        );
        source.assert_nothing_applied();
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_up_failure_keeps_prior_successes_logged() {
        let (migrator, store, source) = tracking(&["1_a", "2_b", "3_c", "4_d"]);
        source.fail_on("3_c");

        assert_err_variant!(
            migrator.up(None).await,
            MuvError::MigrationExecution { .. }
        );

        source.assert_applied(&["1_a", "2_b", "3_c"], Direction::Up);
        let logged: Vec<String> = store.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(logged, ["1_a", "2_b"]);
        assert_eq!(migrator.pending().await.unwrap(), ["3_c", "4_d"]);
    }

    #[tokio::test]
    async fn test_each_invocation_gets_next_batch() {
        let store = Arc::new(MemoryVersionStore::new());
        let known = ["1_a", "2_b", "3_c"];

        let source = Arc::new(MockMigrationSource::new(known).tracking(store.clone()));
        Migrator::new(store.clone(), source)
            .up(Some("2"))
            .await
            .unwrap();

        let next = Arc::new(store.instance());
        let source = Arc::new(MockMigrationSource::new(known).tracking(next.clone()));
        Migrator::new(next, source).up(None).await.unwrap();

        let batches: Vec<(String, i32)> = store
            .entries()
            .into_iter()
            .map(|e| (e.name, e.batch))
            .collect();
        assert_eq!(
            batches,
            [
                ("1_a".to_string(), 1),
                ("2_b".to_string(), 1),
                ("3_c".to_string(), 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_down_reverts_single_by_default() {
        let (migrator, store, source) = tracking(&["1_a", "2_b", "3_c"]);
        migrator.up(None).await.unwrap();
        source.clear();

        assert_eq!(migrator.down(None).await.unwrap(), ["3_c"]);
        source.assert_applied(&["3_c"], Direction::Down);
        assert_eq!(store.entries().len(), 2);
        assert_eq!(migrator.pending().await.unwrap(), ["3_c"]);
    }

    #[tokio::test]
    async fn test_down_to_target_and_to_zero() {
        let (migrator, store, source) = tracking(&["1_a", "2_b", "3_c", "4_d"]);
        migrator.up(None).await.unwrap();
        source.clear();

        assert_eq!(migrator.down(Some("2")).await.unwrap(), ["4_d", "3_c"]);
        source.assert_applied(&["4_d", "3_c"], Direction::Down);

        source.clear();
        assert_eq!(migrator.down(Some("0")).await.unwrap(), ["2_b", "1_a"]);
        assert!(store.entries().is_empty());
        assert!(migrator.current_version().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_down_failure_keeps_failed_migration_logged() {
        let (migrator, store, source) = tracking(&["1_a", "2_b", "3_c"]);
        migrator.up(None).await.unwrap();
        source.fail_on("2_b");

        assert_err_variant!(
            migrator.down(Some("0")).await,
            MuvError::MigrationExecution { .. }
        );
        let logged: Vec<String> = store.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(logged, ["1_a", "2_b"]);
        assert_eq!(
            source.calls().last(),
            Some(&AppliedCall {
                name: "2_b".into(),
                direction: Direction::Down,
            })
        );
    }

    // plan

    #[tokio::test]
    async fn test_plan_has_no_side_effects() {
        let (migrator, store, source) = tracking(&["1_a", "2_b", "3_c"]);

        assert_eq!(
            migrator.plan(Direction::Up, Some("2")).await.unwrap(),
            ["1_a", "2_b"]
        );
        assert!(migrator.plan(Direction::Down, None).await.unwrap().is_empty());
        assert_err_variant!(
            migrator.plan(Direction::Up, Some("9")).await,
            MuvError::TargetNotFound { .. }
        );

        assert_eq!(store.schema_checks(), 0);
        assert!(store.entries().is_empty());
        source.assert_nothing_applied();
    }

    #[tokio::test]
    async fn test_plan_down_after_up() {
        let (migrator, store, source) = tracking(&["1_a", "2_b", "3_c"]);
        migrator.init().await.unwrap();
        migrator.up(None).await.unwrap();
        source.clear();

        assert_eq!(
            migrator.plan(Direction::Down, Some("0")).await.unwrap(),
            ["3_c", "2_b", "1_a"]
        );
        assert_eq!(store.entries().len(), 3);
        assert_eq!(store.schema_checks(), 1);
        source.assert_nothing_applied();
    }

    // baseline

    #[tokio::test]
    async fn test_baseline_skips_covered_migrations() {
        let (migrator, store, source) = tracking(&["1_a", "2_b", "3_c"]);

        let entry = migrator.baseline("2_b").await.unwrap();
        assert_eq!(entry.kind, EntryKind::Baseline);
        assert_eq!(migrator.current_baseline().await.unwrap().as_deref(), Some("2_b"));
        assert_eq!(migrator.current_version().await.unwrap().as_deref(), Some("2_b"));
        assert_eq!(migrator.pending().await.unwrap(), ["3_c"]);

        migrator.up(None).await.unwrap();
        source.assert_applied(&["3_c"], Direction::Up);
        assert_eq!(store.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_baseline_must_move_forward() {
        let (migrator, _store, _source) = tracking(&["1_a", "2_b", "3_c"]);
        migrator.baseline("2_b").await.unwrap();

        assert_err_variant!(
            migrator.baseline("2_b").await,
            MuvError::InvalidBaseline { .. }
        );
        assert_err_variant!(
            migrator.baseline("1_a").await,
            MuvError::InvalidBaseline { .. }
        );
        assert_ok!(migrator.baseline("3_c").await);
    }

    #[tokio::test]
    async fn test_baseline_by_prefix() {
        let (migrator, _store, _source) = tracking(&["20170401_bootstrap", "20170427_add_tags"]);
        let entry = migrator.baseline("20170427").await.unwrap();
        assert_eq!(entry.name, "20170427_add_tags");
    }

    #[tokio::test]
    async fn test_baseline_unknown_migration() {
        let (migrator, store, _source) = tracking(&["1_a"]);
        assert_err_variant!(
            migrator.baseline("7_z").await,
            MuvError::TargetNotFound {
                set: SearchSet::Known,
                ..
            }
        );
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_baseline_freezes_history_below_it() {
        let (migrator, _store, source) = tracking(&["1_a", "2_b", "3_c"]);
        migrator.up(None).await.unwrap();
        migrator.baseline("2_b").await.unwrap();
        source.clear();

        assert_eq!(migrator.executed(true).await.unwrap(), ["3_c"]);
        assert_eq!(migrator.executed(false).await.unwrap(), ["1_a", "2_b"]);

        assert_eq!(migrator.down(Some("0")).await.unwrap(), ["3_c"]);
        source.assert_applied(&["3_c"], Direction::Down);
        assert_err_variant!(
            migrator.down(Some("1")).await,
            MuvError::TargetNotFound { .. }
        );
    }

    #[tokio::test]
    async fn test_status_snapshot() {
        let (migrator, _store, _source) = tracking(&["1_a", "2_b", "3_c"]);
        migrator.up(Some("1")).await.unwrap();

        let status = migrator.status().await.unwrap();
        assert_eq!(
            status,
            MigrationStatus {
                current_version: Some("1_a".into()),
                baseline: None,
                pending: list(&["2_b", "3_c"]),
            }
        );
    }
}
