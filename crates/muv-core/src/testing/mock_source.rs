//! Mock execution collaborator.
//!
//! Records every `apply` call so tests can check which migrations ran, in
//! which order and direction, without touching a database.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use futures::future::BoxFuture;

use crate::error::{MuvError, Result};
use crate::source::{Direction, MigrationSource};
use crate::store::VersionLog;
use crate::version::EntryKind;

/// Record of one `apply` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCall {
    pub name: String,
    pub direction: Direction,
}

/// Mock migration source for testing.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(MemoryVersionStore::new());
/// let source = MockMigrationSource::new(["1_a", "2_b"]).tracking(store.clone());
/// source.fail_on("2_b");
///
/// source.apply("1_a", Direction::Up).await?;
/// source.assert_applied(&["1_a"], Direction::Up);
/// ```
pub struct MockMigrationSource {
    known: Vec<String>,
    store: Option<Arc<dyn VersionLog>>,
    calls: RwLock<Vec<AppliedCall>>,
    failing: RwLock<HashSet<String>>,
}

impl MockMigrationSource {
    /// Create a source that knows these migrations.
    pub fn new<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known: Vec<String> = known.into_iter().map(Into::into).collect();
        known.sort();
        Self {
            known,
            store: None,
            calls: RwLock::new(Vec::new()),
            failing: RwLock::new(HashSet::new()),
        }
    }

    /// Exclude migrations logged in `store` from `candidates()`.
    pub fn tracking(mut self, store: Arc<dyn VersionLog>) -> Self {
        self.store = Some(store);
        self
    }

    /// Make every `apply` of this migration fail.
    pub fn fail_on(&self, name: &str) {
        self.failing.write().unwrap().insert(name.to_string());
    }

    /// All recorded calls in order.
    pub fn calls(&self) -> Vec<AppliedCall> {
        self.calls.read().unwrap().clone()
    }

    /// Assert the exact sequence of successful and failed `apply` calls.
    pub fn assert_applied(&self, expected: &[&str], direction: Direction) {
        let calls = self.calls.read().unwrap();
        let actual: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            actual, expected,
            "Expected migrations {:?} to run {}, but ran {:?}",
            expected, direction, actual
        );
        assert!(
            calls.iter().all(|c| c.direction == direction),
            "Expected all migrations to run {}, got {:?}",
            direction,
            calls
        );
    }

    /// Assert that no migration was run.
    pub fn assert_nothing_applied(&self) {
        let calls = self.calls.read().unwrap();
        assert!(
            calls.is_empty(),
            "Expected no migrations to run, but ran {:?}",
            calls
        );
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls.write().unwrap().clear();
    }
}

impl MigrationSource for MockMigrationSource {
    fn candidates(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        Box::pin(async move {
            let logged: HashSet<String> = match &self.store {
                Some(store) => store
                    .entries_by_type(EntryKind::Migration)
                    .await?
                    .into_iter()
                    .map(|e| e.name)
                    .collect(),
                None => HashSet::new(),
            };

            Ok(self
                .known
                .iter()
                .filter(|name| !logged.contains(*name))
                .cloned()
                .collect())
        })
    }

    fn resolve<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            if name.is_empty() {
                return Ok(None);
            }
            Ok(self.known.iter().find(|k| k.starts_with(name)).cloned())
        })
    }

    fn apply<'a>(&'a self, name: &'a str, direction: Direction) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.calls.write().unwrap().push(AppliedCall {
                name: name.to_string(),
                direction,
            });

            if self.failing.read().unwrap().contains(name) {
                return Err(MuvError::MigrationExecution {
                    name: name.to_string(),
                    direction,
                    message: "mock failure".into(),
                });
            }
            Ok(())
        })
    }
}
