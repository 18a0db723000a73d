//! Log entries and version ordering.
//!
//! Migration identifiers are compared as opaque strings. `"10"` sorts below
//! `"9"`; fixed-width numeric prefixes are the caller's responsibility.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::MuvError;

/// Kind of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A migration script that was executed.
    Migration,
    /// A declared baseline, never backed by script execution.
    Baseline,
}

impl EntryKind {
    /// Value stored in the `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Migration => "migration",
            Self::Baseline => "baseline",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = MuvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "migration" => Ok(Self::Migration),
            "baseline" => Ok(Self::Baseline),
            other => Err(MuvError::InvalidArgument(format!(
                "Unknown log entry type '{}'",
                other
            ))),
        }
    }
}

/// One row of the migration log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Insertion order, assigned by the store.
    pub id: i64,
    /// Entry kind.
    pub kind: EntryKind,
    /// Migration identifier.
    pub name: String,
    /// Batch the entry was written in.
    pub batch: i32,
    /// When the entry was written.
    pub migration_time: DateTime<Utc>,
}

/// Anything that carries a version name.
///
/// `None` reads as the empty string, which sorts below every real name.
pub trait AsVersion {
    fn version(&self) -> &str;
}

impl AsVersion for str {
    fn version(&self) -> &str {
        self
    }
}

impl AsVersion for String {
    fn version(&self) -> &str {
        self
    }
}

impl AsVersion for LogEntry {
    fn version(&self) -> &str {
        &self.name
    }
}

impl<T: AsVersion + ?Sized> AsVersion for &T {
    fn version(&self) -> &str {
        (**self).version()
    }
}

impl<T: AsVersion> AsVersion for Option<T> {
    fn version(&self) -> &str {
        self.as_ref().map_or("", |v| v.version())
    }
}

/// Compare two versions by name.
pub fn compare_versions<A, B>(a: &A, b: &B) -> Ordering
where
    A: AsVersion + ?Sized,
    B: AsVersion + ?Sized,
{
    a.version().cmp(b.version())
}

/// Whether `of` is above `than` (or equal to it, when `or_equal` is set).
pub fn version_higher<A, B>(of: &A, than: &B, or_equal: bool) -> bool
where
    A: AsVersion + ?Sized,
    B: AsVersion + ?Sized,
{
    match compare_versions(of, than) {
        Ordering::Greater => true,
        Ordering::Equal => or_equal,
        Ordering::Less => false,
    }
}

/// Whether `of` is below `than` (or equal to it, when `or_equal` is set).
pub fn version_lower<A, B>(of: &A, than: &B, or_equal: bool) -> bool
where
    A: AsVersion + ?Sized,
    B: AsVersion + ?Sized,
{
    match compare_versions(of, than) {
        Ordering::Less => true,
        Ordering::Equal => or_equal,
        Ordering::Greater => false,
    }
}

/// The effective schema level: the higher of the last migration and the
/// last baseline.
pub fn effective_version(
    last_migration: Option<LogEntry>,
    last_baseline: Option<LogEntry>,
) -> Option<LogEntry> {
    match (last_migration, last_baseline) {
        (Some(m), Some(b)) => {
            if version_higher(&b, &m, true) {
                Some(b)
            } else {
                Some(m)
            }
        }
        (m, b) => m.or(b),
    }
}
