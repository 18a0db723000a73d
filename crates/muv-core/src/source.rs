//! The execution collaborator seam.

use std::fmt;

use futures::future::BoxFuture;

use crate::error::Result;

/// Direction a migration is run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Arrow used when printing a migration being run.
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// Discovers and runs migration scripts.
pub trait MigrationSource: Send + Sync {
    /// Known migrations not yet logged as executed, sorted ascending.
    fn candidates(&self) -> BoxFuture<'_, Result<Vec<String>>>;

    /// The first known migration, in name order, whose identifier starts
    /// with `name`.
    fn resolve<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<String>>>;

    /// Run one migration in its own transaction.
    ///
    /// Failures are reported as `MuvError::MigrationExecution`.
    fn apply<'a>(&'a self, name: &'a str, direction: Direction) -> BoxFuture<'a, Result<()>>;
}
