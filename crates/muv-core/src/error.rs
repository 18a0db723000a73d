use std::fmt;

use thiserror::Error;

use crate::source::Direction;

/// The candidate set a `--to` target was searched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSet {
    /// Migrations waiting to be applied.
    Pending,
    /// Logged migrations above the current baseline.
    ExecutedAboveBaseline,
    /// Every migration the source knows about.
    Known,
}

impl fmt::Display for SearchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::ExecutedAboveBaseline => write!(f, "executed above baseline"),
            Self::Known => write!(f, "known"),
        }
    }
}

/// Core error type for muv operations.
#[derive(Error, Debug)]
pub enum MuvError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error(
        "Pending migrations must be higher than {}: \"{name}\" is not",
        .current.as_deref().unwrap_or("0")
    )]
    ConsistencyViolation {
        name: String,
        current: Option<String>,
    },

    #[error(
        "New baseline ({name}) must be higher than current ({})",
        .current.as_deref().unwrap_or("0")
    )]
    InvalidBaseline {
        name: String,
        current: Option<String>,
    },

    #[error("No migration with name \"{target}\" in the {set} set")]
    TargetNotFound { target: String, set: SearchSet },

    #[error("Migration {name} failed ({direction}): {message}")]
    MigrationExecution {
        name: String,
        direction: Direction,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MuvError {
    pub fn target_not_found(target: impl Into<String>, set: SearchSet) -> Self {
        Self::TargetNotFound {
            target: target.into(),
            set,
        }
    }
}

impl From<sqlx::Error> for MuvError {
    fn from(e: sqlx::Error) -> Self {
        MuvError::StorageUnavailable(e.to_string())
    }
}

/// Result type alias using MuvError.
pub type Result<T> = std::result::Result<T, MuvError>;
