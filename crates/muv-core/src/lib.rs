pub mod config;
pub mod error;
pub mod source;
pub mod store;
pub mod version;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::MuvConfig;
pub use error::{MuvError, Result, SearchSet};
pub use source::{Direction, MigrationSource};
pub use store::VersionLog;
pub use version::{compare_versions, version_higher, version_lower, EntryKind, LogEntry};
