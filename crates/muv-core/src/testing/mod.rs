//! Testing utilities for muv.
//!
//! In-memory doubles for the two seams the migrator talks through: the
//! migration log (`MemoryVersionStore`) and the execution collaborator
//! (`MockMigrationSource`). Neither needs a database.
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(MemoryVersionStore::new());
//! let source = Arc::new(MockMigrationSource::new(["1_a", "2_b"]).tracking(store.clone()));
//! let migrator = Migrator::new(store, source.clone());
//!
//! migrator.up(None).await?;
//! source.assert_applied(&["1_a", "2_b"], Direction::Up);
//! ```

pub mod assertions;
pub mod mock_source;
pub mod mock_store;

pub use mock_source::{AppliedCall, MockMigrationSource};
pub use mock_store::MemoryVersionStore;
