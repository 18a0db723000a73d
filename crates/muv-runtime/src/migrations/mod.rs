mod generator;
mod migrator;
mod script;
mod source;
mod store;

pub use generator::MigrationGenerator;
pub use migrator::{
    slice_down, slice_up, MigrationStatus, Migrator, MigratorConfig, ROLLBACK_ALL,
};
pub use script::{statements, MigrationScript, DOWN_MARKER, UP_MARKER};
pub use source::{list_migration_files, DirectorySource, MigrationFile, MIGRATION_EXTENSION};
pub use store::PgVersionStore;
