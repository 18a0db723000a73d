pub mod db;
pub mod migrations;

pub use db::Database;
pub use migrations::{
    DirectorySource, MigrationGenerator, MigrationStatus, Migrator, MigratorConfig,
    PgVersionStore,
};
