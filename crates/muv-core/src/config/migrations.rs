use serde::{Deserialize, Serialize};

use crate::error::{MuvError, Result};

/// Postgres truncates identifiers longer than this.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Migration discovery and log table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationsConfig {
    /// Directory holding the migration files.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Name of the log table.
    #[serde(default = "default_table_name")]
    pub table_name: String,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            table_name: default_table_name(),
        }
    }
}

impl MigrationsConfig {
    pub fn validate(&self) -> Result<()> {
        validate_table_name(&self.table_name)
    }
}

fn default_directory() -> String {
    "migrations".to_string()
}

fn default_table_name() -> String {
    "_migrations".to_string()
}

/// Check that a log table name is safe to interpolate into SQL.
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest || name.len() > MAX_IDENTIFIER_LEN {
        return Err(MuvError::Config(format!(
            "Invalid migrations table name '{}': expected a plain SQL identifier",
            name
        )));
    }
    Ok(())
}
