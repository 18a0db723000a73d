mod database;
mod migrations;

pub use database::DatabaseConfig;
pub use migrations::{validate_table_name, MigrationsConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{MuvError, Result};

/// Environment used when neither `--env` nor `MUV_ENV` is set.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Root configuration for muv.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuvConfig {
    /// Database configuration.
    pub database: DatabaseConfig,

    /// Migration discovery and log table configuration.
    #[serde(default)]
    pub migrations: MigrationsConfig,
}

impl MuvConfig {
    /// Load configuration from a TOML file, applying overrides for `env`.
    pub fn from_file(path: impl AsRef<Path>, env: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| MuvError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_toml(&content, env)
    }

    /// Parse configuration from a TOML string.
    ///
    /// An `[environments.<env>]` table, when present, is merged over the root
    /// tables key by key.
    pub fn parse_toml(content: &str, env: &str) -> Result<Self> {
        // Substitute environment variables
        let content = substitute_env_vars(content);

        let mut root: toml::Table = toml::from_str(&content)
            .map_err(|e| MuvError::Config(format!("Failed to parse config: {}", e)))?;

        let environments = root.remove("environments");
        if let Some(overrides) = environments
            .as_ref()
            .and_then(|v| v.get(env))
            .and_then(|v| v.as_table())
        {
            debug!(env, "Applying environment overrides");
            merge_tables(&mut root, overrides);
        }

        let config: MuvConfig = toml::Value::Table(root)
            .try_into()
            .map_err(|e| MuvError::Config(format!("Failed to parse config: {}", e)))?;

        config.migrations.validate()?;
        Ok(config)
    }

    /// Configuration with defaults and the given database URL.
    pub fn default_with_database_url(url: &str) -> Self {
        Self {
            database: DatabaseConfig {
                url: url.to_string(),
                ..Default::default()
            },
            migrations: MigrationsConfig::default(),
        }
    }
}

/// Pick the active environment: explicit flag, then `MUV_ENV`, then the default.
pub fn resolve_environment(flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| std::env::var("MUV_ENV").ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

fn merge_tables(base: &mut toml::Table, overrides: &toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> String {
    let mut result = content.to_string();
    let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid pattern");

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}
