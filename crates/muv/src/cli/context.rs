use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use console::style;
use tracing::debug;

use muv_core::config::{resolve_environment, MuvConfig};
use muv_runtime::{Database, Migrator, MigratorConfig};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "muv.toml";

/// Options shared by every command.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Working directory.
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Configuration file path, relative to the working directory.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Migrations directory (overrides config).
    #[arg(long, global = true)]
    pub migrations: Option<PathBuf>,

    /// Environment ($MUV_ENV or "development").
    #[arg(long, global = true)]
    pub env: Option<String>,

    /// Be more verbose.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Resolved settings for one invocation.
#[derive(Debug)]
pub struct Context {
    pub cwd: PathBuf,
    pub env: String,
    pub config_path: PathBuf,
    pub config: MuvConfig,
    pub migrations_dir: PathBuf,
    pub verbose: bool,
}

impl Context {
    /// Resolve the working directory, environment and configuration.
    ///
    /// A `.env` file in the working directory is loaded first, so it can
    /// provide `MUV_ENV`, `DATABASE_URL` and `${VAR}` values.
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let cwd = match &args.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir()?,
        };

        dotenvy::from_path(cwd.join(".env")).ok();

        let env = resolve_environment(args.env.as_deref());
        let config_path = cwd.join(&args.config);

        let config = if config_path.exists() {
            debug!("Loading configuration from {:?}", config_path);
            MuvConfig::from_file(&config_path, &env)?
        } else if let Ok(url) = std::env::var("DATABASE_URL") {
            debug!("No config file at {:?}, using DATABASE_URL", config_path);
            MuvConfig::default_with_database_url(&url)
        } else {
            bail!(
                "No config file at '{}'\nCreate one or set DATABASE_URL.",
                config_path.display()
            );
        };

        let migrations_dir = cwd.join(
            args.migrations
                .as_deref()
                .unwrap_or_else(|| Path::new(&config.migrations.directory)),
        );

        Ok(Self {
            cwd,
            env,
            config_path,
            config,
            migrations_dir,
            verbose: args.verbose,
        })
    }

    /// Connect to the database and prepare the migration log.
    pub async fn migrator(&self) -> Result<Migrator> {
        let migrator = self.connect().await?;
        migrator.init().await?;
        Ok(migrator)
    }

    /// Connect to the database without creating the migration log.
    pub async fn connect(&self) -> Result<Migrator> {
        if !self.migrations_dir.is_dir() {
            bail!(
                "No migrations directory at '{}'\nCreate your first migration with 'muv make <name>'.",
                self.migrations_dir.display()
            );
        }

        let db = Database::from_config(&self.config.database).await?;
        let migrator = Migrator::from_config(MigratorConfig {
            pool: db.pool().clone(),
            migrations_dir: self.migrations_dir.clone(),
            table_name: self.config.migrations.table_name.clone(),
        })?;
        Ok(migrator)
    }

    /// Print the resolved settings.
    pub fn describe(&self) {
        println!("{}", style("Created migrator with environment:").bold());
        println!("{}", style("======").dim());
        println!("cwd:        {}", self.cwd.display());
        println!("env:        {}", self.env);
        println!("config:     {}", self.config_path.display());
        println!("migrations: {}", self.migrations_dir.display());
        println!("table:      {}", self.config.migrations.table_name);
        println!("{}\n", style("======").dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(cwd: &Path) -> GlobalArgs {
        GlobalArgs {
            cwd: Some(cwd.to_path_buf()),
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            migrations: None,
            env: Some("development".into()),
            verbose: false,
        }
    }

    fn write_config(dir: &Path) {
        std::fs::write(
            dir.join(DEFAULT_CONFIG_FILE),
            r#"
[database]
url = "postgres://localhost/app_dev"

[migrations]
directory = "db/migrations"

[environments.test.database]
url = "postgres://localhost/app_test"

[environments.test.migrations]
table_name = "schema_log"
"#,
        )
        .unwrap();
    }

    #[test]
    fn test_load_from_config_file() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path());

        let ctx = Context::load(&args(dir.path())).unwrap();
        assert_eq!(ctx.env, "development");
        assert_eq!(ctx.config.database.url, "postgres://localhost/app_dev");
        assert_eq!(ctx.config.migrations.table_name, "_migrations");
        assert_eq!(ctx.migrations_dir, dir.path().join("db/migrations"));
    }

    #[test]
    fn test_load_environment_overrides() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path());

        let mut args = args(dir.path());
        args.env = Some("test".into());
        let ctx = Context::load(&args).unwrap();
        assert_eq!(ctx.config.database.url, "postgres://localhost/app_test");
        assert_eq!(ctx.config.migrations.table_name, "schema_log");
        assert_eq!(ctx.migrations_dir, dir.path().join("db/migrations"));
    }

    #[test]
    fn test_migrations_flag_overrides_config() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path());

        let mut args = args(dir.path());
        args.migrations = Some(PathBuf::from("sql"));
        let ctx = Context::load(&args).unwrap();
        assert_eq!(ctx.migrations_dir, dir.path().join("sql"));
    }

    #[tokio::test]
    async fn test_missing_migrations_dir_fails_before_connecting() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path());

        let ctx = Context::load(&args(dir.path())).unwrap();
        let err = ctx.migrator().await.err().unwrap();
        assert!(err.to_string().contains("No migrations directory"));

        let err = ctx.connect().await.err().unwrap();
        assert!(err.to_string().contains("No migrations directory"));
    }
}
