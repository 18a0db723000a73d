use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::info;

use muv_core::error::{MuvError, Result};

use super::script::{DOWN_MARKER, UP_MARKER};
use super::source::MIGRATION_EXTENSION;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid pattern"))
}

/// Creates empty migration files.
pub struct MigrationGenerator {
    /// Output directory for migrations.
    output_dir: PathBuf,
}

impl MigrationGenerator {
    /// Create a new migration generator.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory new migrations are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create `<timestamp>_<name>.sql` stamped with the current time.
    pub fn create(&self, name: &str) -> Result<PathBuf> {
        self.create_at(name, Utc::now())
    }

    /// Create a migration file stamped with `now`.
    ///
    /// The directory is created if needed. An existing file is never
    /// overwritten.
    pub fn create_at(&self, name: &str, now: DateTime<Utc>) -> Result<PathBuf> {
        if !name_pattern().is_match(name) {
            return Err(MuvError::InvalidArgument(format!(
                "Invalid migration name '{}': use letters, digits, '_' or '-'",
                name
            )));
        }

        std::fs::create_dir_all(&self.output_dir)?;

        let file_name = format!(
            "{}_{}.{}",
            now.format("%Y%m%d%H%M%S"),
            name,
            MIGRATION_EXTENSION
        );
        let path = self.output_dir.join(file_name);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                MuvError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create migration {:?}: {}", path, e),
                ))
            })?;

        file.write_all(template(name, now).as_bytes())?;

        info!(path = %path.display(), "Created migration");
        Ok(path)
    }
}

fn template(name: &str, now: DateTime<Utc>) -> String {
    format!(
        "-- Migration: {}\n-- Created at: {}\n\n{}\n\n\n{}\n\n",
        name,
        now.format("%Y-%m-%d %H:%M:%S UTC"),
        UP_MARKER,
        DOWN_MARKER
    )
}
