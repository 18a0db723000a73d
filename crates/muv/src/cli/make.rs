use anyhow::Result;
use clap::Parser;
use console::style;

use muv_runtime::MigrationGenerator;

use super::Context;

/// Create a new migration file.
#[derive(Parser)]
pub struct MakeCommand {
    /// Migration name (letters, digits, '_' or '-').
    pub name: String,
}

impl MakeCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let generator = MigrationGenerator::new(&ctx.migrations_dir);
        let path = generator.create(&self.name)?;

        println!(
            "{} Created migration file {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::GlobalArgs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_make_creates_directory_and_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("muv.toml"),
            "[database]\nurl = \"postgres://localhost/app\"\n",
        )
        .unwrap();

        let ctx = Context::load(&GlobalArgs {
            cwd: Some(dir.path().to_path_buf()),
            config: PathBuf::from("muv.toml"),
            migrations: None,
            env: Some("development".into()),
            verbose: false,
        })
        .unwrap();

        MakeCommand {
            name: "bootstrap".into(),
        }
        .execute(&ctx)
        .unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path().join("migrations"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("_bootstrap.sql"));
    }
}
