mod baseline;
mod context;
mod log;
mod make;
mod migrate;
mod status;

pub use baseline::BaselineCommand;
pub use context::{Context, GlobalArgs};
pub use make::MakeCommand;
pub use migrate::MigrateCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use muv_core::source::Direction;

/// muv - Baseline-aware PostgreSQL migrations
#[derive(Parser)]
#[command(name = "muv")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:
  muv up                  # migrate everything
  muv up --to 20160905    # migrate up to a given version
  muv down --to 0         # roll back everything down to the baseline
  muv down                # roll back a single migration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the schema version, baseline and pending migrations.
    Status,

    /// List executed migrations since the baseline.
    Log,

    /// Move the baseline to a migration.
    Baseline(BaselineCommand),

    /// Apply pending migrations.
    Up(MigrateCommand),

    /// Roll back executed migrations (the last one by default).
    Down(MigrateCommand),

    /// Create a new migration file.
    Make(MakeCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        let ctx = Context::load(&self.global)?;
        if ctx.verbose {
            ctx.describe();
        }

        match self.command {
            Commands::Status => status::execute(&ctx).await,
            Commands::Log => log::execute(&ctx).await,
            Commands::Baseline(cmd) => cmd.execute(&ctx).await,
            Commands::Up(cmd) => cmd.execute(&ctx, Direction::Up).await,
            Commands::Down(cmd) => cmd.execute(&ctx, Direction::Down).await,
            Commands::Make(cmd) => cmd.execute(&ctx),
        }
    }
}
