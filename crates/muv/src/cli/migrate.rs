use anyhow::Result;
use clap::Parser;
use console::style;

use muv_core::source::Direction;

use super::status::{print_migration, print_ok, print_status};
use super::Context;

/// Apply or roll back migrations.
#[derive(Parser)]
pub struct MigrateCommand {
    /// Migrate up to (or down to) the first migration starting with this
    /// name. For `down`, `0` rolls back everything above the baseline.
    #[arg(short, long)]
    pub to: Option<String>,

    /// Only list the migrations that would run.
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

impl MigrateCommand {
    pub async fn execute(self, ctx: &Context, direction: Direction) -> Result<()> {
        let migrator = ctx.connect().await?;
        let to = self.to.as_deref();

        if self.dry_run {
            println!(
                "{}",
                style(format!(
                    "Dry run for \"{}\":",
                    direction.to_string().to_uppercase()
                ))
                .bold()
            );
            for name in &migrator.plan(direction, to).await? {
                print_migration(direction, name);
            }
            return Ok(());
        }

        migrator.init().await?;

        let migrated = match direction {
            Direction::Up => migrator.up(to).await?,
            Direction::Down => migrator.down(to).await?,
        };
        for name in &migrated {
            print_migration(direction, name);
        }
        print_ok();

        print_status(&migrator).await
    }
}
