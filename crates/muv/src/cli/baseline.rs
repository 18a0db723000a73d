use anyhow::Result;
use clap::Parser;
use console::style;

use super::status::{print_ok, print_status};
use super::Context;

/// Move the baseline to a migration.
#[derive(Parser)]
pub struct BaselineCommand {
    /// Migration name, file name or prefix to move the baseline to.
    pub name: String,
}

impl BaselineCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let migrator = ctx.migrator().await?;
        let current = migrator.current_baseline().await?;

        let entry = migrator.baseline(&self.name).await?;
        println!(
            "Moving baseline {} .. {}",
            style(current.as_deref().unwrap_or("0")).dim(),
            style(&entry.name).cyan()
        );
        print_ok();

        print_status(&migrator).await
    }
}
