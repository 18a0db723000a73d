use anyhow::Result;
use console::style;

use muv_core::source::Direction;
use muv_runtime::{MigrationStatus, Migrator};

use super::Context;

/// Show the schema version, baseline and pending migrations.
pub async fn execute(ctx: &Context) -> Result<()> {
    let migrator = ctx.migrator().await?;
    print_status(&migrator).await
}

/// Print the current schema state.
pub async fn print_status(migrator: &Migrator) -> Result<()> {
    let status = migrator.status().await?;

    println!("{}", style(schema_version_line(&status)).bold());
    println!("{}", pending_heading(status.pending.len()));
    for name in &status.pending {
        println!("  {}", style(name).yellow());
    }
    Ok(())
}

/// Print one migration of a run or a dry run.
pub fn print_migration(direction: Direction, name: &str) {
    let arrow = match direction {
        Direction::Up => style(direction.arrow()).green(),
        Direction::Down => style(direction.arrow()).red(),
    };
    println!("{} {}", arrow, name);
}

/// Print the success marker.
pub fn print_ok() {
    println!("{} ok", style("✓").green());
}

fn schema_version_line(status: &MigrationStatus) -> String {
    let version = status.current_version.as_deref().unwrap_or("0");
    match &status.baseline {
        Some(baseline) => format!("Schema version {} (baseline {})", version, baseline),
        None => format!("Schema version {}", version),
    }
}

fn pending_heading(count: usize) -> String {
    format!(
        "Pending {} migration{}",
        count,
        if count == 1 { "" } else { "s" }
    )
}
