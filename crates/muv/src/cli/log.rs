use anyhow::Result;
use console::style;

use super::Context;

const BANNER: &str = "------";

/// List executed migrations since the baseline.
///
/// Under `--verbose` the migrations at or below the baseline are listed too,
/// above the baseline banner.
pub async fn execute(ctx: &Context) -> Result<()> {
    let migrator = ctx.migrator().await?;

    let above = migrator.executed(true).await?;
    let below = if ctx.verbose {
        migrator.executed(false).await?
    } else {
        Vec::new()
    };
    let baseline = migrator.current_baseline().await?;

    for line in log_lines(&below, baseline.as_deref(), &above) {
        match line {
            Line::Migration(name) => println!("{}", name),
            Line::Frozen(name) => println!("{}", style(name).dim()),
            Line::Banner(text) => println!("{}", style(text).cyan()),
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Frozen(&'a str),
    Banner(String),
    Migration(&'a str),
}

fn log_lines<'a>(below: &'a [String], baseline: Option<&str>, above: &'a [String]) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = below.iter().map(|n| Line::Frozen(n)).collect();

    if let Some(baseline) = baseline {
        lines.push(Line::Banner(BANNER.to_string()));
        lines.push(Line::Banner(format!("Baseline: {}", baseline)));
        lines.push(Line::Banner(BANNER.to_string()));
    }

    lines.extend(above.iter().map(|n| Line::Migration(n)));
    lines
}
