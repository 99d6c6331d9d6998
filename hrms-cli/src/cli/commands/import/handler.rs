use anyhow::{Context, Result};
use colored::*;

use super::ImportArgs;
use crate::config::Config;
use crate::config::repository::staff;
use crate::roster::import::{ImportSummary, import_staff_file};

pub async fn handle_import_command(args: ImportArgs, config: &Config) -> Result<()> {
    if !args.file.exists() {
        anyhow::bail!("Spreadsheet does not exist: {}", args.file.display());
    }

    let mut options = config.settings.import_options();
    if args.derive_retirement {
        options.derive_retirement = true;
    }

    let summary = import_staff_file(&config.pool, &args.file, options)
        .await
        .with_context(|| format!("Import of {} failed", args.file.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to format JSON output")?;
        println!("{}", json);
    } else {
        let on_file = staff::count_staff(&config.pool).await?;
        print_summary(&summary, on_file);
    }

    Ok(())
}

fn print_summary(summary: &ImportSummary, on_file: i64) {
    println!(
        "{} {} rows read, {} inserted, {} skipped",
        "Import complete:".bright_green().bold(),
        summary.total(),
        summary.inserted.to_string().bright_green(),
        if summary.skipped > 0 {
            summary.skipped.to_string().yellow()
        } else {
            summary.skipped.to_string().normal()
        }
    );
    println!("{} staff records on file", on_file.to_string().cyan());

    if summary.skipped_details.is_empty() {
        return;
    }

    println!();
    println!("{}", "Skipped rows:".yellow().bold());
    for skipped in &summary.skipped_details {
        println!("  row {:>5}  {}", skipped.row.to_string().cyan(), skipped.reason);
    }
}
