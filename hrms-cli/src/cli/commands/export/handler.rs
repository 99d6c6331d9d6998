use anyhow::Result;
use colored::*;

use super::ExportArgs;
use crate::cli::commands::today;
use crate::config::Config;
use crate::config::repository::staff;
use crate::roster::excel::save_staff_excel;

pub async fn handle_export_command(args: ExportArgs, config: &Config) -> Result<()> {
    let records = staff::list_staff(&config.pool).await?;
    let date_format = args
        .date_format
        .as_deref()
        .unwrap_or(&config.settings.export.date_format);

    save_staff_excel(&records, &args.output, today(), date_format)?;
    log::info!("Exported {} staff records", records.len());

    println!(
        "Exported {} staff records to {}",
        records.len().to_string().bright_green(),
        args.output.display().to_string().cyan()
    );
    Ok(())
}
