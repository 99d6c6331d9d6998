use anyhow::{Context, Result};
use colored::*;
use sqlx::SqlitePool;

use super::LeaveCommands;
use crate::cli::commands::or_dash;
use crate::config::Config;
use crate::config::repository::{leave, staff};
use crate::roster::types::{NewLeave, RecordError, parse_text_date};

pub async fn handle_leave_command(command: LeaveCommands, config: &Config) -> Result<()> {
    match command {
        LeaveCommands::Add {
            pf_no,
            leave_type,
            from,
            to,
            remarks,
        } => {
            let entry = new_leave(&pf_no, &leave_type, &from, &to, remarks)?;
            let id = add_leave(&config.pool, &entry).await?;
            println!(
                "{} #{} for {}: {} day(s)",
                "Recorded leave".bright_green().bold(),
                id,
                entry.pf_no.cyan(),
                entry.days()
            );
            Ok(())
        }
        LeaveCommands::List { pf_no, json } => {
            let pf_no = pf_no.trim();
            let record = staff::get_staff(&config.pool, pf_no)
                .await?
                .ok_or_else(|| RecordError::NotFound(pf_no.to_string()))?;

            let entries = leave::list_leaves(&config.pool, pf_no).await?;
            if json {
                let json = serde_json::to_string_pretty(&entries)
                    .context("Failed to format JSON output")?;
                println!("{}", json);
                return Ok(());
            }

            println!(
                "{} {}  {}",
                record.pf_no.cyan().bold(),
                record.display_name(),
                or_dash(record.designation.as_deref()).dimmed()
            );
            if entries.is_empty() {
                println!("{}", format!("No leave recorded for {}", pf_no).yellow());
                return Ok(());
            }
            println!(
                "{:<6} {:<10} {:<10} {:<10} {:>5}  {}",
                "ID".bold(),
                "TYPE".bold(),
                "FROM".bold(),
                "TO".bold(),
                "DAYS".bold(),
                "REMARKS".bold()
            );
            for entry in &entries {
                println!(
                    "{:<6} {:<10} {:<10} {:<10} {:>5}  {}",
                    entry.id,
                    entry.leave_type.cyan(),
                    entry.from_date.format("%d/%m/%Y"),
                    entry.to_date.format("%d/%m/%Y"),
                    entry.days,
                    or_dash(entry.remarks.as_deref())
                );
            }
            let total: i64 = entries.iter().map(|e| e.days).sum();
            println!();
            println!("{} days in total", total.to_string().bright_green());
            Ok(())
        }
    }
}

fn new_leave(
    pf_no: &str,
    leave_type: &str,
    from: &str,
    to: &str,
    remarks: Option<String>,
) -> Result<NewLeave> {
    let leave_type = leave_type.trim();
    if leave_type.is_empty() {
        anyhow::bail!("Leave type is required");
    }
    let from = parse_text_date(from).ok_or_else(|| RecordError::InvalidDate(from.to_string()))?;
    let to = parse_text_date(to).ok_or_else(|| RecordError::InvalidDate(to.to_string()))?;

    Ok(NewLeave::new(pf_no.trim(), leave_type, from, to, remarks)?)
}

/// Store a leave entry for an existing staff member
async fn add_leave(pool: &SqlitePool, entry: &NewLeave) -> Result<i64> {
    if !staff::staff_exists(pool, &entry.pf_no).await? {
        return Err(RecordError::NotFound(entry.pf_no.clone()).into());
    }
    let id = leave::insert_leave(pool, entry).await?;
    log::info!("Recorded {} leave {} for {}", entry.leave_type, id, entry.pf_no);
    Ok(id)
}
