use anyhow::{Context, Result};
use colored::*;

use super::{ListFormat, StaffCommands, StaffFieldArgs};
use crate::cli::commands::{format_date, or_dash, today};
use crate::config::Config;
use crate::config::repository::{SqliteSession, StaffStore, leave, staff};
use crate::roster::columns::{FieldKind, StaffField};
use crate::roster::import::MISSING_IDENTIFIER;
use crate::roster::report::filter_value;
use crate::roster::types::{RecordError, StaffRecord};

pub async fn handle_staff_command(command: StaffCommands, config: &Config) -> Result<()> {
    match command {
        StaffCommands::List {
            designation,
            bill_unit,
            format,
        } => list(config, designation, bill_unit, format).await,
        StaffCommands::Show { pf_no } => show(config, &pf_no).await,
        StaffCommands::Add { pf_no, fields } => {
            let assignments = fields.assignments()?;
            let mut session = SqliteSession::begin(&config.pool).await?;
            let record = add_staff(
                &mut session,
                &pf_no,
                assignments,
                config.settings.import.retirement_age_years,
            )
            .await?;
            println!(
                "{} {} ({})",
                "Added".bright_green().bold(),
                record.pf_no.cyan(),
                record.display_name()
            );
            Ok(())
        }
        StaffCommands::Edit { pf_no, fields } => edit(config, &pf_no, &fields).await,
    }
}

async fn edit(config: &Config, pf_no: &str, fields: &StaffFieldArgs) -> Result<()> {
    let assignments = fields.assignments()?;
    if assignments.is_empty() {
        anyhow::bail!("Nothing to change: pass field flags or --set HEADER=VALUE");
    }

    let mut session = SqliteSession::begin(&config.pool).await?;
    let record = edit_staff(&mut session, pf_no, assignments).await?;
    println!(
        "{} {} ({})",
        "Updated".bright_green().bold(),
        record.pf_no.cyan(),
        record.display_name()
    );
    Ok(())
}

/// Insert a new record built from column assignments
///
/// The retirement date is derived from the joining date when not given.
async fn add_staff<S>(
    store: &mut S,
    pf_no: &str,
    assignments: Vec<(StaffField, String)>,
    retirement_years: u32,
) -> Result<StaffRecord>
where
    S: StaffStore + ?Sized,
{
    let pf_no = pf_no.trim();
    if pf_no.is_empty() {
        anyhow::bail!(MISSING_IDENTIFIER);
    }
    if store.get(pf_no).await?.is_some() {
        return Err(RecordError::AlreadyExists(pf_no.to_string()).into());
    }

    let mut record = StaffRecord::new(pf_no);
    apply_assignments(&mut record, &assignments)?;
    record.derive_retirement(retirement_years);

    store.add(&record).await?;
    store.commit().await?;
    log::info!("Added staff record {}", record.pf_no);

    Ok(record)
}

/// Apply column assignments to an existing record and save it
async fn edit_staff<S>(
    store: &mut S,
    pf_no: &str,
    assignments: Vec<(StaffField, String)>,
) -> Result<StaffRecord>
where
    S: StaffStore + ?Sized,
{
    let pf_no = pf_no.trim();
    let mut record = store
        .get(pf_no)
        .await?
        .ok_or_else(|| RecordError::NotFound(pf_no.to_string()))?;

    apply_assignments(&mut record, &assignments)?;

    store.merge(&record).await?;
    store.commit().await?;
    log::info!("Updated staff record {}", record.pf_no);

    Ok(record)
}

fn apply_assignments(record: &mut StaffRecord, assignments: &[(StaffField, String)]) -> Result<()> {
    for (field, value) in assignments {
        record
            .apply_edit(*field, value)
            .with_context(|| format!("Cannot set {}", field))?;
    }
    Ok(())
}

async fn list(
    config: &Config,
    designation: Option<String>,
    bill_unit: Option<String>,
    format: ListFormat,
) -> Result<()> {
    let designation = filter_value(designation);
    let bill_unit = filter_value(bill_unit);

    let records: Vec<StaffRecord> = staff::list_staff(&config.pool)
        .await?
        .into_iter()
        .filter(|r| {
            field_matches(r.designation.as_deref(), designation.as_deref())
                && field_matches(r.bill_unit.as_deref(), bill_unit.as_deref())
        })
        .collect();

    match format {
        ListFormat::Json => {
            let json =
                serde_json::to_string_pretty(&records).context("Failed to format JSON output")?;
            println!("{}", json);
        }
        ListFormat::Table => {
            if records.is_empty() {
                println!("{}", "No staff records found".yellow());
                return Ok(());
            }

            let today = today();
            println!(
                "{:<12} {:<30} {:<20} {:<12} {:>4}",
                "PF NO".bold(),
                "EMPLOYEE NAME".bold(),
                "DESIGNATION".bold(),
                "BILL UNIT".bold(),
                "AGE".bold()
            );
            for record in &records {
                println!(
                    "{:<12} {:<30} {:<20} {:<12} {:>4}",
                    record.pf_no.cyan(),
                    or_dash(record.name.as_deref()),
                    or_dash(record.designation.as_deref()),
                    or_dash(record.bill_unit.as_deref()),
                    record
                        .age_on(today)
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "-".into())
                );
            }
            println!();
            println!("{} records", records.len().to_string().bright_green());
        }
    }

    Ok(())
}

/// Exact, case-sensitive match, the same rule the due-date reports apply
fn field_matches(value: Option<&str>, filter: Option<&str>) -> bool {
    match filter {
        Some(filter) => value == Some(filter),
        None => true,
    }
}

async fn show(config: &Config, pf_no: &str) -> Result<()> {
    let pf_no = pf_no.trim();
    let record = staff::get_staff(&config.pool, pf_no)
        .await?
        .ok_or_else(|| RecordError::NotFound(pf_no.to_string()))?;

    println!("{}", record.display_name().bright_green().bold());
    for field in StaffField::ALL {
        let value = match field.kind() {
            FieldKind::Date => format_date(record.date(field)),
            FieldKind::Identifier | FieldKind::Text => or_dash(record.text(field)).to_string(),
        };
        println!("  {:<30} {}", field.header().dimmed(), value);
        if field == StaffField::DateOfBirth {
            let age = record
                .age_on(today())
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".into());
            println!("  {:<30} {}", "AGE".dimmed(), age);
        }
    }

    let leaves = leave::list_leaves(&config.pool, &record.pf_no).await?;
    if !leaves.is_empty() {
        println!();
        println!("{}", "Leave".bold());
        for entry in &leaves {
            println!(
                "  {:<10} {} to {}  {:>3} days  {}",
                entry.leave_type.cyan(),
                entry.from_date.format("%d/%m/%Y"),
                entry.to_date.format("%d/%m/%Y"),
                entry.days,
                or_dash(entry.remarks.as_deref())
            );
        }
    }

    Ok(())
}
