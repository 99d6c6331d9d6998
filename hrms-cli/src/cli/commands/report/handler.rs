use std::fs;

use anyhow::{Context, Result};
use chrono::Datelike;
use colored::*;
use serde::Serialize;

use super::{ReportArgs, ReportCommands, ReportFormat};
use crate::cli::commands::{format_date, or_dash, today};
use crate::config::Config;
use crate::config::repository::reports;
use crate::roster::excel::save_report_excel;
use crate::roster::report::{DueReport, ReportKind, ReportPeriod, ReportQuery, ReportRow};

pub async fn handle_report_command(command: ReportCommands, config: &Config) -> Result<()> {
    match command {
        ReportCommands::Run(args) => run_report(args, config).await,
        ReportCommands::Options => {
            let options = reports::report_options(&config.pool).await?;
            println!("{}", "Designations:".bold());
            for designation in &options.designations {
                println!("  {}", designation);
            }
            println!("{}", "Bill units:".bold());
            for bill_unit in &options.bill_units {
                println!("  {}", bill_unit);
            }
            Ok(())
        }
    }
}

async fn run_report(args: ReportArgs, config: &Config) -> Result<()> {
    let year = args.year.unwrap_or_else(|| today().year());
    let period = ReportPeriod::resolve(args.period, year, args.month, args.quarter)?;
    let query = ReportQuery::new(args.kind, period, args.designation, args.bill_unit);

    let records = reports::due_report(&config.pool, &query).await?;
    let report = DueReport::new(query, records);
    log::info!("{}: {} records", report.title(), report.records.len());

    let output = match args.format {
        ReportFormat::Xlsx => {
            let path = args
                .output
                .unwrap_or_else(|| default_xlsx_name(report.kind, &report.period).into());
            save_report_excel(&report, &path, &config.settings.export.date_format)?;
            println!(
                "Saved {} records to {}",
                report.records.len().to_string().bright_green(),
                path.display().to_string().cyan()
            );
            return Ok(());
        }
        ReportFormat::Table => {
            print_table(&report);
            return Ok(());
        }
        ReportFormat::Csv => report_csv(&report)?,
        ReportFormat::Json => report_json(&report)?,
    };

    match args.output {
        Some(path) => {
            fs::write(&path, &output)
                .with_context(|| format!("Failed to write output to: {}", path.display()))?;
            println!("Report saved to: {}", path.display().to_string().bright_green());
        }
        None => print!("{}", output),
    }

    Ok(())
}

fn default_xlsx_name(kind: ReportKind, period: &ReportPeriod) -> String {
    format!(
        "{}_{}_{}.xlsx",
        kind.sheet_name().to_lowercase().replace(' ', "_"),
        period.start.format("%Y%m%d"),
        period.end.format("%Y%m%d")
    )
}

fn print_table(report: &DueReport) {
    println!("{}", report.title().bright_green().bold());
    let rows = report.rows();
    if rows.is_empty() {
        println!("{}", "No staff due in this period".yellow());
        return;
    }

    let [pf, name, designation, bill_unit, due] = report.headers();
    println!(
        "{:<12} {:<30} {:<20} {:<12} {}",
        pf.bold(),
        name.bold(),
        designation.bold(),
        bill_unit.bold(),
        due.bold()
    );
    for row in &rows {
        println!(
            "{:<12} {:<30} {:<20} {:<12} {}",
            row.pf_no.cyan(),
            or_dash(row.name.as_deref()),
            or_dash(row.designation.as_deref()),
            or_dash(row.bill_unit.as_deref()),
            format_date(row.due_date)
        );
    }
    println!();
    println!("{} records", rows.len().to_string().bright_green());
}

fn report_csv(report: &DueReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(report.headers())?;
    for row in report.rows() {
        let due = row
            .due_date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default();
        writer.write_record([
            row.pf_no.as_str(),
            row.name.as_deref().unwrap_or(""),
            row.designation.as_deref().unwrap_or(""),
            row.bill_unit.as_deref().unwrap_or(""),
            due.as_str(),
        ])?;
    }
    let bytes = writer.into_inner().context("Failed to finish CSV output")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

#[derive(Serialize)]
struct ReportJson<'a> {
    title: String,
    kind: ReportKind,
    period: ReportPeriod,
    designation: Option<&'a str>,
    bill_unit: Option<&'a str>,
    rows: Vec<ReportRow>,
}

fn report_json(report: &DueReport) -> Result<String> {
    let json = ReportJson {
        title: report.title(),
        kind: report.kind,
        period: report.period,
        designation: report.designation.as_deref(),
        bill_unit: report.bill_unit.as_deref(),
        rows: report.rows(),
    };
    let mut text = serde_json::to_string_pretty(&json).context("Failed to format JSON output")?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::types::StaffRecord;
    use chrono::NaiveDate;

    fn sample_report() -> DueReport {
        let mut record = StaffRecord::new("PF1");
        record.name = Some("Das, R".into());
        record.pme_due = NaiveDate::from_ymd_opt(2024, 11, 5);
        let period = ReportPeriod::quarter(2024, 4).unwrap();
        DueReport::new(
            ReportQuery::new(ReportKind::Pme, period, None, Some("BU1".into())),
            vec![record],
        )
    }

    #[test]
    fn test_csv_uses_sheet_headers() {
        let csv = report_csv(&sample_report()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("PF NO,EMPLOYEE NAME,DESIGNATION,BILL UNIT,PME DUE")
        );
        assert_eq!(lines.next(), Some("PF1,\"Das, R\",,,05/11/2024"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_json_carries_period_and_filters() {
        let json: serde_json::Value =
            serde_json::from_str(&report_json(&sample_report()).unwrap()).unwrap();
        assert_eq!(json["kind"], "pme");
        assert_eq!(json["period"]["start"], "2024-10-01");
        assert_eq!(json["bill_unit"], "BU1");
        assert_eq!(json["designation"], serde_json::Value::Null);
        assert_eq!(json["rows"][0]["due_date"], "2024-11-05");
    }

    #[test]
    fn test_default_xlsx_name() {
        let period = ReportPeriod::month(2024, 2).unwrap();
        assert_eq!(
            default_xlsx_name(ReportKind::Tech, &period),
            "tech_refresher_20240201_20240229.xlsx"
        );
    }
}
