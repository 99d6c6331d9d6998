//! `hrms report`

mod handler;

pub use handler::handle_report_command;

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::roster::report::{PeriodType, ReportKind};

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Staff whose due date falls inside a month, quarter or year
    Run(ReportArgs),
    /// Designations and bill units available as report filters
    Options,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Which due date to report on
    #[arg(short, long, value_enum)]
    pub kind: ReportKind,

    #[arg(short, long, value_enum, default_value_t = PeriodType::Quarterly)]
    pub period: PeriodType,

    /// Calendar year (defaults to the current year)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Month 1-12, for monthly reports
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Quarter 1-4, for quarterly reports
    #[arg(short, long)]
    pub quarter: Option<u32>,

    /// Only this designation (ALL for no filter)
    #[arg(long)]
    pub designation: Option<String>,

    /// Only this bill unit (ALL for no filter)
    #[arg(long)]
    pub bill_unit: Option<String>,

    #[arg(short, long, value_enum, default_value_t = ReportFormat::Table)]
    pub format: ReportFormat,

    /// Output file; required for xlsx, stdout otherwise
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Table,
    Csv,
    Json,
    Xlsx,
}
