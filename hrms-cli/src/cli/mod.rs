//! Command line surface

pub mod commands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;
use commands::export::{ExportArgs, handle_export_command};
use commands::import::{ImportArgs, handle_import_command};
use commands::leave::{LeaveCommands, handle_leave_command};
use commands::report::{ReportCommands, handle_report_command};
use commands::staff::{StaffCommands, handle_staff_command};

#[derive(Subcommand)]
pub enum Commands {
    /// Import staff records from a spreadsheet
    Import(ImportArgs),
    /// Export all staff records to an Excel file
    Export(ExportArgs),
    /// View, add and edit individual staff records
    #[command(subcommand)]
    Staff(StaffCommands),
    /// Record and list leave
    #[command(subcommand)]
    Leave(LeaveCommands),
    /// Due-date reports
    #[command(subcommand)]
    Report(ReportCommands),
}

pub async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Import(args) => handle_import_command(args, config).await,
        Commands::Export(args) => handle_export_command(args, config).await,
        Commands::Staff(command) => handle_staff_command(command, config).await,
        Commands::Leave(command) => handle_leave_command(command, config).await,
        Commands::Report(command) => handle_report_command(command, config).await,
    }
}
