//! `hrms export`

mod handler;

pub use handler::handle_export_command;

use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ExportArgs {
    /// Output .xlsx file
    #[arg(short, long, default_value = "staff_export.xlsx")]
    pub output: PathBuf,

    /// Excel number format for date cells (defaults to the configured format)
    #[arg(long)]
    pub date_format: Option<String>,
}
