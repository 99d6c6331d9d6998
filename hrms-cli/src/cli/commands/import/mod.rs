//! `hrms import`

mod handler;

pub use handler::handle_import_command;

use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ImportArgs {
    /// Spreadsheet to import (.xlsx, .xls, .xlsb or .ods); the first sheet is read
    pub file: PathBuf,

    /// Fill an empty DATE OF RETIREMENT from DATE OF JOINING
    #[arg(long)]
    pub derive_retirement: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}
