//! `hrms staff`

mod handler;

pub use handler::handle_staff_command;

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

use crate::roster::columns::{StaffField, parse_assignment};

#[derive(Subcommand)]
pub enum StaffCommands {
    /// List staff records
    List {
        /// Only this designation
        #[arg(long)]
        designation: Option<String>,

        /// Only this bill unit
        #[arg(long)]
        bill_unit: Option<String>,

        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },
    /// Show every column of one staff record, with age and leave history
    Show {
        /// PF number
        pf_no: String,
    },
    /// Add a new staff record; fails if the PF number exists
    Add {
        /// PF number
        pf_no: String,

        #[command(flatten)]
        fields: StaffFieldArgs,
    },
    /// Change columns of an existing staff record
    Edit {
        /// PF number
        pf_no: String,

        #[command(flatten)]
        fields: StaffFieldArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Table,
    Json,
}

/// Column values given on the command line
///
/// Shortcut flags cover the commonly edited columns; `--set` reaches any
/// column by its spreadsheet header. An empty value clears the column.
#[derive(Args, Debug, Default)]
pub struct StaffFieldArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub designation: Option<String>,

    /// Date of joining (dd/mm/yyyy)
    #[arg(long)]
    pub doj: Option<String>,

    /// Date of birth (dd/mm/yyyy)
    #[arg(long)]
    pub dob: Option<String>,

    /// Date of retirement (dd/mm/yyyy); derived from --doj on add when omitted
    #[arg(long)]
    pub dor: Option<String>,

    #[arg(long)]
    pub cli_name: Option<String>,

    #[arg(long)]
    pub mobile: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub bill_unit: Option<String>,

    #[arg(long)]
    pub remarks: Option<String>,

    /// Any column by header, e.g. --set "PME DUE=01/03/2025"
    #[arg(long = "set", value_name = "HEADER=VALUE")]
    pub set: Vec<String>,
}

impl StaffFieldArgs {
    /// All requested column changes, shortcut flags first
    pub fn assignments(&self) -> Result<Vec<(StaffField, String)>> {
        let shortcuts = [
            (StaffField::Name, &self.name),
            (StaffField::Designation, &self.designation),
            (StaffField::DateOfJoining, &self.doj),
            (StaffField::DateOfBirth, &self.dob),
            (StaffField::DateOfRetirement, &self.dor),
            (StaffField::CliName, &self.cli_name),
            (StaffField::Mobile, &self.mobile),
            (StaffField::Email, &self.email),
            (StaffField::BillUnit, &self.bill_unit),
            (StaffField::Remarks, &self.remarks),
        ];

        let mut assignments: Vec<(StaffField, String)> = shortcuts
            .into_iter()
            .filter_map(|(field, value)| value.clone().map(|v| (field, v)))
            .collect();

        for assignment in &self.set {
            assignments.push(parse_assignment(assignment)?);
        }

        Ok(assignments)
    }
}
