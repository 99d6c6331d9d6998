//! `hrms leave`

mod handler;

pub use handler::handle_leave_command;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum LeaveCommands {
    /// Record a leave period for a staff member
    Add {
        /// PF number
        pf_no: String,

        /// Leave type, e.g. CL, LAP, LHAP
        #[arg(long = "type", value_name = "TYPE")]
        leave_type: String,

        /// First day of leave (dd/mm/yyyy)
        #[arg(long)]
        from: String,

        /// Last day of leave (dd/mm/yyyy)
        #[arg(long)]
        to: String,

        #[arg(long)]
        remarks: Option<String>,
    },
    /// List the leave history of a staff member
    List {
        /// PF number
        pf_no: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
