//! Spreadsheet import and reconciliation

mod engine;
mod outcome;

pub use engine::{ImportOptions, import_staff_file};
pub use outcome::{ImportSummary, MISSING_IDENTIFIER};
