//! Record-level errors surfaced to the user

use chrono::NaiveDate;

/// Error from a staff or leave record operation
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// No staff record with this PF number
    NotFound(String),
    /// Insert-only path hit an existing PF number
    AlreadyExists(String),
    /// A date value could not be parsed
    InvalidDate(String),
    /// Leave period ends before it starts
    EndBeforeStart { from: NaiveDate, to: NaiveDate },
    /// Report period arguments do not describe a valid range
    InvalidPeriod(String),
    /// Header does not name a staff column
    UnknownColumn(String),
    /// Column cannot be changed through an edit
    ReadOnlyColumn(String),
    /// Spreadsheet cell holds an error value like `#REF!`
    CellError(String),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::NotFound(pf_no) => write!(f, "Staff not found: {}", pf_no),
            RecordError::AlreadyExists(pf_no) => write!(f, "PF No already exists: {}", pf_no),
            RecordError::InvalidDate(value) => write!(f, "Invalid date: '{}'", value),
            RecordError::EndBeforeStart { from, to } => {
                write!(f, "Leave ends ({}) before it starts ({})", to, from)
            }
            RecordError::InvalidPeriod(reason) => write!(f, "Invalid period: {}", reason),
            RecordError::UnknownColumn(name) => write!(f, "Unknown column: '{}'", name),
            RecordError::ReadOnlyColumn(name) => write!(f, "Column cannot be edited: {}", name),
            RecordError::CellError(value) => write!(f, "cell contains error value {}", value),
        }
    }
}

impl std::error::Error for RecordError {}
