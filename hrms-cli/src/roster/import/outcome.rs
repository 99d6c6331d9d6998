//! Per-row outcomes and the batch summary of an import

use serde::Serialize;

/// Reason recorded for rows without a PF number
pub const MISSING_IDENTIFIER: &str = "Missing PF NO";

/// Batch-level import failure; nothing is written when one occurs
#[derive(Debug, Clone, PartialEq)]
pub enum ImportError {
    /// Required headers absent from the sheet, in column-table order
    MissingColumns(Vec<String>),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::MissingColumns(columns) => {
                write!(f, "Missing required columns: {}", columns.join(", "))
            }
        }
    }
}

impl std::error::Error for ImportError {}

/// A row that was not imported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    /// Row number as shown in the spreadsheet
    pub row: usize,
    pub reason: String,
}

/// What happened to one data row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Imported { row: usize, pf_no: String },
    Skipped(SkippedRow),
}

impl RowOutcome {
    pub fn skipped(row: usize, reason: impl Into<String>) -> Self {
        RowOutcome::Skipped(SkippedRow {
            row,
            reason: reason.into(),
        })
    }
}

/// Counts and skip details of a finished import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
    pub skipped_details: Vec<SkippedRow>,
}

impl ImportSummary {
    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Imported { .. } => self.inserted += 1,
            RowOutcome::Skipped(skipped) => {
                self.skipped += 1;
                self.skipped_details.push(skipped);
            }
        }
    }

    pub fn total(&self) -> usize {
        self.inserted + self.skipped
    }
}
