//! Spreadsheet cell representation, decoupled from the workbook reader

use chrono::{NaiveDateTime, Timelike};

use super::errors::RecordError;

/// Markers spreadsheets and upstream exports use for "no value"
pub const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#NA", "<NA>", "N/A", "n/a", "NA", "NULL", "null", "NaN", "nan", "NaT", "None",
];

/// Error value Excel writes for a lookup that found nothing
const NOT_AVAILABLE: &str = "#N/A";

/// Check whether a trimmed text value is one of the missing markers
pub fn is_missing_marker(text: &str) -> bool {
    MISSING_MARKERS.contains(&text)
}

/// A single cell value read from a worksheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell
    Empty,
    /// Text cell (untrimmed)
    Text(String),
    /// Any numeric cell, integers included
    Number(f64),
    /// Boolean cell
    Bool(bool),
    /// Cell carrying a native date/time
    DateTime(NaiveDateTime),
    /// Formula error such as `#REF!`
    Error(String),
}

impl CellValue {
    #[cfg(test)]
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// True for empty cells, whitespace-only text and the `#N/A` error
    ///
    /// Text such as `NA` or `None` is a value here; only the date parser and
    /// the identifier check read it as a missing marker.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Error(e) => e == NOT_AVAILABLE,
            _ => false,
        }
    }

    /// Render the cell as text for a text-typed field
    ///
    /// Whole numbers lose their `.0` so numeric mobile and PF numbers survive,
    /// and blank cells become `None`. Error values other than `#N/A` are
    /// rejected so the caller can fail the row.
    pub fn to_text(&self) -> Result<Option<String>, RecordError> {
        if self.is_blank() {
            return Ok(None);
        }

        let text = match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            CellValue::DateTime(dt) => {
                if dt.time().num_seconds_from_midnight() == 0 {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            CellValue::Error(e) => return Err(RecordError::CellError(e.clone())),
            CellValue::Empty => return Ok(None),
        };

        Ok(Some(text))
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}
