//! Read the first worksheet of a spreadsheet into a header row and typed cells

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, DataType, Range, Reader, open_workbook_auto};

use crate::roster::types::CellValue;

/// A worksheet split into its header row and data rows
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    /// Worksheet name
    pub name: String,
    /// Zero-based worksheet row of the header
    pub header_row: u32,
    /// Raw header texts, one per column
    pub headers: Vec<String>,
    /// Data rows below the header
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Row number a user sees in the spreadsheet for a data row index
    pub fn row_number(&self, index: usize) -> usize {
        self.header_row as usize + index + 2
    }
}

/// Read the first worksheet of any workbook calamine understands
pub fn read_first_sheet<P: AsRef<Path>>(path: P) -> Result<Sheet> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .with_context(|| format!("Spreadsheet has no worksheets: {}", path.display()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    Ok(sheet_from_range(sheet_name, &range))
}

/// Read the first worksheet of an in-memory `.xlsx` file
#[cfg(test)]
pub fn read_xlsx_buffer(bytes: Vec<u8>) -> Result<Sheet> {
    let mut workbook: calamine::Xlsx<_> = calamine::Xlsx::new(std::io::Cursor::new(bytes))
        .context("Failed to read spreadsheet buffer")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("Spreadsheet has no worksheets")?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    Ok(sheet_from_range(sheet_name, &range))
}

fn sheet_from_range(name: String, range: &Range<Data>) -> Sheet {
    let header_row = range.start().map(|(row, _)| row).unwrap_or(0);
    let mut rows = range.rows();

    let headers = rows
        .next()
        .map(|header| header.iter().map(header_text).collect())
        .unwrap_or_default();

    let rows = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Sheet {
        name,
        header_row,
        headers,
        rows,
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::Text(cell.to_string()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}
