//! Write staff exports and due-date reports to Excel

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

use crate::roster::columns::{ExportColumn, FieldKind, export_columns};
use crate::roster::report::DueReport;
use crate::roster::types::StaffRecord;

/// Sheet name of the staff export
const STAFF_SHEET: &str = "Staff";

/// Number format used for date cells unless configured otherwise
pub const DEFAULT_DATE_FORMAT: &str = "dd/mm/yyyy";

/// Build the staff export workbook
///
/// Columns follow the shared column table so an export can be imported back
/// unchanged. The derived AGE column is computed for `today`.
fn build_staff_workbook(
    records: &[StaffRecord],
    today: NaiveDate,
    date_format: &str,
) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(date_format);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(STAFF_SHEET)?;

    let columns = export_columns();
    for (col, column) in columns.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, column.header(), &header_format)?;
        worksheet.set_column_width(col, column_width(column.header()))?;
    }

    for (row_idx, record) in records.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, column) in columns.iter().enumerate() {
            let col = col as u16;
            match column {
                ExportColumn::Age => {
                    if let Some(age) = record.age_on(today) {
                        worksheet.write_number(row, col, age as f64)?;
                    }
                }
                ExportColumn::Field(field) => match field.kind() {
                    FieldKind::Identifier | FieldKind::Text => {
                        if let Some(text) = record.text(*field) {
                            worksheet.write_string(row, col, text)?;
                        }
                    }
                    FieldKind::Date => {
                        if let Some(date) = record.date(*field) {
                            write_date(worksheet, row, col, date, &date_format)?;
                        }
                    }
                },
            }
        }
    }

    Ok(workbook)
}

/// Write the staff export to a file
pub fn save_staff_excel<P: AsRef<Path>>(
    records: &[StaffRecord],
    path: P,
    today: NaiveDate,
    date_format: &str,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = staff_excel_buffer(records, today, date_format)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;
    Ok(())
}

/// Write the staff export to memory
pub fn staff_excel_buffer(
    records: &[StaffRecord],
    today: NaiveDate,
    date_format: &str,
) -> Result<Vec<u8>> {
    let mut workbook = build_staff_workbook(records, today, date_format)?;
    workbook
        .save_to_buffer()
        .context("Failed to serialize Excel workbook")
}

/// Write a due-date report with a title block above the result table
pub fn save_report_excel<P: AsRef<Path>>(report: &DueReport, path: P, date_format: &str) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(date_format);

    let sheet = workbook.add_worksheet();
    sheet.set_name(report.kind.sheet_name())?;

    sheet.write_string_with_format(0, 0, &report.title(), &title_format)?;
    sheet.write_string(1, 0, "Period")?;
    write_date(sheet, 1, 1, report.period.start, &date_format)?;
    write_date(sheet, 1, 2, report.period.end, &date_format)?;
    sheet.write_string(2, 0, "Records")?;
    sheet.write_number(2, 1, report.records.len() as f64)?;

    let headers = report.headers();
    let header_row = 4;
    for (col, header) in headers.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(header_row, col, *header, &header_format)?;
        sheet.set_column_width(col, column_width(header))?;
    }

    for (idx, row) in report.rows().iter().enumerate() {
        let r = header_row + 1 + idx as u32;
        sheet.write_string(r, 0, &row.pf_no)?;
        sheet.write_string(r, 1, row.name.as_deref().unwrap_or(""))?;
        sheet.write_string(r, 2, row.designation.as_deref().unwrap_or(""))?;
        sheet.write_string(r, 3, row.bill_unit.as_deref().unwrap_or(""))?;
        if let Some(due) = row.due_date {
            write_date(sheet, r, 4, due, &date_format)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Report exported to: {}", path.display());
    Ok(())
}

fn write_date(ws: &mut Worksheet, row: u32, col: u16, date: NaiveDate, format: &Format) -> Result<()> {
    let excel_date = u16::try_from(date.year())
        .ok()
        .and_then(|year| ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok());

    match excel_date {
        Some(dt) => {
            ws.write_datetime_with_format(row, col, &dt, format)?;
        }
        // Excel cannot represent dates before 1900
        None => {
            ws.write_string(row, col, date.format("%Y-%m-%d").to_string())?;
        }
    }
    Ok(())
}

fn column_width(header: &str) -> f64 {
    (header.len() as f64 + 2.0).max(12.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::excel::read_xlsx_buffer;
    use crate::roster::types::CellValue;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_export_layout() {
        let mut record = StaffRecord::new("PF001");
        record.name = Some("Asha".into());
        record.dob = Some(ymd(1990, 6, 15));
        record.bill_unit = Some("BU-7".into());

        let bytes = staff_excel_buffer(&[record], ymd(2024, 6, 15), DEFAULT_DATE_FORMAT).unwrap();
        let sheet = read_xlsx_buffer(bytes).unwrap();

        assert_eq!(sheet.name, STAFF_SHEET);
        assert_eq!(sheet.headers.len(), 26);
        assert_eq!(sheet.rows.len(), 1);

        let age_col = sheet.headers.iter().position(|h| h == "AGE").unwrap();
        assert_eq!(sheet.rows[0][age_col], CellValue::Number(34.0));

        let name_col = sheet.headers.iter().position(|h| h == "EMPLOYEE NAME").unwrap();
        assert_eq!(sheet.rows[0][name_col], CellValue::text("Asha"));
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let bytes = staff_excel_buffer(&[], ymd(2024, 6, 15), DEFAULT_DATE_FORMAT).unwrap();
        let sheet = read_xlsx_buffer(bytes).unwrap();
        assert_eq!(sheet.headers[0], "PF NO");
        assert!(sheet.rows.is_empty());
    }
}
