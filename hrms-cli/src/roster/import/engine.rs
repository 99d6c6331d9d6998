//! Import engine - reconciles a staff sheet into the record store

use std::path::Path;

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::repository::{SqliteSession, StaffStore};
use crate::roster::columns::{FieldKind, FieldValue, StaffField};
use crate::roster::excel::{Sheet, read_first_sheet};
use crate::roster::types::{
    CellValue, DEFAULT_RETIREMENT_YEARS, StaffRecord, is_missing_marker, parse_cell_date,
};

use super::outcome::{ImportError, ImportSummary, MISSING_IDENTIFIER, RowOutcome};

/// Knobs applied to every imported row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Fill an empty retirement date from the joining date
    pub derive_retirement: bool,
    pub retirement_age_years: u32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            derive_retirement: false,
            retirement_age_years: DEFAULT_RETIREMENT_YEARS,
        }
    }
}

/// Sheet column positions of the staff columns the sheet carries
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    identifier: usize,
    columns: Vec<(usize, StaffField)>,
}

/// Match sheet headers to staff columns and check the required set
///
/// Unknown headers are ignored. When a header repeats, the first occurrence
/// is used.
pub fn map_columns(headers: &[String]) -> Result<ColumnMap, ImportError> {
    let mut identifier = None;
    let mut columns: Vec<(usize, StaffField)> = Vec::new();

    for (idx, header) in headers.iter().enumerate() {
        let Some(field) = StaffField::from_header(header) else {
            continue;
        };
        if field == StaffField::PfNo {
            identifier.get_or_insert(idx);
        } else if !columns.iter().any(|(_, f)| *f == field) {
            columns.push((idx, field));
        }
    }

    let missing: Vec<String> = StaffField::required()
        .filter(|field| match field {
            StaffField::PfNo => identifier.is_none(),
            other => !columns.iter().any(|(_, f)| f == other),
        })
        .map(|field| field.header().to_string())
        .collect();

    match identifier {
        Some(identifier) if missing.is_empty() => Ok(ColumnMap {
            identifier,
            columns,
        }),
        _ => Err(ImportError::MissingColumns(missing)),
    }
}

/// Import every data row of a sheet through `store` and commit once
///
/// Fails without touching the store when required columns are missing. Row
/// problems are recorded in the summary and never stop the batch.
pub async fn import_sheet<S>(
    sheet: &Sheet,
    store: &mut S,
    options: ImportOptions,
) -> Result<ImportSummary>
where
    S: StaffStore + ?Sized,
{
    let map = map_columns(&sheet.headers)?;
    log::info!(
        "Importing sheet '{}' with {} data rows",
        sheet.name,
        sheet.rows.len()
    );

    let mut summary = ImportSummary::default();
    for (index, cells) in sheet.rows.iter().enumerate() {
        if cells.iter().all(CellValue::is_blank) {
            continue;
        }

        let row = sheet.row_number(index);
        let outcome = import_row(store, &map, row, cells, options).await;
        match &outcome {
            RowOutcome::Imported { row, pf_no } => log::debug!("Row {}: saved {}", row, pf_no),
            RowOutcome::Skipped(skipped) => {
                log::warn!("Row {} skipped: {}", skipped.row, skipped.reason)
            }
        }
        summary.record(outcome);
    }

    store.commit().await?;
    log::info!(
        "Import finished: {} inserted, {} skipped",
        summary.inserted,
        summary.skipped
    );

    Ok(summary)
}

/// Open a spreadsheet and import its first sheet inside one transaction
pub async fn import_staff_file<P: AsRef<Path>>(
    pool: &SqlitePool,
    path: P,
    options: ImportOptions,
) -> Result<ImportSummary> {
    let sheet = read_first_sheet(path)?;
    let mut session = SqliteSession::begin(pool).await?;
    import_sheet(&sheet, &mut session, options).await
}

async fn import_row<S>(
    store: &mut S,
    map: &ColumnMap,
    row: usize,
    cells: &[CellValue],
    options: ImportOptions,
) -> RowOutcome
where
    S: StaffStore + ?Sized,
{
    let pf_no = match cell(cells, map.identifier).to_text() {
        Ok(Some(pf_no)) if !is_missing_marker(&pf_no) => pf_no,
        Ok(_) => return RowOutcome::skipped(row, MISSING_IDENTIFIER),
        Err(e) => return RowOutcome::skipped(row, format!("{}: {}", StaffField::PfNo, e)),
    };

    let values = match row_values(map, cells) {
        Ok(values) => values,
        Err(reason) => return RowOutcome::skipped(row, reason),
    };

    let mut record = match store.get(&pf_no).await {
        Ok(existing) => existing.unwrap_or_else(|| StaffRecord::new(pf_no.as_str())),
        Err(e) => return RowOutcome::skipped(row, format!("{:#}", e)),
    };
    for (field, value) in values {
        record.apply(field, value);
    }
    if options.derive_retirement {
        record.derive_retirement(options.retirement_age_years);
    }

    match store.merge(&record).await {
        Ok(()) => RowOutcome::Imported { row, pf_no },
        Err(e) => RowOutcome::skipped(row, format!("{:#}", e)),
    }
}

fn row_values(map: &ColumnMap, cells: &[CellValue]) -> Result<Vec<(StaffField, FieldValue)>, String> {
    map.columns
        .iter()
        .map(|&(idx, field)| {
            let cell = cell(cells, idx);
            let value = match field.kind() {
                FieldKind::Date => FieldValue::Date(parse_cell_date(cell)),
                FieldKind::Text | FieldKind::Identifier => FieldValue::Text(
                    cell.to_text().map_err(|e| format!("{}: {}", field, e))?,
                ),
            };
            Ok((field, value))
        })
        .collect()
}

static EMPTY: CellValue = CellValue::Empty;

// Rows can be shorter than the header
fn cell(cells: &[CellValue], idx: usize) -> &CellValue {
    cells.get(idx).unwrap_or(&EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashSet};

    use anyhow::bail;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use crate::config::repository::{staff, test_pool};
    use crate::roster::excel::{read_xlsx_buffer, staff_excel_buffer};
    use crate::roster::import::outcome::SkippedRow;

    /// In-memory store that only publishes writes on commit
    #[derive(Default)]
    struct MemoryStore {
        committed: BTreeMap<String, StaffRecord>,
        pending: BTreeMap<String, StaffRecord>,
        writes: usize,
        reject: HashSet<String>,
    }

    #[async_trait]
    impl StaffStore for MemoryStore {
        async fn get(&mut self, pf_no: &str) -> Result<Option<StaffRecord>> {
            Ok(self
                .pending
                .get(pf_no)
                .or_else(|| self.committed.get(pf_no))
                .cloned())
        }

        async fn merge(&mut self, record: &StaffRecord) -> Result<()> {
            if self.reject.contains(&record.pf_no) {
                bail!("constraint failed for {}", record.pf_no);
            }
            self.writes += 1;
            self.pending.insert(record.pf_no.clone(), record.clone());
            Ok(())
        }

        async fn add(&mut self, record: &StaffRecord) -> Result<()> {
            if self.get(&record.pf_no).await?.is_some() {
                bail!("duplicate {}", record.pf_no);
            }
            self.merge(record).await
        }

        async fn commit(&mut self) -> Result<()> {
            self.committed.append(&mut self.pending);
            Ok(())
        }
    }

    const REQUIRED: [&str; 9] = [
        "PF NO",
        "EMPLOYEE NAME",
        "DESIGNATION",
        "DATE OF JOINING",
        "DATE OF BIRTH",
        "DATE OF RETIREMENT",
        "CLI NAME",
        "MOBILE",
        "EMAIL",
    ];

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text(value: &str) -> CellValue {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::text(value)
        }
    }

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> Sheet {
        Sheet {
            name: "Sheet1".into(),
            header_row: 0,
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|v| text(v)).collect())
                .collect(),
        }
    }

    fn staff_row<'a>(pf_no: &'a str, name: &'a str) -> [&'a str; 9] {
        [
            pf_no,
            name,
            "LOCO PILOT",
            "01/04/2010",
            "15/06/1990",
            "",
            "CLI-A",
            "9876543210",
            "someone@example.com",
        ]
    }

    #[test]
    fn test_map_columns_normalizes_headers() {
        let headers: Vec<String> = vec![
            " pf no ".into(),
            "Employee Name".into(),
            "designation".into(),
            "Date Of Joining".into(),
            "DATE OF BIRTH".into(),
            "date of retirement".into(),
            "cli name".into(),
            "Mobile".into(),
            "email".into(),
            "Unknown".into(),
            "pme due".into(),
            "PME DUE".into(),
        ];
        let map = map_columns(&headers).unwrap();
        assert_eq!(map.identifier, 0);
        assert_eq!(map.columns.len(), 9);
        assert!(!map.columns.iter().any(|(_, f)| *f == StaffField::Remarks));
        assert_eq!(map.columns.last(), Some(&(10, StaffField::PmeDue)));
    }

    #[tokio::test]
    async fn test_missing_headers_abort_without_writes() {
        let sheet = sheet(
            &["PF NO", "EMPLOYEE NAME", "DESIGNATION", "CLI NAME", "MOBILE"],
            &[&["PF1", "A", "LP", "X", "1"]],
        );
        let mut store = MemoryStore::default();

        let err = import_sheet(&sheet, &mut store, ImportOptions::default())
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<ImportError>(),
            Some(&ImportError::MissingColumns(vec![
                "DATE OF JOINING".into(),
                "DATE OF BIRTH".into(),
                "DATE OF RETIREMENT".into(),
                "EMAIL".into(),
            ]))
        );
        assert_eq!(store.writes, 0);
        assert!(store.committed.is_empty());
    }

    #[tokio::test]
    async fn test_blank_identifier_is_skipped() {
        let sheet = sheet(
            &REQUIRED,
            &[&staff_row("   ", "Nobody"), &staff_row("PF1", "Ravi")],
        );
        let mut store = MemoryStore::default();

        let summary = import_sheet(&sheet, &mut store, ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.inserted, 1);
        assert_eq!(
            summary.skipped_details,
            vec![SkippedRow {
                row: 2,
                reason: MISSING_IDENTIFIER.into()
            }]
        );
        assert_eq!(store.committed.len(), 1);
        let record = &store.committed["PF1"];
        assert_eq!(record.dob, Some(ymd(1990, 6, 15)));
        assert_eq!(record.date_of_joining, Some(ymd(2010, 4, 1)));
        assert_eq!(record.dor, None);
    }

    #[tokio::test]
    async fn test_reimport_overwrites_by_pf_no() {
        let mut store = MemoryStore::default();

        let first = sheet(&REQUIRED, &[&staff_row("PF1", "Ravi")]);
        import_sheet(&first, &mut store, ImportOptions::default())
            .await
            .unwrap();
        let second = sheet(&REQUIRED, &[&staff_row(" PF1 ", "Ravi Kumar")]);
        import_sheet(&second, &mut store, ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(store.committed.len(), 1);
        assert_eq!(store.committed["PF1"].name.as_deref(), Some("Ravi Kumar"));
    }

    #[tokio::test]
    async fn test_bad_row_does_not_stop_the_batch() {
        let mut sheet = sheet(
            &REQUIRED,
            &[
                &staff_row("PF1", "A"),
                &staff_row("PF2", "B"),
                &staff_row("PF3", "C"),
            ],
        );
        sheet.rows[1][1] = CellValue::Error("#REF!".into());
        sheet.rows[2][3] = CellValue::text("not a date");

        let mut store = MemoryStore::default();
        let summary = import_sheet(&sheet, &mut store, ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.skipped_details[0].row, 3);
        assert_eq!(
            summary.skipped_details[0].reason,
            "EMPLOYEE NAME: cell contains error value #REF!"
        );
        // Unparseable dates resolve to no value
        assert_eq!(store.committed["PF3"].date_of_joining, None);
    }

    #[tokio::test]
    async fn test_store_failure_is_recorded_per_row() {
        let sheet = sheet(&REQUIRED, &[&staff_row("PF1", "A"), &staff_row("PF2", "B")]);
        let mut store = MemoryStore::default();
        store.reject.insert("PF1".into());

        let summary = import_sheet(&sheet, &mut store, ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.inserted, 1);
        assert_eq!(
            summary.skipped_details,
            vec![SkippedRow {
                row: 2,
                reason: "constraint failed for PF1".into()
            }]
        );
        assert!(store.committed.contains_key("PF2"));
    }

    #[tokio::test]
    async fn test_absent_optional_columns_are_left_alone() {
        let mut store = MemoryStore::default();
        let mut existing = StaffRecord::new("PF1");
        existing.remarks = Some("on deputation".into());
        existing.pme_due = Some(ymd(2025, 1, 1));
        existing.pan = Some("ABCDE1234F".into());
        store.committed.insert("PF1".into(), existing);

        let mut headers = REQUIRED.to_vec();
        headers.push("PAN");
        let mut row = staff_row("PF1", "Ravi").to_vec();
        row.push("");
        let sheet = sheet(&headers, &[row.as_slice()]);

        import_sheet(&sheet, &mut store, ImportOptions::default())
            .await
            .unwrap();

        let record = &store.committed["PF1"];
        assert_eq!(record.name.as_deref(), Some("Ravi"));
        assert_eq!(record.remarks.as_deref(), Some("on deputation"));
        assert_eq!(record.pme_due, Some(ymd(2025, 1, 1)));
        // Present but blank clears the field
        assert_eq!(record.pan, None);
    }

    #[tokio::test]
    async fn test_row_numbers_follow_the_sheet() {
        let mut sheet = sheet(
            &REQUIRED,
            &[
                &staff_row("PF1", "A"),
                &["", "", "", "", "", "", "", "", ""],
                &staff_row("", "Ghost"),
            ],
        );
        sheet.header_row = 2;

        let summary = import_sheet(&sheet, &mut MemoryStore::default(), ImportOptions::default())
            .await
            .unwrap();

        // The fully blank row is ignored and not counted
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.skipped_details[0].row, 6);
    }

    #[tokio::test]
    async fn test_derive_retirement_option() {
        let sheet = sheet(&REQUIRED, &[&staff_row("PF1", "A")]);

        let mut store = MemoryStore::default();
        import_sheet(&sheet, &mut store, ImportOptions::default())
            .await
            .unwrap();
        assert_eq!(store.committed["PF1"].dor, None);

        let mut store = MemoryStore::default();
        let options = ImportOptions {
            derive_retirement: true,
            ..ImportOptions::default()
        };
        import_sheet(&sheet, &mut store, options).await.unwrap();
        assert_eq!(store.committed["PF1"].dor, Some(ymd(2070, 4, 1)));
    }

    #[tokio::test]
    async fn test_numeric_cells_and_serial_dates() {
        let mut sheet = sheet(&REQUIRED, &[&staff_row("", "A")]);
        sheet.rows[0][0] = CellValue::Number(12345.0);
        sheet.rows[0][4] = CellValue::Number(33039.0);
        sheet.rows[0][7] = CellValue::Number(9876543210.0);

        let mut store = MemoryStore::default();
        import_sheet(&sheet, &mut store, ImportOptions::default())
            .await
            .unwrap();

        let record = &store.committed["12345"];
        assert_eq!(record.dob, Some(ymd(1990, 6, 15)));
        assert_eq!(record.mobile.as_deref(), Some("9876543210"));
    }

    fn every_column_filled() -> StaffRecord {
        StaffRecord {
            pf_no: "PF7".into(),
            name: Some("Meena".into()),
            designation: Some("ALP".into()),
            date_of_joining: Some(ymd(2012, 7, 1)),
            hrms_id: Some("HR00042".into()),
            community: Some("OBC".into()),
            dob: Some(ymd(1988, 2, 29)),
            dor: Some(ymd(2048, 2, 29)),
            qualification: Some("B.E.".into()),
            mode_of_appointment: Some("RRB".into()),
            mobile: Some("9876543210".into()),
            email: Some("meena@example.com".into()),
            cli_name: Some("CLI-South".into()),
            bill_unit: Some("0012345".into()),
            dot: Some("DOT-3".into()),
            pan: Some("ABCDE1234F".into()),
            aadhar: Some("123456789012".into()),
            prom_trg: Some("Done".into()),
            pme_due: Some(ymd(2026, 1, 15)),
            gr_sr_due: Some(ymd(2025, 12, 31)),
            tech_ref_due: Some(ymd(2025, 11, 30)),
            gradation: Some("A".into()),
            date_of_gradation: Some(ymd(2020, 5, 4)),
            // Excel cannot hold this date, so it is exported as text
            high_speed_psycho_date: Some(ymd(1899, 5, 1)),
            remarks: Some("transferred".into()),
        }
    }

    async fn export_then_import(record: &StaffRecord) -> StaffRecord {
        let pool = test_pool().await;
        let bytes = staff_excel_buffer(std::slice::from_ref(record), ymd(2024, 6, 1), "dd/mm/yyyy")
            .unwrap();
        let sheet = read_xlsx_buffer(bytes).unwrap();

        let mut session = SqliteSession::begin(&pool).await.unwrap();
        let summary = import_sheet(&sheet, &mut session, ImportOptions::default())
            .await
            .unwrap();
        assert_eq!(summary.inserted, 1);
        assert!(summary.skipped_details.is_empty());

        staff::get_staff(&pool, &record.pf_no).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_export_round_trips_every_column() {
        let exported = every_column_filled();
        for field in StaffField::ALL {
            let filled = match field.kind() {
                FieldKind::Date => exported.date(field).is_some(),
                FieldKind::Text | FieldKind::Identifier => exported.text(field).is_some(),
            };
            assert!(filled, "{} left empty", field);
        }

        assert_eq!(export_then_import(&exported).await, exported);
    }

    #[tokio::test]
    async fn test_marker_like_text_round_trips() {
        let mut exported = StaffRecord::new("PF8");
        exported.remarks = Some("NA".into());
        exported.community = Some("None".into());
        exported.hrms_id = Some("null".into());
        exported.qualification = Some("N/A".into());

        assert_eq!(export_then_import(&exported).await, exported);
    }

    #[tokio::test]
    async fn test_marker_identifier_is_missing() {
        let sheet = sheet(&REQUIRED, &[&staff_row("NaN", "A")]);
        let mut store = MemoryStore::default();

        let summary = import_sheet(&sheet, &mut store, ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.skipped_details[0].reason, MISSING_IDENTIFIER);
        assert!(store.committed.is_empty());
    }

    #[tokio::test]
    async fn test_import_file_with_header_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staff.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        // Header on the third visible row, as in sheets with a title block
        for (col, header) in REQUIRED.iter().enumerate() {
            worksheet.write_string(2, col as u16, *header).unwrap();
        }
        for (row, values) in [(3, staff_row("PF1", "Ravi")), (4, staff_row("", "Nobody"))] {
            for (col, value) in values.iter().enumerate().filter(|(_, v)| !v.is_empty()) {
                worksheet.write_string(row, col as u16, *value).unwrap();
            }
        }
        workbook.save(&path).unwrap();

        let sheet = read_first_sheet(&path).unwrap();
        assert_eq!(sheet.row_number(0), 4);

        let pool = test_pool().await;
        let summary = import_staff_file(&pool, &path, ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.inserted, 1);
        assert_eq!(
            summary.skipped_details,
            vec![SkippedRow {
                row: 5,
                reason: MISSING_IDENTIFIER.into()
            }]
        );
        let stored = staff::get_staff(&pool, "PF1").await.unwrap().unwrap();
        assert_eq!(stored.dob, Some(ymd(1990, 6, 15)));
    }

    #[tokio::test]
    async fn test_import_into_sqlite_commits_once() {
        let pool = test_pool().await;
        let sheet = sheet(&REQUIRED, &[&staff_row("PF1", "A"), &staff_row("PF2", "B")]);

        let mut session = SqliteSession::begin(&pool).await.unwrap();
        let summary = import_sheet(&sheet, &mut session, ImportOptions::default())
            .await
            .unwrap();
        drop(session);

        assert_eq!(summary.inserted, 2);
        assert_eq!(staff::count_staff(&pool).await.unwrap(), 2);
    }
}
