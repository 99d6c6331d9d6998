pub mod export;
pub mod import;
pub mod leave;
pub mod report;
pub mod staff;

use chrono::NaiveDate;

/// Local calendar date used for age calculations
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Render an optional value for terminal output
pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}
