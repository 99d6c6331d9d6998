//! Date handling for roster data: tolerant cell parsing, age and retirement

use chrono::{Datelike, Duration, Months, NaiveDate};

use super::cell::{CellValue, is_missing_marker};

/// Formats tried first; the day comes before the month when both are plausible
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d",
    "%d %b %Y", "%d-%b-%Y", "%d %B %Y", "%d-%B-%Y", "%b %d, %Y", "%B %d, %Y",
    "%b %d %Y", "%B %d %Y",
];

/// Two-digit-year variants, only used when the four-digit formats fail
const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y", "%d-%b-%y", "%d %b %y"];

/// Fallback when the leading number cannot be a day-first date (e.g. `06/25/1990`)
const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y"];
const MONTH_FIRST_SHORT_FORMATS: &[&str] = &["%m/%d/%y", "%m-%d-%y"];

/// Largest serial Excel can display (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Parse a cell into a calendar date, returning `None` for anything unusable
///
/// Native timestamps are truncated to their date, numbers are treated as
/// Excel serial dates and text goes through [`parse_text_date`]. Never fails.
pub fn parse_cell_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Number(n) => excel_serial_to_date(*n),
        CellValue::Text(s) => parse_text_date(s),
        CellValue::Empty | CellValue::Bool(_) | CellValue::Error(_) => None,
    }
}

/// Parse a textual date, preferring day-first readings
pub fn parse_text_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() || is_missing_marker(text) {
        return None;
    }

    let date_part = strip_time(text);

    parse_with(date_part, DAY_FIRST_FORMATS, SHORT_YEAR_FORMATS)
        .or_else(|| parse_with(date_part, MONTH_FIRST_FORMATS, MONTH_FIRST_SHORT_FORMATS))
}

fn parse_with(text: &str, formats: &[&str], short_year_formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        // %Y happily reads "90" as the year 90
        .find(|date| date.year() >= 1000)
        .or_else(|| {
            short_year_formats
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
}

/// Drop a trailing time component: `1990-06-15T00:00:00`, `15/06/1990 10:30`, `15/06/1990 10:30 AM`
fn strip_time(text: &str) -> &str {
    if let Some((date, time)) = text.split_once('T') {
        if time.contains(':') && date.chars().all(|c| c.is_ascii_digit() || c == '-') {
            return date;
        }
    }

    match text.find(|c: char| c.is_whitespace()) {
        Some(_) => {
            let mut end = text.len();
            for token in text.split_whitespace().rev() {
                let upper = token.to_ascii_uppercase();
                if token.contains(':') || upper == "AM" || upper == "PM" {
                    end = text[..end].rfind(token).unwrap_or(end);
                } else {
                    break;
                }
            }
            text[..end].trim_end()
        }
        None => text,
    }
}

/// Convert an Excel serial day number to a date (1900 date system)
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    let days = serial.trunc() as i64;
    // Excel counts a phantom 1900-02-29 as serial 60
    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };

    epoch.checked_add_signed(Duration::days(days))
}

/// Age in whole years on `today`; `None` without a birth date or for a future one
pub fn calculate_age(dob: Option<NaiveDate>, today: NaiveDate) -> Option<u32> {
    let dob = dob?;
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Date an employee appointed on `appointment` retires after `years` calendar years
///
/// 29 February anchors to 28 February when the target year is not a leap year.
pub fn retirement_date(appointment: NaiveDate, years: u32) -> Option<NaiveDate> {
    appointment.checked_add_months(Months::new(years.checked_mul(12)?))
}
