//! Report periods: a calendar month, quarter or year

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::roster::types::RecordError;

/// Granularity of a report period
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Monthly,
    Quarterly,
    Yearly,
}

/// Inclusive date range a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    /// Resolve period arguments into a date range
    pub fn resolve(
        period: PeriodType,
        year: i32,
        month: Option<u32>,
        quarter: Option<u32>,
    ) -> Result<Self, RecordError> {
        match period {
            PeriodType::Monthly => {
                let month = month.ok_or_else(|| {
                    RecordError::InvalidPeriod("monthly reports need a month".into())
                })?;
                Self::month(year, month).ok_or_else(|| {
                    RecordError::InvalidPeriod(format!("no month {} in {}", month, year))
                })
            }
            PeriodType::Quarterly => {
                let quarter = quarter.ok_or_else(|| {
                    RecordError::InvalidPeriod("quarterly reports need a quarter".into())
                })?;
                Self::quarter(year, quarter).ok_or_else(|| {
                    RecordError::InvalidPeriod(format!("quarter must be 1-4, got {}", quarter))
                })
            }
            PeriodType::Yearly => Self::year(year)
                .ok_or_else(|| RecordError::InvalidPeriod(format!("year {} out of range", year))),
        }
    }

    pub fn month(year: i32, month: u32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, month, 1)?,
            end: last_day_of_month(year, month)?,
        })
    }

    /// Q1 is January to March, Q4 October to December
    pub fn quarter(year: i32, quarter: u32) -> Option<Self> {
        if !(1..=4).contains(&quarter) {
            return None;
        }
        let first_month = (quarter - 1) * 3 + 1;
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, first_month, 1)?,
            end: last_day_of_month(year, first_month + 2)?,
        })
    }

    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    next.checked_sub_signed(Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_periods() {
        let feb = ReportPeriod::month(2024, 2).unwrap();
        assert_eq!((feb.start, feb.end), (ymd(2024, 2, 1), ymd(2024, 2, 29)));

        let dec = ReportPeriod::month(2023, 12).unwrap();
        assert_eq!((dec.start, dec.end), (ymd(2023, 12, 1), ymd(2023, 12, 31)));

        assert_eq!(ReportPeriod::month(2024, 13), None);
    }

    #[test]
    fn test_quarter_periods() {
        let q4 = ReportPeriod::quarter(2024, 4).unwrap();
        assert_eq!((q4.start, q4.end), (ymd(2024, 10, 1), ymd(2024, 12, 31)));

        let q1 = ReportPeriod::quarter(2024, 1).unwrap();
        assert_eq!((q1.start, q1.end), (ymd(2024, 1, 1), ymd(2024, 3, 31)));

        assert_eq!(ReportPeriod::quarter(2024, 5), None);
    }

    #[test]
    fn test_resolve_requires_matching_arguments() {
        assert!(ReportPeriod::resolve(PeriodType::Monthly, 2024, None, Some(2)).is_err());
        assert!(ReportPeriod::resolve(PeriodType::Quarterly, 2024, Some(2), None).is_err());
        assert!(ReportPeriod::resolve(PeriodType::Quarterly, 2024, None, Some(0)).is_err());

        let year = ReportPeriod::resolve(PeriodType::Yearly, 2025, None, None).unwrap();
        assert_eq!(year.start, ymd(2025, 1, 1));
        assert_eq!(year.end, ymd(2025, 12, 31));
    }
}
