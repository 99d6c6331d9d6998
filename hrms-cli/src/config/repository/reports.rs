//! Report queries over the staff table

use anyhow::{Context, Result};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::staff::{STAFF_COLUMNS, staff_from_row};
use crate::roster::report::{ReportOptions, ReportQuery};
use crate::roster::types::StaffRecord;

/// Staff whose due date for the report kind falls inside the period
pub async fn due_report(pool: &SqlitePool, query: &ReportQuery) -> Result<Vec<StaffRecord>> {
    let column = query.kind.column();

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {} FROM staff WHERE {} BETWEEN ",
        STAFF_COLUMNS, column
    ));
    builder
        .push_bind(query.period.start)
        .push(" AND ")
        .push_bind(query.period.end);

    if let Some(designation) = &query.designation {
        builder.push(" AND designation = ").push_bind(designation.clone());
    }
    if let Some(bill_unit) = &query.bill_unit {
        builder.push(" AND bill_unit = ").push_bind(bill_unit.clone());
    }

    builder.push(format!(" ORDER BY {}, pf_no", column));

    let rows = builder
        .build()
        .fetch_all(pool)
        .await
        .with_context(|| format!("Failed to run {} report", query.kind.label()))?;

    rows.iter().map(staff_from_row).collect()
}

/// Distinct designations and bill units to filter reports by
pub async fn report_options(pool: &SqlitePool) -> Result<ReportOptions> {
    let designations: Vec<(String,)> = sqlx::query_as(
        "SELECT DISTINCT designation FROM staff
         WHERE designation IS NOT NULL AND TRIM(designation) <> ''
         ORDER BY designation",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list designations")?;

    let bill_units: Vec<(String,)> = sqlx::query_as(
        "SELECT DISTINCT bill_unit FROM staff
         WHERE bill_unit IS NOT NULL AND TRIM(bill_unit) <> ''
         ORDER BY bill_unit",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list bill units")?;

    Ok(ReportOptions {
        designations: designations.into_iter().map(|(d,)| d).collect(),
        bill_units: bill_units.into_iter().map(|(b,)| b).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::repository::{staff, test_pool};
    use crate::roster::report::{ReportKind, ReportPeriod};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed(pool: &SqlitePool) {
        let rows = [
            ("PF1", "LP", "BU1", Some(ymd(2024, 10, 1))),
            ("PF2", "LP", "BU2", Some(ymd(2024, 12, 31))),
            ("PF3", "ALP", "BU1", Some(ymd(2024, 11, 15))),
            ("PF4", "LP", "BU1", Some(ymd(2025, 1, 1))),
            ("PF5", "LP", "", None),
        ];
        for (pf_no, designation, bill_unit, pme_due) in rows {
            let mut record = StaffRecord::new(pf_no);
            record.designation = Some(designation.to_string());
            record.bill_unit = Some(bill_unit.to_string()).filter(|b| !b.is_empty());
            record.pme_due = pme_due;
            staff::upsert_staff(pool, &record).await.unwrap();
        }
    }

    fn pf_nos(records: Vec<StaffRecord>) -> Vec<String> {
        records.into_iter().map(|r| r.pf_no).collect()
    }

    #[tokio::test]
    async fn test_quarter_bounds_are_inclusive() {
        let pool = test_pool().await;
        seed(&pool).await;

        let query = ReportQuery::new(ReportKind::Pme, ReportPeriod::quarter(2024, 4).unwrap(), None, None);
        let records = due_report(&pool, &query).await.unwrap();
        assert_eq!(pf_nos(records), vec!["PF1", "PF3", "PF2"]);
    }

    #[tokio::test]
    async fn test_filters_narrow_results() {
        let pool = test_pool().await;
        seed(&pool).await;

        let period = ReportPeriod::quarter(2024, 4).unwrap();
        let query = ReportQuery::new(ReportKind::Pme, period, Some("LP".into()), Some("BU1".into()));
        assert_eq!(pf_nos(due_report(&pool, &query).await.unwrap()), vec!["PF1"]);

        let query = ReportQuery::new(ReportKind::Pme, period, Some("ALL".into()), Some("BU1".into()));
        assert_eq!(pf_nos(due_report(&pool, &query).await.unwrap()), vec!["PF1", "PF3"]);

        let query = ReportQuery::new(ReportKind::Tech, period, None, None);
        assert!(due_report(&pool, &query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_options_are_distinct_and_sorted() {
        let pool = test_pool().await;
        seed(&pool).await;

        let options = report_options(&pool).await.unwrap();
        assert_eq!(options.designations, vec!["ALP", "LP"]);
        assert_eq!(options.bill_units, vec!["BU1", "BU2"]);
    }
}
