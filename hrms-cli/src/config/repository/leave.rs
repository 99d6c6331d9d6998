//! Repository for leave records

use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};

use crate::roster::types::{LeaveRecord, NewLeave};

/// Store a leave entry and return its generated id
pub async fn insert_leave(pool: &SqlitePool, leave: &NewLeave) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO leave_records (pf_no, leave_type, from_date, to_date, days, remarks)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&leave.pf_no)
    .bind(&leave.leave_type)
    .bind(leave.from_date)
    .bind(leave.to_date)
    .bind(leave.days())
    .bind(&leave.remarks)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to insert leave for {}", leave.pf_no))?;

    Ok(result.last_insert_rowid())
}

/// Leaves of one staff member, oldest first
pub async fn list_leaves(pool: &SqlitePool, pf_no: &str) -> Result<Vec<LeaveRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, pf_no, leave_type, from_date, to_date, days, remarks
        FROM leave_records
        WHERE pf_no = ?
        ORDER BY from_date, id
        "#,
    )
    .bind(pf_no)
    .fetch_all(pool)
    .await
    .context("Failed to list leave records")?;

    let mut leaves = Vec::new();
    for row in rows {
        leaves.push(LeaveRecord {
            id: row.try_get("id")?,
            pf_no: row.try_get("pf_no")?,
            leave_type: row.try_get("leave_type")?,
            from_date: row.try_get("from_date")?,
            to_date: row.try_get("to_date")?,
            days: row.try_get("days")?,
            remarks: row.try_get("remarks")?,
        });
    }

    Ok(leaves)
}
