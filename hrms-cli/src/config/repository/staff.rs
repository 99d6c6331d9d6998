//! Repository for staff master records

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqliteExecutor, query::Query};

use crate::roster::types::StaffRecord;

/// Staff columns in select order
pub(crate) const STAFF_COLUMNS: &str = "pf_no, name, designation, date_of_joining, hrms_id, \
     community, dob, dor, qualification, mode_of_appointment, mobile, email, cli_name, \
     bill_unit, dot, pan, aadhar, prom_trg, pme_due, gr_sr_due, tech_ref_due, gradation, \
     date_of_gradation, high_speed_psycho_date, remarks";

const INSERT_STAFF: &str = r#"
    INSERT INTO staff (
        pf_no, name, designation, date_of_joining, hrms_id,
        community, dob, dor, qualification, mode_of_appointment, mobile, email, cli_name,
        bill_unit, dot, pan, aadhar, prom_trg, pme_due, gr_sr_due, tech_ref_due, gradation,
        date_of_gradation, high_speed_psycho_date, remarks
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPSERT_CONFLICT: &str = r#"
    ON CONFLICT(pf_no) DO UPDATE SET
        name = excluded.name,
        designation = excluded.designation,
        date_of_joining = excluded.date_of_joining,
        hrms_id = excluded.hrms_id,
        community = excluded.community,
        dob = excluded.dob,
        dor = excluded.dor,
        qualification = excluded.qualification,
        mode_of_appointment = excluded.mode_of_appointment,
        mobile = excluded.mobile,
        email = excluded.email,
        cli_name = excluded.cli_name,
        bill_unit = excluded.bill_unit,
        dot = excluded.dot,
        pan = excluded.pan,
        aadhar = excluded.aadhar,
        prom_trg = excluded.prom_trg,
        pme_due = excluded.pme_due,
        gr_sr_due = excluded.gr_sr_due,
        tech_ref_due = excluded.tech_ref_due,
        gradation = excluded.gradation,
        date_of_gradation = excluded.date_of_gradation,
        high_speed_psycho_date = excluded.high_speed_psycho_date,
        remarks = excluded.remarks,
        updated_at = CURRENT_TIMESTAMP
"#;

/// Get a staff record by PF number
pub async fn get_staff<'e, E>(executor: E, pf_no: &str) -> Result<Option<StaffRecord>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(&format!("SELECT {} FROM staff WHERE pf_no = ?", STAFF_COLUMNS))
        .bind(pf_no)
        .fetch_optional(executor)
        .await
        .context("Failed to get staff record")?;

    row.as_ref().map(staff_from_row).transpose()
}

/// List all staff records ordered by PF number
pub async fn list_staff<'e, E>(executor: E) -> Result<Vec<StaffRecord>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(&format!("SELECT {} FROM staff ORDER BY pf_no", STAFF_COLUMNS))
        .fetch_all(executor)
        .await
        .context("Failed to list staff records")?;

    rows.iter().map(staff_from_row).collect()
}

/// Insert a new staff record; fails if the PF number exists
pub async fn insert_staff<'e, E>(executor: E, record: &StaffRecord) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    bind_staff(sqlx::query(INSERT_STAFF), record)
        .execute(executor)
        .await
        .with_context(|| format!("Failed to insert staff record {}", record.pf_no))?;

    Ok(())
}

/// Insert or overwrite a staff record keyed by PF number
pub async fn upsert_staff<'e, E>(executor: E, record: &StaffRecord) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{}{}", INSERT_STAFF, UPSERT_CONFLICT);
    bind_staff(sqlx::query(&sql), record)
        .execute(executor)
        .await
        .with_context(|| format!("Failed to save staff record {}", record.pf_no))?;

    Ok(())
}

/// Check if a staff record exists
pub async fn staff_exists<'e, E>(executor: E, pf_no: &str) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM staff WHERE pf_no = ?")
        .bind(pf_no)
        .fetch_optional(executor)
        .await
        .context("Failed to check staff existence")?;

    Ok(row.is_some())
}

/// Count staff records
pub async fn count_staff<'e, E>(executor: E) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM staff")
        .fetch_one(executor)
        .await
        .context("Failed to count staff records")?;

    Ok(count)
}

fn bind_staff<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    record: &'q StaffRecord,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(&record.pf_no)
        .bind(&record.name)
        .bind(&record.designation)
        .bind(record.date_of_joining)
        .bind(&record.hrms_id)
        .bind(&record.community)
        .bind(record.dob)
        .bind(record.dor)
        .bind(&record.qualification)
        .bind(&record.mode_of_appointment)
        .bind(&record.mobile)
        .bind(&record.email)
        .bind(&record.cli_name)
        .bind(&record.bill_unit)
        .bind(&record.dot)
        .bind(&record.pan)
        .bind(&record.aadhar)
        .bind(&record.prom_trg)
        .bind(record.pme_due)
        .bind(record.gr_sr_due)
        .bind(record.tech_ref_due)
        .bind(&record.gradation)
        .bind(record.date_of_gradation)
        .bind(record.high_speed_psycho_date)
        .bind(&record.remarks)
}

pub(crate) fn staff_from_row(row: &SqliteRow) -> Result<StaffRecord> {
    Ok(StaffRecord {
        pf_no: row.try_get("pf_no")?,
        name: row.try_get("name")?,
        designation: row.try_get("designation")?,
        date_of_joining: row.try_get("date_of_joining")?,
        hrms_id: row.try_get("hrms_id")?,
        community: row.try_get("community")?,
        dob: row.try_get("dob")?,
        dor: row.try_get("dor")?,
        qualification: row.try_get("qualification")?,
        mode_of_appointment: row.try_get("mode_of_appointment")?,
        mobile: row.try_get("mobile")?,
        email: row.try_get("email")?,
        cli_name: row.try_get("cli_name")?,
        bill_unit: row.try_get("bill_unit")?,
        dot: row.try_get("dot")?,
        pan: row.try_get("pan")?,
        aadhar: row.try_get("aadhar")?,
        prom_trg: row.try_get("prom_trg")?,
        pme_due: row.try_get("pme_due")?,
        gr_sr_due: row.try_get("gr_sr_due")?,
        tech_ref_due: row.try_get("tech_ref_due")?,
        gradation: row.try_get("gradation")?,
        date_of_gradation: row.try_get("date_of_gradation")?,
        high_speed_psycho_date: row.try_get("high_speed_psycho_date")?,
        remarks: row.try_get("remarks")?,
    })
}
