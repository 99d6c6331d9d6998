//! Leave records

use chrono::NaiveDate;
use serde::Serialize;

use super::errors::RecordError;

/// A stored leave period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveRecord {
    pub id: i64,
    pub pf_no: String,
    pub leave_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub days: i64,
    pub remarks: Option<String>,
}

/// A validated leave entry waiting to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeave {
    pub pf_no: String,
    pub leave_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub remarks: Option<String>,
}

impl NewLeave {
    pub fn new(
        pf_no: impl Into<String>,
        leave_type: impl Into<String>,
        from_date: NaiveDate,
        to_date: NaiveDate,
        remarks: Option<String>,
    ) -> Result<Self, RecordError> {
        if to_date < from_date {
            return Err(RecordError::EndBeforeStart {
                from: from_date,
                to: to_date,
            });
        }

        Ok(Self {
            pf_no: pf_no.into(),
            leave_type: leave_type.into(),
            from_date,
            to_date,
            remarks: remarks.filter(|r| !r.trim().is_empty()),
        })
    }

    /// Inclusive number of days covered
    pub fn days(&self) -> i64 {
        inclusive_days(self.from_date, self.to_date)
    }
}

/// Days between two dates counting both ends
pub fn inclusive_days(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days() + 1
}
