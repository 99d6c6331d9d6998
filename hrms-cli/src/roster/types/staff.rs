//! Staff master record

use chrono::NaiveDate;
use serde::Serialize;

use super::dates::{calculate_age, retirement_date};

/// Default service span before retirement
pub const DEFAULT_RETIREMENT_YEARS: u32 = 60;

/// One employee, keyed by PF number
///
/// Age is not stored; it is derived from `dob` with [`StaffRecord::age_on`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StaffRecord {
    pub pf_no: String,
    pub name: Option<String>,
    pub designation: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub hrms_id: Option<String>,
    pub community: Option<String>,
    pub dob: Option<NaiveDate>,
    pub dor: Option<NaiveDate>,
    pub qualification: Option<String>,
    pub mode_of_appointment: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub cli_name: Option<String>,
    pub bill_unit: Option<String>,
    pub dot: Option<String>,
    pub pan: Option<String>,
    pub aadhar: Option<String>,
    pub prom_trg: Option<String>,
    pub pme_due: Option<NaiveDate>,
    pub gr_sr_due: Option<NaiveDate>,
    pub tech_ref_due: Option<NaiveDate>,
    pub gradation: Option<String>,
    pub date_of_gradation: Option<NaiveDate>,
    pub high_speed_psycho_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

impl StaffRecord {
    /// Start an empty record for a PF number
    pub fn new(pf_no: impl Into<String>) -> Self {
        Self {
            pf_no: pf_no.into(),
            ..Default::default()
        }
    }

    /// Age in whole years on the given day
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        calculate_age(self.dob, today)
    }

    /// Fill in the retirement date from the joining date when it is missing
    pub fn derive_retirement(&mut self, years: u32) {
        if self.dor.is_none() {
            self.dor = self
                .date_of_joining
                .and_then(|joined| retirement_date(joined, years));
        }
    }

    /// Display name, falling back to the PF number
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.pf_no)
    }
}
