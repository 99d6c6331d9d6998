//! Due-date reports over the staff roster

mod period;

pub use period::{PeriodType, ReportPeriod};

use chrono::NaiveDate;
use serde::Serialize;

use super::columns::StaffField;
use super::types::StaffRecord;

/// Filter value meaning "do not filter"
pub const ALL_FILTER: &str = "ALL";

/// Which recurring due date a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Periodic medical examination due
    Pme,
    /// GR/SR review due
    Gr,
    /// Technical refresher due
    Tech,
    /// Date of gradation
    Gradation,
}

impl ReportKind {
    /// Staff column the report filters on
    pub fn field(self) -> StaffField {
        match self {
            ReportKind::Pme => StaffField::PmeDue,
            ReportKind::Gr => StaffField::GrSrDue,
            ReportKind::Tech => StaffField::TechRefDue,
            ReportKind::Gradation => StaffField::DateOfGradation,
        }
    }

    /// Database column for the due date
    pub fn column(self) -> &'static str {
        match self {
            ReportKind::Pme => "pme_due",
            ReportKind::Gr => "gr_sr_due",
            ReportKind::Tech => "tech_ref_due",
            ReportKind::Gradation => "date_of_gradation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Pme => "PME Due",
            ReportKind::Gr => "GR/SR Due",
            ReportKind::Tech => "Tech Refresher Due",
            ReportKind::Gradation => "Gradation",
        }
    }

    /// Worksheet name (Excel forbids `/` in sheet names)
    pub fn sheet_name(self) -> &'static str {
        match self {
            ReportKind::Pme => "PME",
            ReportKind::Gr => "GR-SR",
            ReportKind::Tech => "Tech Refresher",
            ReportKind::Gradation => "Gradation",
        }
    }
}

/// Parameters of a due-date report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    pub kind: ReportKind,
    pub period: ReportPeriod,
    pub designation: Option<String>,
    pub bill_unit: Option<String>,
}

impl ReportQuery {
    /// Build a query; blank and `ALL` filters mean no filter
    pub fn new(
        kind: ReportKind,
        period: ReportPeriod,
        designation: Option<String>,
        bill_unit: Option<String>,
    ) -> Self {
        Self {
            kind,
            period,
            designation: filter_value(designation),
            bill_unit: filter_value(bill_unit),
        }
    }
}

/// Normalize a designation or bill unit filter; blank and `ALL` mean no filter
pub(crate) fn filter_value(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_FILTER))
}

/// Result of a due-date report
#[derive(Debug, Clone)]
pub struct DueReport {
    pub kind: ReportKind,
    pub period: ReportPeriod,
    pub designation: Option<String>,
    pub bill_unit: Option<String>,
    pub records: Vec<StaffRecord>,
}

impl DueReport {
    pub fn new(query: ReportQuery, records: Vec<StaffRecord>) -> Self {
        Self {
            kind: query.kind,
            period: query.period,
            designation: query.designation,
            bill_unit: query.bill_unit,
            records,
        }
    }

    pub fn title(&self) -> String {
        let mut title = format!("{} report, {}", self.kind.label(), self.period);
        if let Some(designation) = &self.designation {
            title.push_str(&format!(", designation {}", designation));
        }
        if let Some(bill_unit) = &self.bill_unit {
            title.push_str(&format!(", bill unit {}", bill_unit));
        }
        title
    }

    pub fn headers(&self) -> [&'static str; 5] {
        [
            StaffField::PfNo.header(),
            StaffField::Name.header(),
            StaffField::Designation.header(),
            StaffField::BillUnit.header(),
            self.kind.field().header(),
        ]
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        let due_field = self.kind.field();
        self.records
            .iter()
            .map(|record| ReportRow {
                pf_no: record.pf_no.clone(),
                name: record.name.clone(),
                designation: record.designation.clone(),
                bill_unit: record.bill_unit.clone(),
                due_date: record.date(due_field),
            })
            .collect()
    }
}

/// One line of a due-date report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub pf_no: String,
    pub name: Option<String>,
    pub designation: Option<String>,
    pub bill_unit: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Filter choices offered for reports
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportOptions {
    pub designations: Vec<String>,
    pub bill_units: Vec<String>,
}
