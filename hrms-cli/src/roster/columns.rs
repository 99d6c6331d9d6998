//! Spreadsheet column table shared by import, export and manual edits
//!
//! Every staff column appears exactly once here: its header text, whether it
//! holds text or a date, and whether an import sheet must carry it. Headers
//! are matched after trimming and upper-casing.

use std::collections::HashMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use super::types::{RecordError, StaffRecord, parse_text_date};

/// Header of the derived age column written on export
pub const AGE_HEADER: &str = "AGE";

/// What a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Identifier,
    Text,
    Date,
}

/// A staff column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffField {
    PfNo,
    Name,
    Designation,
    DateOfJoining,
    HrmsId,
    Community,
    DateOfBirth,
    DateOfRetirement,
    Qualification,
    ModeOfAppointment,
    Mobile,
    Email,
    CliName,
    BillUnit,
    Dot,
    Pan,
    Aadhar,
    PromTrg,
    PmeDue,
    GrSrDue,
    TechRefDue,
    Gradation,
    DateOfGradation,
    HighSpeedPsychoDate,
    Remarks,
}

impl StaffField {
    /// All columns in export order
    pub const ALL: [StaffField; 25] = [
        StaffField::PfNo,
        StaffField::Name,
        StaffField::Designation,
        StaffField::DateOfJoining,
        StaffField::HrmsId,
        StaffField::Community,
        StaffField::DateOfBirth,
        StaffField::DateOfRetirement,
        StaffField::Qualification,
        StaffField::ModeOfAppointment,
        StaffField::Mobile,
        StaffField::Email,
        StaffField::CliName,
        StaffField::BillUnit,
        StaffField::Dot,
        StaffField::Pan,
        StaffField::Aadhar,
        StaffField::PromTrg,
        StaffField::PmeDue,
        StaffField::GrSrDue,
        StaffField::TechRefDue,
        StaffField::Gradation,
        StaffField::DateOfGradation,
        StaffField::HighSpeedPsychoDate,
        StaffField::Remarks,
    ];

    pub fn header(self) -> &'static str {
        match self {
            StaffField::PfNo => "PF NO",
            StaffField::Name => "EMPLOYEE NAME",
            StaffField::Designation => "DESIGNATION",
            StaffField::DateOfJoining => "DATE OF JOINING",
            StaffField::HrmsId => "HRMS ID",
            StaffField::Community => "COMMUNITY",
            StaffField::DateOfBirth => "DATE OF BIRTH",
            StaffField::DateOfRetirement => "DATE OF RETIREMENT",
            StaffField::Qualification => "QUALIFICATION",
            StaffField::ModeOfAppointment => "MODE OF APPOINTMENT",
            StaffField::Mobile => "MOBILE",
            StaffField::Email => "EMAIL",
            StaffField::CliName => "CLI NAME",
            StaffField::BillUnit => "BILL UNIT",
            StaffField::Dot => "DOT",
            StaffField::Pan => "PAN",
            StaffField::Aadhar => "AADHAR",
            StaffField::PromTrg => "PROM.TRG.",
            StaffField::PmeDue => "PME DUE",
            StaffField::GrSrDue => "GR/SR DUE",
            StaffField::TechRefDue => "TECH.REF.DUE",
            StaffField::Gradation => "GRADATION (A/B/C)",
            StaffField::DateOfGradation => "DATE OF GRADATION",
            StaffField::HighSpeedPsychoDate => "HIGH SPEED PSYCHO. DONE DATE",
            StaffField::Remarks => "REMARKS",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            StaffField::PfNo => FieldKind::Identifier,
            StaffField::DateOfJoining
            | StaffField::DateOfBirth
            | StaffField::DateOfRetirement
            | StaffField::PmeDue
            | StaffField::GrSrDue
            | StaffField::TechRefDue
            | StaffField::DateOfGradation
            | StaffField::HighSpeedPsychoDate => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    /// Columns an import sheet must carry
    pub fn is_required(self) -> bool {
        matches!(
            self,
            StaffField::PfNo
                | StaffField::Name
                | StaffField::Designation
                | StaffField::DateOfJoining
                | StaffField::DateOfBirth
                | StaffField::DateOfRetirement
                | StaffField::CliName
                | StaffField::Mobile
                | StaffField::Email
        )
    }

    pub fn required() -> impl Iterator<Item = StaffField> {
        Self::ALL.into_iter().filter(|f| f.is_required())
    }

    /// Look up a column by header, ignoring surrounding whitespace and case
    pub fn from_header(header: &str) -> Option<StaffField> {
        HEADER_INDEX.get(normalize_header(header).as_str()).copied()
    }
}

impl std::fmt::Display for StaffField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

static HEADER_INDEX: Lazy<HashMap<&'static str, StaffField>> =
    Lazy::new(|| StaffField::ALL.iter().map(|f| (f.header(), *f)).collect());

/// Canonical header form: trimmed and upper-cased
pub fn normalize_header(header: &str) -> String {
    header.trim().to_uppercase()
}

/// A column in the export sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportColumn {
    Field(StaffField),
    Age,
}

impl ExportColumn {
    pub fn header(self) -> &'static str {
        match self {
            ExportColumn::Field(field) => field.header(),
            ExportColumn::Age => AGE_HEADER,
        }
    }
}

/// Export layout: every staff column, with the derived age after BILL UNIT
pub fn export_columns() -> Vec<ExportColumn> {
    let mut columns = Vec::with_capacity(StaffField::ALL.len() + 1);
    for field in StaffField::ALL {
        columns.push(ExportColumn::Field(field));
        if field == StaffField::BillUnit {
            columns.push(ExportColumn::Age);
        }
    }
    columns
}

/// A value headed for one staff column
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Date(Option<NaiveDate>),
}

impl StaffRecord {
    /// Text value of a text column (the PF number for the identifier)
    pub fn text(&self, field: StaffField) -> Option<&str> {
        match field {
            StaffField::PfNo => Some(&self.pf_no),
            StaffField::Name => self.name.as_deref(),
            StaffField::Designation => self.designation.as_deref(),
            StaffField::HrmsId => self.hrms_id.as_deref(),
            StaffField::Community => self.community.as_deref(),
            StaffField::Qualification => self.qualification.as_deref(),
            StaffField::ModeOfAppointment => self.mode_of_appointment.as_deref(),
            StaffField::Mobile => self.mobile.as_deref(),
            StaffField::Email => self.email.as_deref(),
            StaffField::CliName => self.cli_name.as_deref(),
            StaffField::BillUnit => self.bill_unit.as_deref(),
            StaffField::Dot => self.dot.as_deref(),
            StaffField::Pan => self.pan.as_deref(),
            StaffField::Aadhar => self.aadhar.as_deref(),
            StaffField::PromTrg => self.prom_trg.as_deref(),
            StaffField::Gradation => self.gradation.as_deref(),
            StaffField::Remarks => self.remarks.as_deref(),
            _ => None,
        }
    }

    /// Date value of a date column
    pub fn date(&self, field: StaffField) -> Option<NaiveDate> {
        match field {
            StaffField::DateOfJoining => self.date_of_joining,
            StaffField::DateOfBirth => self.dob,
            StaffField::DateOfRetirement => self.dor,
            StaffField::PmeDue => self.pme_due,
            StaffField::GrSrDue => self.gr_sr_due,
            StaffField::TechRefDue => self.tech_ref_due,
            StaffField::DateOfGradation => self.date_of_gradation,
            StaffField::HighSpeedPsychoDate => self.high_speed_psycho_date,
            _ => None,
        }
    }

    fn text_slot(&mut self, field: StaffField) -> Option<&mut Option<String>> {
        let slot = match field {
            StaffField::Name => &mut self.name,
            StaffField::Designation => &mut self.designation,
            StaffField::HrmsId => &mut self.hrms_id,
            StaffField::Community => &mut self.community,
            StaffField::Qualification => &mut self.qualification,
            StaffField::ModeOfAppointment => &mut self.mode_of_appointment,
            StaffField::Mobile => &mut self.mobile,
            StaffField::Email => &mut self.email,
            StaffField::CliName => &mut self.cli_name,
            StaffField::BillUnit => &mut self.bill_unit,
            StaffField::Dot => &mut self.dot,
            StaffField::Pan => &mut self.pan,
            StaffField::Aadhar => &mut self.aadhar,
            StaffField::PromTrg => &mut self.prom_trg,
            StaffField::Gradation => &mut self.gradation,
            StaffField::Remarks => &mut self.remarks,
            _ => return None,
        };
        Some(slot)
    }

    fn date_slot(&mut self, field: StaffField) -> Option<&mut Option<NaiveDate>> {
        let slot = match field {
            StaffField::DateOfJoining => &mut self.date_of_joining,
            StaffField::DateOfBirth => &mut self.dob,
            StaffField::DateOfRetirement => &mut self.dor,
            StaffField::PmeDue => &mut self.pme_due,
            StaffField::GrSrDue => &mut self.gr_sr_due,
            StaffField::TechRefDue => &mut self.tech_ref_due,
            StaffField::DateOfGradation => &mut self.date_of_gradation,
            StaffField::HighSpeedPsychoDate => &mut self.high_speed_psycho_date,
            _ => return None,
        };
        Some(slot)
    }

    /// Overwrite one column; values of the wrong kind are ignored
    pub fn apply(&mut self, field: StaffField, value: FieldValue) {
        match value {
            FieldValue::Text(text) => {
                if let Some(slot) = self.text_slot(field) {
                    *slot = text;
                }
            }
            FieldValue::Date(date) => {
                if let Some(slot) = self.date_slot(field) {
                    *slot = date;
                }
            }
        }
    }

    /// Apply a user-typed value; an empty value clears the column
    pub fn apply_edit(&mut self, field: StaffField, raw: &str) -> Result<(), RecordError> {
        let raw = raw.trim();
        let value = match field.kind() {
            FieldKind::Identifier => return Err(RecordError::ReadOnlyColumn(field.header().to_string())),
            FieldKind::Text => FieldValue::Text((!raw.is_empty()).then(|| raw.to_string())),
            FieldKind::Date if raw.is_empty() => FieldValue::Date(None),
            FieldKind::Date => match parse_text_date(raw) {
                Some(date) => FieldValue::Date(Some(date)),
                None => return Err(RecordError::InvalidDate(raw.to_string())),
            },
        };
        self.apply(field, value);
        Ok(())
    }
}

/// Split a `HEADER=VALUE` assignment and resolve the header
pub fn parse_assignment(assignment: &str) -> Result<(StaffField, String), RecordError> {
    let (header, value) = assignment
        .split_once('=')
        .ok_or_else(|| RecordError::UnknownColumn(assignment.to_string()))?;
    let field = StaffField::from_header(header)
        .ok_or_else(|| RecordError::UnknownColumn(header.trim().to_string()))?;
    Ok((field, value.to_string()))
}
