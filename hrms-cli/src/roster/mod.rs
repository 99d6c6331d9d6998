//! Staff roster domain: records, the column table, spreadsheets, import and reports

pub mod columns;
pub mod excel;
pub mod import;
pub mod report;
pub mod types;
