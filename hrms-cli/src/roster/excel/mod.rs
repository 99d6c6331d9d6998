//! Excel I/O for staff rosters and reports

mod reader;
mod writer;

pub use reader::{Sheet, read_first_sheet};
pub use writer::{DEFAULT_DATE_FORMAT, save_report_excel, save_staff_excel};

#[cfg(test)]
pub use reader::read_xlsx_buffer;
#[cfg(test)]
pub use writer::staff_excel_buffer;
