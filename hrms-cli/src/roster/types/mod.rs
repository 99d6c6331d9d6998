//! Core types for staff and leave records

mod cell;
mod dates;
mod errors;
mod leave;
mod staff;

pub use cell::*;
pub use dates::*;
pub use errors::*;
pub use leave::*;
pub use staff::*;
