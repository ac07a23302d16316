pub mod cli;
pub mod convert;
pub mod ics;
pub mod parser;
pub mod pdf;
pub mod structs;

pub use convert::{compute_uid, convert_slot, EventData};
pub use parser::parse_schedule;
pub use structs::{CourseSlot, SchedulePeriod};
