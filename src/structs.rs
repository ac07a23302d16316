use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};

fn serialize_naive_time<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    let formatted_time = format!("{:02}:{:02}", time.hour(), time.minute());
    serializer.serialize_str(&formatted_time)
}

/// One scheduled class occurrence, as extracted from the planning PDF.
///
/// Invariants are enforced by the extractor: `start_time < end_time`,
/// `course_name` and `class_group` are non-empty. Rows that violate them are
/// dropped during extraction instead of being modeled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSlot {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_naive_time")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_naive_time")]
    pub end_time: NaiveTime,
    pub course_name: String,
    /// "CM/TD" and the like, empty when the course cell has no parenthesized
    /// suffix.
    pub course_type: String,
    pub class_group: String,
    pub room: String,
}

/// Validity window of a schedule, either declared in the document or inferred
/// from the extracted slot dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}
