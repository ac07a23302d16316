use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};

use crate::structs::CourseSlot;

const LOCATION_SUFFIX: &str = "ESGC-VAK";
const UID_DOMAIN: &str = "esgcvak.com";

/// Render-ready calendar event fields, derived 1:1 from one [`CourseSlot`].
///
/// The timestamps stay naive; the timezone is attached at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventData {
    pub summary: String,
    pub dtstart: NaiveDateTime,
    pub dtend: NaiveDateTime,
    pub location: String,
    pub description: String,
    pub uid: String,
}

pub fn convert_slot(slot: &CourseSlot) -> EventData {
    EventData {
        summary: format_summary(slot),
        dtstart: slot.date.and_time(slot.start_time),
        dtend: slot.date.and_time(slot.end_time),
        location: format_location(slot),
        description: format_description(slot),
        uid: compute_uid(slot),
    }
}

/// Deterministic event identity.
///
/// The digest input is `{date-ISO}|{start-HH:MM}|{end-HH:MM}|{course_name}`,
/// UTF-8 encoded; the uid is the first 16 lowercase hex characters of its
/// SHA-256 plus the fixed domain suffix. Identical fields always produce the
/// identical uid, which is what lets a calendar client update an event on
/// re-import instead of duplicating it. Room and class group are left out of
/// the hash: changing them keeps the event's identity.
pub fn compute_uid(slot: &CourseSlot) -> String {
    let raw = format!(
        "{}|{}|{}|{}",
        slot.date.format("%Y-%m-%d"),
        slot.start_time.format("%H:%M"),
        slot.end_time.format("%H:%M"),
        slot.course_name,
    );

    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    format!("{}@{}", &digest[..16], UID_DOMAIN)
}

fn format_summary(slot: &CourseSlot) -> String {
    if slot.course_type.is_empty() {
        format!("[{}] {}", slot.class_group, slot.course_name)
    } else {
        format!(
            "[{}] {} ({})",
            slot.class_group, slot.course_name, slot.course_type
        )
    }
}

fn format_location(slot: &CourseSlot) -> String {
    format!("{}, {LOCATION_SUFFIX}", slot.room)
}

// The Type line stays present even when the course type is empty.
fn format_description(slot: &CourseSlot) -> String {
    format!(
        "Classe: {}\nType: {}\nSalle: {}",
        slot.class_group, slot.course_type, slot.room
    )
}
