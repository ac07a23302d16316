use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use ics::components::Property;
use ics::parameters::TzIDParam;
use ics::properties::{
    CalScale, Description, DtEnd, DtStart, Location, Method, Sequence, Status, Summary, Transp,
    Trigger, TzName,
};
use ics::{escape_text, Alarm, Event, ICalendar, Standard, TimeZone};

use crate::convert::EventData;

pub const TIMEZONE_ID: &str = "Africa/Porto-Novo";
pub const CALNAME: &str = "Cours";
const PRODID: &str = "-//ESGC-VAK//Planning//FR";

const REMINDERS: [(&str, &str); 3] = [
    ("-P2D", "Cours dans 2 jours"),
    ("-P1D", "Cours demain"),
    ("-PT30M", "Cours dans 30 minutes"),
];

/// Assembles the full calendar document: metadata, the fixed-offset timezone
/// block, and one event (with its three reminders) per input.
pub fn build_calendar(events: &[EventData], revision: u32) -> ICalendar<'_> {
    let mut calendar = ICalendar::new("2.0", PRODID);
    calendar.push(CalScale::new("GREGORIAN"));
    calendar.push(Method::new("PUBLISH"));
    calendar.push(Property::new("X-WR-CALNAME", CALNAME));
    calendar.push(Property::new("X-WR-TIMEZONE", TIMEZONE_ID));
    calendar.add_timezone(build_timezone());

    // One generation timestamp, shared by every event of this build.
    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    for event in events {
        calendar.add_event(build_event(event, revision, dtstamp.clone()));
    }

    calendar
}

/// Writes the serialized calendar, creating the destination directory first.
pub fn write_ics(calendar: &ICalendar, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("impossible de créer {}", parent.display()))?;
    }

    calendar
        .save_file(path)
        .with_context(|| format!("impossible d'écrire {}", path.display()))
}

// Fixed UTC+1 zone, no daylight saving rule: offset-from and offset-to are
// both +0100.
fn build_timezone() -> TimeZone<'static> {
    let mut wat_standard = Standard::new("19700101T000000", "+0100", "+0100");
    wat_standard.push(TzName::new("WAT"));

    TimeZone::standard(TIMEZONE_ID, wat_standard)
}

fn build_event(event: &EventData, revision: u32, dtstamp: String) -> Event<'_> {
    let mut ics_event = Event::new(event.uid.as_str(), dtstamp);

    ics_event.push(Summary::new(escape_text(event.summary.as_str())));

    let mut dtstart = DtStart::new(event.dtstart.format("%Y%m%dT%H%M%S").to_string());
    dtstart.add(TzIDParam::new(TIMEZONE_ID));
    ics_event.push(dtstart);

    let mut dtend = DtEnd::new(event.dtend.format("%Y%m%dT%H%M%S").to_string());
    dtend.add(TzIDParam::new(TIMEZONE_ID));
    ics_event.push(dtend);

    ics_event.push(Location::new(escape_text(event.location.as_str())));
    ics_event.push(Description::new(escape_text(event.description.as_str())));
    ics_event.push(Sequence::new(revision.to_string()));
    ics_event.push(Status::confirmed());
    ics_event.push(Transp::opaque());

    for (trigger, description) in REMINDERS {
        ics_event.add_alarm(Alarm::display(
            Trigger::new(trigger),
            Description::new(description),
        ));
    }

    ics_event
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn dt(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 10)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn event_data(uid: &str) -> EventData {
        EventData {
            summary: "[GI-L2] Théorie des Graphes (CM/TD)".to_string(),
            dtstart: dt(8),
            dtend: dt(12),
            location: "S-301, ESGC-VAK".to_string(),
            description: "Classe: GI-L2\nType: CM/TD\nSalle: S-301".to_string(),
            uid: uid.to_string(),
        }
    }

    #[test]
    fn calendar_metadata_is_present() {
        let raw = build_calendar(&[], 0).to_string();

        assert!(raw.contains("PRODID:-//ESGC-VAK//Planning//FR"));
        assert!(raw.contains("CALSCALE:GREGORIAN"));
        assert!(raw.contains("METHOD:PUBLISH"));
        assert!(raw.contains("X-WR-CALNAME:Cours"));
        assert!(raw.contains("X-WR-TIMEZONE:Africa/Porto-Novo"));
    }

    #[test]
    fn timezone_block_is_fixed_offset() {
        let raw = build_calendar(&[], 0).to_string();

        assert!(raw.contains("BEGIN:VTIMEZONE"));
        assert!(raw.contains("TZID:Africa/Porto-Novo"));
        assert!(raw.contains("TZOFFSETFROM:+0100"));
        assert!(raw.contains("TZOFFSETTO:+0100"));
        assert!(raw.contains("TZNAME:WAT"));
        assert!(!raw.contains("BEGIN:DAYLIGHT"));
    }

    #[test]
    fn one_event_block_per_input() {
        let events = [event_data("a@esgcvak.com"), event_data("b@esgcvak.com")];
        let raw = build_calendar(&events, 0).to_string();

        assert_eq!(raw.matches("BEGIN:VEVENT").count(), 2);
    }

    #[test]
    fn event_carries_all_fields() {
        let raw = build_calendar(&[event_data("abcdef1234567890@esgcvak.com")], 0).to_string();

        assert!(raw.contains("UID:abcdef1234567890@esgcvak.com"));
        assert!(raw.contains("DTSTART;TZID=Africa/Porto-Novo:20260210T080000"));
        assert!(raw.contains("DTEND;TZID=Africa/Porto-Novo:20260210T120000"));
        assert!(raw.contains("STATUS:CONFIRMED"));
        assert!(raw.contains("TRANSP:OPAQUE"));
        assert!(raw.contains("SEQUENCE:0"));
    }

    #[test]
    fn text_values_are_escaped() {
        let raw = build_calendar(&[event_data("a@esgcvak.com")], 0).to_string();

        assert!(raw.contains(r"LOCATION:S-301\, ESGC-VAK"));
        assert!(raw.contains(r"Classe: GI-L2\nType: CM/TD"));
    }

    #[test]
    fn revision_becomes_the_sequence() {
        let raw = build_calendar(&[event_data("a@esgcvak.com")], 5).to_string();
        assert!(raw.contains("SEQUENCE:5"));
    }

    #[test]
    fn three_reminders_per_event() {
        let events = [event_data("a@esgcvak.com"), event_data("b@esgcvak.com")];
        let raw = build_calendar(&events, 0).to_string();

        assert_eq!(raw.matches("BEGIN:VALARM").count(), 6);
        assert_eq!(raw.matches("ACTION:DISPLAY").count(), 6);
        assert_eq!(raw.matches("TRIGGER:-P2D").count(), 2);
        assert_eq!(raw.matches("TRIGGER:-P1D").count(), 2);
        assert_eq!(raw.matches("TRIGGER:-PT30M").count(), 2);
    }

    #[test]
    fn dtstamp_is_shared_across_events() {
        let events = [event_data("a@esgcvak.com"), event_data("b@esgcvak.com")];
        let raw = build_calendar(&events, 0).to_string();

        let stamps: Vec<&str> = raw
            .lines()
            .filter(|line| line.starts_with("DTSTAMP:"))
            .collect();
        assert_eq!(stamps.len(), 2);
        assert_eq!(stamps[0], stamps[1]);
    }
}
