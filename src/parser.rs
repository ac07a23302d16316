use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::pdf::{Page, Row};
use crate::structs::{CourseSlot, SchedulePeriod};

macro_rules! regex {
    ($pattern:expr) => {{
        static RE: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).unwrap());
        &RE
    }};
}

const DATE_HEADER: &str = "date";

/// Extracts every course slot and the schedule period from tokenized pages.
///
/// The period comes from the explicit declaration in the page text when
/// present, otherwise from the min/max of the extracted dates. It is `None`
/// only when both sources are empty.
pub fn parse_schedule(pages: &[Page]) -> (Vec<CourseSlot>, Option<SchedulePeriod>) {
    let courses = extract_courses(pages);
    let period = extract_period(pages).or_else(|| infer_period(&courses));
    (courses, period)
}

pub fn extract_courses(pages: &[Page]) -> Vec<CourseSlot> {
    let mut courses = Vec::new();

    // A merged date cell spans several time-slot rows; the last explicit date
    // is carried across rows, tables and pages, scoped to this one call.
    let mut last_date: Option<NaiveDate> = None;

    for page in pages {
        for table in &page.tables {
            for row in table {
                if let Some(course) = parse_row(row, &mut last_date) {
                    courses.push(course);
                }
            }
        }
    }

    courses
}

pub fn extract_period(pages: &[Page]) -> Option<SchedulePeriod> {
    pages.iter().find_map(|page| {
        let captures = regex!(r"Période du (\d{2}/\d{2}/\d{4}) au (\d{2}/\d{2}/\d{4})")
            .captures(&page.text)?;
        let start = find_date(captures.get(1).map(|m| m.as_str()))?;
        let end = find_date(captures.get(2).map(|m| m.as_str()))?;
        (start <= end).then_some(SchedulePeriod { start, end })
    })
}

fn infer_period(courses: &[CourseSlot]) -> Option<SchedulePeriod> {
    let start = courses.iter().map(|course| course.date).min()?;
    let end = courses.iter().map(|course| course.date).max()?;
    Some(SchedulePeriod { start, end })
}

fn parse_row(row: &Row, last_date: &mut Option<NaiveDate>) -> Option<CourseSlot> {
    if row.len() < 5 {
        return None;
    }

    let date_cell = row[0].as_deref();
    if date_cell.is_some_and(|cell| cell.trim().eq_ignore_ascii_case(DATE_HEADER)) {
        return None;
    }

    if let Some(date) = find_date(date_cell) {
        *last_date = Some(date);
    }
    let date = (*last_date)?;

    let (start_time, end_time) = parse_time_range(&normalize(row[1].as_deref()))?;
    if start_time >= end_time {
        return None;
    }

    let course_raw = normalize(row[2].as_deref());
    if course_raw.is_empty() {
        return None;
    }
    let (course_name, course_type) = split_course_type(&course_raw);

    let class_group = normalize(row[3].as_deref());
    if class_group.is_empty() {
        return None;
    }
    let room = normalize(row[4].as_deref());

    Some(CourseSlot {
        date,
        start_time,
        end_time,
        course_name,
        course_type,
        class_group,
        room,
    })
}

/// Finds a `DD/MM/YYYY` token anywhere in the cell; the cell may also carry a
/// weekday name prefix.
fn find_date(cell: Option<&str>) -> Option<NaiveDate> {
    let captures = regex!(r"(\d{2})/(\d{2})/(\d{4})").captures(cell?)?;
    let day = captures[1].parse().ok()?;
    let month = captures[2].parse().ok()?;
    let year = captures[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_time_range(cell: &str) -> Option<(NaiveTime, NaiveTime)> {
    let captures = regex!(r"(\d{2})H(\d{2})\s*-\s*(\d{2})H(\d{2})").captures(cell)?;
    let start = NaiveTime::from_hms_opt(captures[1].parse().ok()?, captures[2].parse().ok()?, 0)?;
    let end = NaiveTime::from_hms_opt(captures[3].parse().ok()?, captures[4].parse().ok()?, 0)?;
    Some((start, end))
}

/// Splits a trailing parenthesized suffix off the course cell:
/// `"Informatique (CM/TD)"` becomes `("Informatique", "CM/TD")`.
fn split_course_type(raw: &str) -> (String, String) {
    let Some(captures) = regex!(r"\(([^)]+)\)\s*$").captures(raw) else {
        return (raw.to_string(), String::new());
    };

    let suffix_start = captures.get(0).map_or(raw.len(), |m| m.start());
    let course_type = captures.get(1).map_or("", |m| m.as_str());

    (raw[..suffix_start].trim_end().to_string(), course_type.to_string())
}

/// Collapses embedded newlines and whitespace runs into single spaces.
fn normalize(cell: Option<&str>) -> String {
    cell.unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
