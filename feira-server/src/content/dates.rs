//! Date handling for schedule entries and the countdown
//!
//! Schedule dates are typed by hand and sometimes arrive as `MM/DD/YYYY`.
//! [`normalize_schedule_date`] only rewrites a date when the first part is a
//! valid month and the second cannot be one; `05/10/2024` is ambiguous and
//! left as typed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use shared::models::ScheduleEntry;

/// Rewrite `MM/DD/YYYY` to `DD/MM/YYYY` when the reading is unambiguous
///
/// Anything that is not exactly `DD/DD/DDDD` passes through unchanged.
pub fn normalize_schedule_date(s: &str) -> String {
    let Some((p1, p2, year)) = split_slash_date(s) else {
        return s.to_string();
    };
    if (1..=12).contains(&p1) && (13..=31).contains(&p2) {
        let normal = format!("{:02}/{:02}/{}", p2, p1, year);
        if normal != s {
            tracing::debug!(from = %s, to = %normal, "Schedule date normalized");
        }
        return normal;
    }
    s.to_string()
}

/// Parse `DD/DD/DDDD` into its three numeric parts
fn split_slash_date(s: &str) -> Option<(u32, u32, u32)> {
    let b = s.as_bytes();
    if b.len() != 10 || b[2] != b'/' || b[5] != b'/' {
        return None;
    }
    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        let part = &s[range];
        if part.bytes().all(|c| c.is_ascii_digit()) {
            part.parse().ok()
        } else {
            None
        }
    };
    Some((digits(0..2)?, digits(3..5)?, digits(6..10)?))
}

/// Normalize the `data` field of every entry that has a string date
pub fn normalize_entries(entries: &mut [ScheduleEntry]) {
    for entry in entries.iter_mut() {
        if let Some(date) = entry.date() {
            let normal = normalize_schedule_date(date);
            entry.set_date(normal);
        }
    }
}

/// Parse the countdown target into ISO-8601 UTC with milliseconds
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` and `YYYY-MM-DD`; values without
/// an offset are taken as UTC. Returns `None` for anything else.
pub fn parse_countdown(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    let instant: DateTime<Utc> = if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        dt.with_timezone(&Utc)
    } else if let Some(naive) = parse_naive_datetime(s) {
        naive.and_utc()
    } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0)?.and_utc()
    } else {
        return None;
    };
    Some(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
