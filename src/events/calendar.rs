use super::model::Event;
use crate::i18n::Locale;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use tracing::warn;

const PRODUCT_ID: &str = "-//Ministério do Bloco//Event//PT";
const UID_DOMAIN: &str = "ministeriodobloco.com";
const CALENDAR_TIMESTAMP: &str = "%Y%m%dT%H%M%SZ";
const DEFAULT_DURATION_HOURS: i64 = 2;
const MAX_LINE_OCTETS: usize = 75;

lazy_static! {
    static ref GOOGLE_CALENDAR_URL: Url =
        Url::parse("https://calendar.google.com/calendar/render").unwrap();
    static ref NOT_ALPHANUMERIC: Regex = Regex::new(r"[^a-zA-Z0-9]").unwrap();
}

/// An event reduced to what calendar applications import.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub uid: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl CalendarEntry {
    /**
       Events without an end time are assumed to last two hours.
       Returns `None` if the start timestamp can't be read.
    */
    pub fn from_event(event: &Event, locale: Locale) -> Option<Self> {
        let starts_at = parse_timestamp(&event.start_datetime)?;
        let ends_at = event
            .end_datetime
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(starts_at + TimeDelta::hours(DEFAULT_DURATION_HOURS));

        Some(Self {
            uid: format!("{}@{}", event.id, UID_DOMAIN),
            title: event.title.clone(),
            description: event
                .description
                .get(locale)
                .filter(|description| !description.is_empty())
                .unwrap_or(&event.title)
                .to_string(),
            location: event.full_location(),
            starts_at,
            ends_at,
        })
    }

    /// `stamped_at` is when the document is generated (`DTSTAMP`).
    pub fn to_ical(&self, stamped_at: DateTime<Utc>) -> String {
        [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", PRODUCT_ID),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid),
            format!("DTSTAMP:{}", stamped_at.format(CALENDAR_TIMESTAMP)),
            format!("DTSTART:{}", self.starts_at.format(CALENDAR_TIMESTAMP)),
            format!("DTEND:{}", self.ends_at.format(CALENDAR_TIMESTAMP)),
            format!("SUMMARY:{}", escape_text(&self.title)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
            format!("LOCATION:{}", escape_text(&self.location)),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ]
        .iter()
        .map(|line| fold_line(line))
        .join("\r\n")
    }

    pub fn google_calendar_url(&self) -> String {
        let mut url = GOOGLE_CALENDAR_URL.clone();

        url.query_pairs_mut()
            .append_pair("action", "TEMPLATE")
            .append_pair("text", &self.title)
            .append_pair(
                "dates",
                &format!(
                    "{}/{}",
                    self.starts_at.format(CALENDAR_TIMESTAMP),
                    self.ends_at.format(CALENDAR_TIMESTAMP)
                ),
            )
            .append_pair("details", &self.description)
            .append_pair("location", &self.location);

        url.to_string()
    }

    /// Download name for the `.ics` file
    pub fn file_name(&self) -> String {
        format!(
            "{}.ics",
            NOT_ALPHANUMERIC.replace_all(&self.title, "_").to_lowercase()
        )
    }
}

/// Reads timestamps with an offset, or without one as UTC.
fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(date_time.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|date_time| date_time.and_utc())
        .inspect_err(|err| warn!("Couldn't parse timestamp '{}': {}", timestamp, err))
        .ok()
}

// RFC 5545 text values
fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace(['\r', '\n'], "\\n")
}

/// Splits a content line into chunks of at most 75 octets, continuation lines starting with a space.
fn fold_line(line: &str) -> String {
    let mut folded = String::with_capacity(line.len());
    let mut line_octets = 0;

    for c in line.chars() {
        if line_octets + c.len_utf8() > MAX_LINE_OCTETS {
            folded.push_str("\r\n ");
            line_octets = 1;
        }

        folded.push(c);
        line_octets += c.len_utf8();
    }

    folded
}
