// file: src/models/event.rs
use super::date::CalendarDate;
use crate::utils;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

pub const UNTITLED: &str = "Untitled";

/// Display line for one occurrence on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventSummary(String);

impl EventSummary {
    pub fn from_title(title: Option<&str>) -> Self {
        match title.map(utils::normalize_title) {
            Some(title) if !title.is_empty() => Self(title),
            _ => Self(UNTITLED.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Start of an occurrence as reported by an event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OccurrenceStart {
    /// All-day occurrence; the date is used as is.
    AllDay(NaiveDate),
    Timed(DateTime<FixedOffset>),
}

impl OccurrenceStart {
    /// A wall-clock time with no zone attached is read as UTC.
    pub fn floating(naive: NaiveDateTime) -> Self {
        let utc = Utc.from_utc_datetime(&naive);
        Self::Timed(utc.with_timezone(&utc.offset().fix()))
    }

    /// Resolves a wall-clock time in an IANA zone. Unknown zones and local
    /// times skipped by a DST transition fall back to UTC.
    pub fn zoned(naive: NaiveDateTime, tzid: &str) -> Self {
        let tz = match tzid.parse::<chrono_tz::Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                log::warn!("Unrecognized timezone '{}', treating {} as UTC", tzid, naive);
                return Self::floating(naive);
            }
        };

        match tz.from_local_datetime(&naive).earliest() {
            Some(zoned) => Self::Timed(zoned.with_timezone(&zoned.offset().fix())),
            None => {
                log::warn!("{} does not exist in {}, treating it as UTC", naive, tzid);
                Self::floating(naive)
            }
        }
    }

    /// Parses an RFC 3339 timestamp. Values without an offset are placed in
    /// `time_zone` when given, otherwise in UTC.
    pub fn parse_timestamp(value: &str, time_zone: Option<&str>) -> Result<Self> {
        if let Ok(at) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self::Timed(at));
        }

        let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .with_context(|| format!("invalid start timestamp '{}'", value))?;

        Ok(match time_zone {
            Some(tzid) => Self::zoned(naive, tzid),
            None => Self::floating(naive),
        })
    }

    pub fn parse_date(value: &str) -> Result<Self> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Self::AllDay)
            .with_context(|| format!("invalid all-day start '{}'", value))
    }

    /// The day this occurrence is listed under: the UTC date for timed
    /// starts, the plain date for all-day starts.
    pub fn calendar_date(&self) -> CalendarDate {
        match self {
            Self::AllDay(date) => (*date).into(),
            Self::Timed(at) => at.with_timezone(&Utc).date_naive().into(),
        }
    }

    /// Sort key. All-day occurrences sort at midnight UTC of their date.
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            Self::AllDay(date) => Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
            Self::Timed(at) => at.with_timezone(&Utc),
        }
    }
}

/// One concrete occurrence returned by an event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub title: Option<String>,
    pub start: OccurrenceStart,
}

impl Occurrence {
    pub fn new(title: Option<&str>, start: OccurrenceStart) -> Self {
        Self {
            title: title.map(str::to_string),
            start,
        }
    }

    pub fn all_day(title: &str, date: NaiveDate) -> Self {
        Self::new(Some(title), OccurrenceStart::AllDay(date))
    }

    pub fn timed(title: &str, at: DateTime<FixedOffset>) -> Self {
        Self::new(Some(title), OccurrenceStart::Timed(at))
    }

    pub fn summary(&self) -> EventSummary {
        EventSummary::from_title(self.title.as_deref())
    }
}
