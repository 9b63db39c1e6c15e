// file: src/models/month.rs
use super::date::CalendarDate;
use super::event::OccurrenceStart;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

const LAST_SECOND_OF_DAY: i64 = 24 * 60 * 60 - 1;

/// Identity of a displayed month.
///
/// Only constructible for months the proleptic Gregorian calendar accepts,
/// so the first and last day are always known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        let invalid = || AppError::invalid_period(format!("{}-{:02} is not a calendar month", year, month));

        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self { first_day, last_day })
    }

    /// Builds a key from user-supplied text, e.g. CLI arguments.
    pub fn parse(year: &str, month: &str) -> AppResult<Self> {
        let year_value: i32 = year.trim().parse().map_err(|_| {
            AppError::invalid_period(format!("year must be a number, got '{}'", year))
        })?;
        let month_value: u32 = month.trim().parse().map_err(|_| {
            AppError::invalid_period(format!("month must be a number, got '{}'", month))
        })?;
        Self::new(year_value, month_value)
    }

    pub fn containing(date: CalendarDate) -> AppResult<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn current() -> AppResult<Self> {
        Self::containing(CalendarDate::today())
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> CalendarDate {
        self.first_day.into()
    }

    pub fn last_day(&self) -> CalendarDate {
        self.last_day.into()
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day.day()
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn next(&self) -> AppResult<Self> {
        match self.month() {
            12 => Self::new(self.year() + 1, 1),
            month => Self::new(self.year(), month + 1),
        }
    }

    pub fn previous(&self) -> AppResult<Self> {
        match self.month() {
            1 => Self::new(self.year() - 1, 12),
            month => Self::new(self.year(), month - 1),
        }
    }

    pub fn days(&self) -> impl Iterator<Item = CalendarDate> {
        self.first_day
            .iter_days()
            .take(self.days_in_month() as usize)
            .map(CalendarDate::from)
    }

    /// Inclusive query bounds: 00:00:00 on the first day through 23:59:59 on
    /// the last day, both in UTC.
    pub fn window(&self) -> MonthWindow {
        let start = Utc.from_utc_datetime(&self.first_day.and_time(NaiveTime::MIN));
        let end = Utc.from_utc_datetime(&self.last_day.and_time(NaiveTime::MIN))
            + Duration::seconds(LAST_SECOND_OF_DAY);
        MonthWindow { month: *self, start, end }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub month: MonthKey,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// RFC 3339 lower bound, as sent to calendar APIs.
    pub fn time_min(&self) -> String {
        self.start.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    pub fn time_max(&self) -> String {
        self.end.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Whether an occurrence starting at `start` belongs to this window.
    /// All-day starts are compared by date, timed starts by UTC instant.
    pub fn contains(&self, start: &OccurrenceStart) -> bool {
        match start {
            OccurrenceStart::AllDay(date) => self.month.contains((*date).into()),
            OccurrenceStart::Timed(at) => {
                let at = at.with_timezone(&Utc);
                at >= self.start && at <= self.end
            }
        }
    }
}
