// file: src/models/index.rs
use super::date::CalendarDate;
use super::event::EventSummary;
use super::month::MonthKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// Events of one month, grouped by day.
///
/// A date with no entry has no events. Dates outside `month` are never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthEventIndex {
    month: MonthKey,
    days: BTreeMap<CalendarDate, Vec<EventSummary>>,
}

impl MonthEventIndex {
    pub fn new(month: MonthKey) -> Self {
        Self {
            month,
            days: BTreeMap::new(),
        }
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    /// Appends `summary` to `date`. Returns `false` and stores nothing when
    /// the date belongs to another month.
    pub fn insert(&mut self, date: CalendarDate, summary: EventSummary) -> bool {
        if !self.month.contains(date) {
            return false;
        }
        self.days.entry(date).or_default().push(summary);
        true
    }

    pub fn events_on(&self, date: CalendarDate) -> &[EventSummary] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dates(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CalendarDate, &[EventSummary])> + '_ {
        self.days.iter().map(|(date, events)| (*date, events.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn event_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}
