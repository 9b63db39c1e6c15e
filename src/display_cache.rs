//! Display cache for the month shown in the calendar view.
//!
//! Holds at most one `MonthEventIndex`. `ensure_month` is the only way the
//! cache gets populated; `events_on` only reads.

use crate::calendar::MonthIndexBuilder;
use crate::error::{AppError, AppResult};
use crate::models::{CalendarDate, EventSummary, MonthEventIndex, MonthKey};
use log::debug;
use std::collections::BTreeSet;

pub struct DisplayCache {
    builder: MonthIndexBuilder,
    current: Option<MonthEventIndex>,
    markers: BTreeSet<CalendarDate>,
}

impl DisplayCache {
    pub fn new(builder: MonthIndexBuilder) -> Self {
        Self {
            builder,
            current: None,
            markers: BTreeSet::new(),
        }
    }

    pub fn cached_month(&self) -> Option<MonthKey> {
        self.current.as_ref().map(MonthEventIndex::month)
    }

    pub fn current(&self) -> Option<&MonthEventIndex> {
        self.current.as_ref()
    }

    /// Returns the index for (year, month), building it only when a
    /// different month (or nothing) is cached. A failed build leaves the
    /// previous month in place.
    pub async fn ensure_month(&mut self, year: i32, month: u32) -> AppResult<&MonthEventIndex> {
        let month = MonthKey::new(year, month)?;
        self.ensure(month).await
    }

    pub async fn ensure(&mut self, month: MonthKey) -> AppResult<&MonthEventIndex> {
        if self.cached_month() == Some(month) {
            debug!("Display cache hit for {}", month);
        } else {
            debug!("Display cache miss for {} (cached: {:?})", month, self.cached_month());
            let index = self.builder.build_month(month).await?;
            self.install(index);
        }
        self.current
            .as_ref()
            .ok_or_else(|| AppError::fetch(format!("no events loaded for {}", month)))
    }

    /// Rebuilds the cached month on explicit request. Returns `None` when
    /// nothing has been cached yet.
    pub async fn refresh(&mut self) -> Option<AppResult<&MonthEventIndex>> {
        let month = self.cached_month()?;
        debug!("Refreshing {}", month);
        match self.builder.build_month(month).await {
            Ok(index) => {
                self.install(index);
                self.current.as_ref().map(Ok)
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Events on `date` from the cached month, empty when not cached.
    pub fn events_on(&self, date: CalendarDate) -> &[EventSummary] {
        match &self.current {
            Some(index) => index.events_on(date),
            None => &[],
        }
    }

    /// Dates to highlight in the date picker.
    pub fn marked_dates(&self) -> &BTreeSet<CalendarDate> {
        &self.markers
    }

    fn install(&mut self, index: MonthEventIndex) {
        self.markers = index.dates().collect();
        self.current = Some(index);
    }
}
