//! Command handlers module
//!
//! Applies calendar messages to the view state, keeps the display cache on
//! the displayed month and produces what the day panel shows.

use crate::display_cache::DisplayCache;
use crate::error::{AppError, AppResult};
use crate::messages::Message;
use crate::models::CalendarDate;
use crate::ui_state::CalendarViewState;
use log::{debug, info, warn};
use serde::Serialize;

pub const NO_EVENTS: &str = "No events scheduled";

/// Contents of the day panel after a message has been handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub date: CalendarDate,
    pub lines: Vec<String>,
    /// Dates of the displayed month that have at least one event.
    pub markers: Vec<CalendarDate>,
    /// Set when the last action failed; the rest of the view is still usable.
    pub notice: Option<String>,
}

impl DayView {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines to print for the day, with the empty-day placeholder.
    pub fn display_lines(&self) -> Vec<&str> {
        if self.lines.is_empty() {
            vec![NO_EVENTS]
        } else {
            self.lines.iter().map(String::as_str).collect()
        }
    }
}

pub struct CalendarController {
    cache: DisplayCache,
    state: CalendarViewState,
}

impl CalendarController {
    pub fn new(cache: DisplayCache, state: CalendarViewState) -> Self {
        Self { cache, state }
    }

    pub fn state(&self) -> &CalendarViewState {
        &self.state
    }

    pub fn cache(&self) -> &DisplayCache {
        &self.cache
    }

    /// Handles one message. Failures end up in `DayView::notice`.
    pub async fn handle(&mut self, message: Message) -> DayView {
        info!("Handling {:?}", message);

        let result = match self.apply(&message) {
            Ok(()) => self.load(message == Message::Refresh).await,
            Err(e) => Err(e),
        };

        let notice = result.err().map(|e| {
            warn!("Calendar update failed: {}", e);
            e.to_safe_string()
        });
        self.day_view(notice)
    }

    fn apply(&mut self, message: &Message) -> AppResult<()> {
        match message {
            Message::ShowToday => self.state.select(CalendarDate::today()),
            Message::NextMonth => self.state.next_month(),
            Message::PreviousMonth => self.state.previous_month(),
            Message::SelectDate(date) => self.state.select(*date),
            Message::Refresh => Ok(()),
        }
    }

    async fn load(&mut self, refresh: bool) -> AppResult<()> {
        let month = self.state.displayed_month();
        // A refresh only rebuilds when the cache already holds the displayed
        // month; after a failed navigation it has to load the new one.
        if refresh && self.cache.cached_month() == Some(month) {
            return match self.cache.refresh().await {
                Some(result) => result.map(|_| ()),
                None => Err(AppError::fetch(format!("no events loaded for {}", month))),
            };
        }
        self.cache.ensure(month).await.map(|_| ())
    }

    fn day_view(&self, notice: Option<String>) -> DayView {
        let date = self.state.selected_date();
        let showing_displayed_month = self.cache.cached_month() == Some(self.state.displayed_month());

        let (lines, markers) = if showing_displayed_month {
            (
                self.cache
                    .events_on(date)
                    .iter()
                    .map(|summary| summary.to_string())
                    .collect(),
                self.cache.marked_dates().iter().copied().collect(),
            )
        } else {
            debug!("No index for {}, showing an empty day", self.state.displayed_month());
            (Vec::new(), Vec::new())
        };

        DayView {
            date,
            lines,
            markers,
            notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{MockEventSource, MonthIndexBuilder};
    use crate::models::{MonthWindow, Occurrence};
    use anyhow::anyhow;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::from_ymd(year, month, day).unwrap()
    }

    // Two events on the 10th of every month; May is unreachable.
    fn scripted(window: MonthWindow) -> anyhow::Result<Vec<Occurrence>> {
        if window.month.month() == 5 {
            return Err(anyhow!("calendar api returned HTTP 503: backend error"));
        }
        let tenth = NaiveDate::from_ymd_opt(window.month.year(), window.month.month(), 10).unwrap();
        Ok(vec![
            Occurrence::all_day("Pay rent", tenth),
            Occurrence::all_day("Call mom", tenth),
        ])
    }

    fn controller(start: CalendarDate, calls: usize) -> CalendarController {
        let mut source = MockEventSource::new();
        source
            .expect_list_occurrences()
            .times(calls)
            .returning(scripted);
        let cache = DisplayCache::new(MonthIndexBuilder::new(Arc::new(source)));
        CalendarController::new(cache, CalendarViewState::new(start).unwrap())
    }

    #[test]
    fn test_select_date_shows_events() {
        let mut controller = controller(date(2024, 3, 1), 1);
        let view = tokio_test::block_on(controller.handle(Message::SelectDate(date(2024, 3, 10))));

        assert_eq!(view.lines, vec!["Pay rent", "Call mom"]);
        assert_eq!(view.markers, vec![date(2024, 3, 10)]);
        assert!(view.notice.is_none());
    }

    #[test]
    fn test_empty_day_placeholder() {
        let mut controller = controller(date(2024, 3, 1), 1);
        let view = tokio_test::block_on(controller.handle(Message::SelectDate(date(2024, 3, 11))));

        assert!(view.is_empty());
        assert_eq!(view.display_lines(), vec![NO_EVENTS]);
    }

    #[test]
    fn test_dates_in_same_month_do_not_refetch() {
        let mut controller = controller(date(2024, 3, 1), 1);
        tokio_test::block_on(async {
            controller.handle(Message::SelectDate(date(2024, 3, 2))).await;
            controller.handle(Message::SelectDate(date(2024, 3, 10))).await;
            controller.handle(Message::SelectDate(date(2024, 3, 31))).await;
        });
    }

    #[test]
    fn test_failed_month_shows_notice_not_stale_events() {
        let mut controller = controller(date(2024, 4, 10), 2);
        let view = tokio_test::block_on(async {
            controller.handle(Message::SelectDate(date(2024, 4, 10))).await;
            controller.handle(Message::NextMonth).await
        });

        assert_eq!(view.date, date(2024, 5, 10));
        assert!(view.lines.is_empty());
        assert!(view.markers.is_empty());
        assert!(view.notice.unwrap().contains("HTTP 503"));
        // April is still cached for when the user goes back
        assert_eq!(controller.cache().events_on(date(2024, 4, 10)).len(), 2);
    }

    #[test]
    fn test_refresh_after_failure_retries_displayed_month() {
        let mut controller = controller(date(2024, 4, 10), 3);
        let view = tokio_test::block_on(async {
            controller.handle(Message::SelectDate(date(2024, 4, 10))).await;
            controller.handle(Message::NextMonth).await;
            controller.handle(Message::Refresh).await
        });

        assert_eq!(controller.cache().cached_month().unwrap().month(), 4);
        assert!(view.notice.is_some());
    }

    #[test]
    fn test_previous_month_navigation() {
        let mut controller = controller(date(2024, 1, 10), 1);
        let view = tokio_test::block_on(controller.handle(Message::PreviousMonth));

        assert_eq!(view.date, date(2023, 12, 10));
        assert_eq!(view.lines.len(), 2);
    }
}
