//! View state for the calendar screen
//!
//! Owns what the user is looking at (the displayed month and the selected
//! date). It never holds events; those live in the `DisplayCache`.

use crate::error::AppResult;
use crate::models::{CalendarDate, MonthKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarViewState {
    displayed_month: MonthKey,
    selected_date: CalendarDate,
}

impl CalendarViewState {
    /// Starts on `date`, showing the month that contains it.
    pub fn new(date: CalendarDate) -> AppResult<Self> {
        Ok(Self {
            displayed_month: MonthKey::containing(date)?,
            selected_date: date,
        })
    }

    pub fn today() -> AppResult<Self> {
        Self::new(CalendarDate::today())
    }

    pub fn displayed_month(&self) -> MonthKey {
        self.displayed_month
    }

    pub fn selected_date(&self) -> CalendarDate {
        self.selected_date
    }

    /// Selecting a date in another month moves the displayed month with it.
    pub fn select(&mut self, date: CalendarDate) -> AppResult<()> {
        let month = MonthKey::containing(date)?;
        self.displayed_month = month;
        self.selected_date = date;
        Ok(())
    }

    pub fn next_month(&mut self) -> AppResult<()> {
        let month = self.displayed_month.next()?;
        self.move_to(month);
        Ok(())
    }

    pub fn previous_month(&mut self) -> AppResult<()> {
        let month = self.displayed_month.previous()?;
        self.move_to(month);
        Ok(())
    }

    // Keeps the day of month where possible: Jan 31 -> Feb 29 in a leap year.
    fn move_to(&mut self, month: MonthKey) {
        let day = self.selected_date.day().min(month.days_in_month());
        let date = month
            .days()
            .nth(day as usize - 1)
            .unwrap_or_else(|| month.first_day());
        self.displayed_month = month;
        self.selected_date = date;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::from_ymd(year, month, day).unwrap()
    }

    #[test]
    fn test_new_shows_containing_month() {
        let state = CalendarViewState::new(date(2024, 2, 29)).unwrap();
        assert_eq!(state.displayed_month(), MonthKey::new(2024, 2).unwrap());
        assert_eq!(state.selected_date(), date(2024, 2, 29));
    }

    #[test]
    fn test_next_month_clamps_day() {
        let mut state = CalendarViewState::new(date(2024, 1, 31)).unwrap();
        state.next_month().unwrap();
        assert_eq!(state.selected_date(), date(2024, 2, 29));
        state.next_month().unwrap();
        assert_eq!(state.selected_date(), date(2024, 3, 29));
    }

    #[test]
    fn test_previous_month_crosses_year() {
        let mut state = CalendarViewState::new(date(2024, 1, 15)).unwrap();
        state.previous_month().unwrap();
        assert_eq!(state.displayed_month(), MonthKey::new(2023, 12).unwrap());
        assert_eq!(state.selected_date(), date(2023, 12, 15));
    }

    #[test]
    fn test_select_moves_displayed_month() {
        let mut state = CalendarViewState::new(date(2024, 3, 10)).unwrap();
        state.select(date(2024, 5, 1)).unwrap();
        assert_eq!(state.displayed_month(), MonthKey::new(2024, 5).unwrap());
    }
}
