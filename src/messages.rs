use crate::models::CalendarDate;

/// Unified calendar message type
///
/// Everything the user can do on the calendar screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // ===== Navigation Messages =====
    /// Jump to today's date and its month
    ShowToday,
    /// Show the month after the displayed one
    NextMonth,
    /// Show the month before the displayed one
    PreviousMonth,
    /// Pick a date in the date picker
    SelectDate(CalendarDate),

    // ===== Data Messages =====
    /// Re-query the source for the displayed month
    Refresh,
}
