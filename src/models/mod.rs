// Declare modules
pub mod date;
pub mod event;
pub mod index;
pub mod month;

// Flatten so callers can write `crate::models::MonthKey`.
pub use date::CalendarDate;
pub use event::{EventSummary, Occurrence, OccurrenceStart, UNTITLED};
pub use index::MonthEventIndex;
pub use month::{MonthKey, MonthWindow};
