// Planman Library
// Month-scoped calendar view: event sources, per-day month index and the
// display cache behind the calendar screen

pub mod calendar;
pub mod command_handlers;
pub mod config;
pub mod display_cache;
pub mod error;
pub mod http_config;
pub mod messages;
pub mod models;
pub mod ui_state;
pub mod utils;

// Re-export commonly used types
pub use calendar::{source_from_config, EventSource, MonthIndexBuilder};
pub use command_handlers::{CalendarController, DayView, NO_EVENTS};
pub use config::{PlannerConfig, SourceKind};
pub use display_cache::DisplayCache;
pub use error::{AppError, AppResult};
pub use messages::Message;
pub use models::*;
pub use ui_state::CalendarViewState;
