use crate::calendar::EventSource;
use crate::error::{AppError, AppResult};
use crate::models::{MonthEventIndex, MonthKey};
use crate::utils::logging;
use std::sync::Arc;
use std::time::Instant;

/// Turns the occurrences of one month into a per-day index.
#[derive(Clone)]
pub struct MonthIndexBuilder {
    source: Arc<dyn EventSource>,
}

impl MonthIndexBuilder {
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> String {
        self.source.name()
    }

    /// Fails with `InvalidPeriod` before touching the source when
    /// (year, month) is not a calendar month.
    pub async fn build(&self, year: i32, month: u32) -> AppResult<MonthEventIndex> {
        let month = MonthKey::new(year, month)?;
        self.build_month(month).await
    }

    /// Queries the source once and groups the occurrences by UTC date.
    ///
    /// Every source failure comes back as `AppError::Fetch`. Occurrences that
    /// normalize to a date outside `month` are dropped.
    pub async fn build_month(&self, month: MonthKey) -> AppResult<MonthEventIndex> {
        let started = Instant::now();

        let occurrences = match self.source.list_occurrences(month.window()).await {
            Ok(occurrences) => occurrences,
            Err(e) => {
                let error = AppError::fetch(format!("{:#}", e));
                logging::log_fetch_error(month, &error);
                return Err(error);
            }
        };

        let mut index = MonthEventIndex::new(month);
        for occurrence in occurrences {
            let date = occurrence.start.calendar_date();
            if !index.insert(date, occurrence.summary()) {
                log::debug!(
                    "Dropping '{}' on {}: outside {}",
                    occurrence.summary(),
                    date,
                    month
                );
            }
        }

        logging::log_month_index(
            month,
            index.event_count(),
            index.day_count(),
            started.elapsed().as_millis() as u64,
        );
        Ok(index)
    }
}
