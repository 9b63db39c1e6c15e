// Calendar integration module
// Event sources (Google Calendar API, ICS feeds) and the month index builder

use crate::config::{PlannerConfig, SourceKind};
use crate::error::AppResult;
use crate::http_config::HttpConfig;
use crate::models::{MonthWindow, Occurrence};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod common;
pub mod google;
pub mod ics;
pub mod index_builder;

pub use google::GoogleCalendarSource;
pub use ics::IcsFeedSource;
pub use index_builder::MonthIndexBuilder;

/// A remote calendar the planner reads occurrences from.
///
/// Implementations return every occurrence whose start lies inside `window`,
/// with recurring events already expanded, ordered by start time. Any failure
/// is reported as an error; the index builder decides how to surface it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSource: Send + Sync {
    fn name(&self) -> String;

    async fn list_occurrences(&self, window: MonthWindow) -> Result<Vec<Occurrence>>;
}

/// Builds the source selected in `config`. The config is validated first.
pub fn source_from_config(config: &PlannerConfig) -> AppResult<Arc<dyn EventSource>> {
    config.validate()?;

    let source: Arc<dyn EventSource> = match config.source {
        SourceKind::Google => {
            let http = HttpConfig::calendar_api().with_timeout(config.request_timeout());
            Arc::new(GoogleCalendarSource::from_config(config, &http)?)
        }
        SourceKind::Ics => {
            let http = HttpConfig::ics_fetch().with_timeout(config.request_timeout());
            Arc::new(IcsFeedSource::from_config(config, &http)?)
        }
    };

    log::info!("Using {} calendar source", source.name());
    Ok(source)
}
