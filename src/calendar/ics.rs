// ICS feed integration
// Downloads an iCalendar feed and keeps the VEVENTs that start inside the window

use crate::calendar::common;
use crate::calendar::EventSource;
use crate::config::PlannerConfig;
use crate::error::{AppError, AppResult};
use crate::http_config::HttpConfig;
use crate::models::{MonthWindow, Occurrence, OccurrenceStart};
use crate::utils::logging;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use icalendar::{Calendar as IcsCalendar, CalendarDateTime, Component, DatePerhapsTime, EventLike};
use reqwest::Client;
use std::str::FromStr;
use url::Url;

#[derive(Debug, Clone)]
pub struct IcsFeedSource {
    client: Client,
    url: Url,
}

impl IcsFeedSource {
    pub fn new(client: Client, ics_url: &str) -> AppResult<Self> {
        let url = Url::parse(ics_url)
            .map_err(|e| AppError::config(format!("Invalid ICS URL '{}': {}", ics_url, e)))?;
        Ok(Self { client, url })
    }

    pub fn from_config(config: &PlannerConfig, http: &HttpConfig) -> AppResult<Self> {
        let ics_url = config
            .ics_url
            .as_deref()
            .ok_or_else(|| AppError::config("No ICS URL configured"))?;
        Self::new(http.build_client()?, ics_url)
    }

    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| anyhow!("Request failed: {}", e))?;
        let content = common::read_success_body(response, "ICS feed").await?;

        let head = content.trim_start();
        if head.starts_with("<!DOCTYPE") || head.starts_with("<html") {
            return Err(anyhow!(
                "The server returned HTML instead of a calendar file. Use the feed's secret iCal address, not the web page URL."
            ));
        }

        Ok(content)
    }
}

#[async_trait]
impl EventSource for IcsFeedSource {
    fn name(&self) -> String {
        format!("ics:{}", self.url.host_str().unwrap_or("unknown"))
    }

    async fn list_occurrences(&self, window: MonthWindow) -> Result<Vec<Occurrence>> {
        logging::log_source_request(&self.name(), &window);
        let content = self.fetch().await?;
        log::debug!("Fetched {} bytes of ICS data", content.len());
        parse_ics_occurrences(&content, &window)
    }
}

/// Parses a feed and returns the occurrences starting inside `window`,
/// sorted by start. Events without DTSTART are skipped. Recurrence rules are
/// not expanded: a recurring event appears once, at its DTSTART.
pub fn parse_ics_occurrences(ics_data: &str, window: &MonthWindow) -> Result<Vec<Occurrence>> {
    if !ics_data.contains("BEGIN:VCALENDAR") {
        return Err(anyhow!("ICS data does not contain a VCALENDAR"));
    }

    let calendar =
        IcsCalendar::from_str(ics_data).map_err(|e| anyhow!("Failed to parse ICS data: {}", e))?;

    let mut occurrences = Vec::new();
    for component in &calendar.components {
        let Some(event) = component.as_event() else {
            continue;
        };
        let Some(start) = event.get_start() else {
            log::warn!(
                "Skipping ICS event without DTSTART: {}",
                event.get_summary().unwrap_or("<untitled>")
            );
            continue;
        };

        let start = convert_start(start);
        if window.contains(&start) {
            occurrences.push(Occurrence::new(event.get_summary(), start));
        }
    }

    // stable: equal starts keep feed order
    occurrences.sort_by_key(|occurrence| occurrence.start.instant());
    Ok(occurrences)
}

fn convert_start(start: DatePerhapsTime) -> OccurrenceStart {
    match start {
        DatePerhapsTime::Date(date) => OccurrenceStart::AllDay(date),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(at)) => OccurrenceStart::floating(at.naive_utc()),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => OccurrenceStart::floating(naive),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            OccurrenceStart::zoned(date_time, &tzid)
        }
    }
}
