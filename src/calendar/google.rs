// Google Calendar integration
// Lists single (recurrence-expanded) events through the Calendar v3 REST API

use crate::calendar::common;
use crate::calendar::EventSource;
use crate::config::PlannerConfig;
use crate::error::{AppError, AppResult};
use crate::http_config::HttpConfig;
use crate::models::{MonthWindow, Occurrence, OccurrenceStart};
use crate::utils::logging;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

const PAGE_SIZE: &str = "250";
const MAX_PAGES: usize = 40;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<GoogleEventItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventItem {
    id: Option<String>,
    summary: Option<String>,
    status: Option<String>,
    start: Option<GoogleEventTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventTime {
    date_time: Option<String>,
    date: Option<String>,
    time_zone: Option<String>,
}

impl GoogleEventItem {
    fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }

    fn into_occurrence(self) -> Result<Occurrence> {
        let id = self.id.as_deref().unwrap_or("<no id>");
        let start = self
            .start
            .ok_or_else(|| anyhow!("event {} has no start", id))?;

        let start = match (start.date_time.as_deref(), start.date.as_deref()) {
            (Some(date_time), _) => {
                OccurrenceStart::parse_timestamp(date_time, start.time_zone.as_deref())
            }
            (None, Some(date)) => OccurrenceStart::parse_date(date),
            (None, None) => Err(anyhow!("start has neither dateTime nor date")),
        }
        .with_context(|| format!("event {} has an unusable start", id))?;

        Ok(Occurrence {
            title: self.summary,
            start,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GoogleCalendarSource {
    client: Client,
    events_url: Url,
    calendar_id: String,
    access_token: String,
}

impl GoogleCalendarSource {
    pub fn new(client: Client, api_base: &str, calendar_id: &str, access_token: &str) -> AppResult<Self> {
        if calendar_id.trim().is_empty() {
            return Err(AppError::config("calendar id must not be empty"));
        }
        if access_token.trim().is_empty() {
            return Err(AppError::config("access token must not be empty"));
        }

        Ok(Self {
            client,
            events_url: Self::events_endpoint(api_base, calendar_id)?,
            calendar_id: calendar_id.to_string(),
            access_token: access_token.to_string(),
        })
    }

    pub fn from_config(config: &PlannerConfig, http: &HttpConfig) -> AppResult<Self> {
        Self::new(
            http.build_client()?,
            &config.api_base,
            &config.calendar_id,
            config.access_token.as_deref().unwrap_or(""),
        )
    }

    fn events_endpoint(api_base: &str, calendar_id: &str) -> AppResult<Url> {
        let mut url = Url::parse(api_base)
            .map_err(|e| AppError::config(format!("invalid calendar api base url '{}': {}", api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::config(format!("calendar api base url '{}' cannot be a base", api_base)))?
            .pop_if_empty()
            .push("calendars")
            .push(calendar_id)
            .push("events");
        Ok(url)
    }

    async fn fetch_page(&self, window: &MonthWindow, page_token: Option<&str>) -> Result<EventsPage> {
        let time_min = window.time_min();
        let time_max = window.time_max();

        let mut request = self
            .client
            .get(self.events_url.clone())
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
                ("maxResults", PAGE_SIZE),
            ]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("network error while listing events: {}", e))?;
        let body = common::read_success_body(response, "calendar api").await?;

        serde_json::from_str(&body).map_err(|e| {
            anyhow!(
                "invalid events payload: {}; body={}",
                e,
                common::body_snippet(&body)
            )
        })
    }
}

#[async_trait]
impl EventSource for GoogleCalendarSource {
    fn name(&self) -> String {
        format!("google:{}", self.calendar_id)
    }

    async fn list_occurrences(&self, window: MonthWindow) -> Result<Vec<Occurrence>> {
        logging::log_source_request(&self.name(), &window);

        let mut occurrences = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page = self.fetch_page(&window, page_token.as_deref()).await?;

            for item in page.items {
                if item.is_cancelled() {
                    continue;
                }
                occurrences.push(item.into_occurrence()?);
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => {
                    log::debug!("Google returned {} occurrences for {}", occurrences.len(), window.month);
                    return Ok(occurrences);
                }
            }
        }

        Err(anyhow!(
            "calendar api kept paging after {} pages for {}",
            MAX_PAGES,
            window.month
        ))
    }
}
